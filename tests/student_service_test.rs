// ABOUTME: Integration tests for the student playback service
// ABOUTME: Chapter view assembly, paywall results, and entitlement-gated completion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use uuid::Uuid;

use aula::errors::AppError;
use aula::services::StudentService;

#[tokio::test]
async fn locked_chapter_is_a_paywall_result_not_an_error() {
    let db = common::test_db().await;
    let (course, chapters) = common::create_published_course(&db, Uuid::new_v4(), 2).await;
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    db.attachments()
        .add(course.id, "Notes", "https://example.com/notes.pdf")
        .await
        .unwrap();

    let view = students
        .chapter_view(user_id, course.id, chapters[0].id)
        .await
        .unwrap();

    assert!(view.locked);
    assert!(!view.complete_on_end);
    assert!(!view.has_entitlement);
    assert!(view.attachments.is_empty(), "attachments are for enrolled users");
    assert!(view.next_chapter.is_none(), "no next pointer behind the paywall");
}

#[tokio::test]
async fn free_chapter_is_watchable_without_entitlement_but_untracked() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    common::create_free_published_chapter(&db, course.id, "Preview").await;
    let second = common::create_published_chapter(&db, course.id, "Two").await;
    let course = db.courses().publish(course.id).await.unwrap();
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    let preview_id = db.chapters().list_for_course(course.id).await.unwrap()[0].id;
    let view = students
        .chapter_view(user_id, course.id, preview_id)
        .await
        .unwrap();

    assert!(!view.locked);
    assert!(!view.complete_on_end, "free viewers accrue no tracked progress");
    assert_eq!(view.next_chapter.as_ref().map(|c| c.id), Some(second.id));
}

#[tokio::test]
async fn purchased_chapter_view_is_unlocked_with_attachments_and_next() {
    let db = common::test_db().await;
    let (course, chapters) = common::create_published_course(&db, Uuid::new_v4(), 2).await;
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    db.purchases().record(user_id, course.id).await.unwrap();
    db.attachments()
        .add(course.id, "Notes", "https://example.com/notes.pdf")
        .await
        .unwrap();

    let view = students
        .chapter_view(user_id, course.id, chapters[0].id)
        .await
        .unwrap();

    assert!(!view.locked);
    assert!(view.has_entitlement);
    assert!(view.complete_on_end);
    assert_eq!(view.attachments.len(), 1);
    assert_eq!(view.next_chapter.as_ref().map(|c| c.id), Some(chapters[1].id));
}

#[tokio::test]
async fn already_completed_chapter_does_not_complete_on_end() {
    let db = common::test_db().await;
    let (course, chapters) = common::create_published_course(&db, Uuid::new_v4(), 1).await;
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    db.purchases().record(user_id, course.id).await.unwrap();
    db.progress()
        .mark_complete(user_id, chapters[0].id, true)
        .await
        .unwrap();

    let view = students
        .chapter_view(user_id, course.id, chapters[0].id)
        .await
        .unwrap();
    assert!(!view.complete_on_end);
    assert!(view.user_progress.unwrap().is_completed);
}

#[tokio::test]
async fn unpublished_chapter_view_is_not_found() {
    let db = common::test_db().await;
    let (course, _) = common::create_published_course(&db, Uuid::new_v4(), 1).await;
    let draft = common::create_ready_chapter(&db, course.id, "Draft").await;
    let students = StudentService::new(db.clone());

    let err = students
        .chapter_view(Uuid::new_v4(), course.id, draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn complete_chapter_upserts_and_returns_next_for_entitled_users() {
    let db = common::test_db().await;
    let (course, chapters) = common::create_published_course(&db, Uuid::new_v4(), 2).await;
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    db.purchases().record(user_id, course.id).await.unwrap();

    let outcome = students
        .complete_chapter(user_id, chapters[0].id, true)
        .await
        .unwrap();

    assert!(outcome.progress.unwrap().is_completed);
    assert_eq!(outcome.next_chapter_id, Some(chapters[1].id));

    let stored = db.progress().get(user_id, chapters[0].id).await.unwrap();
    assert!(stored.unwrap().is_completed);
}

#[tokio::test]
async fn completion_requires_entitlement() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let free = common::create_free_published_chapter(&db, course.id, "Preview").await;
    db.courses().publish(course.id).await.unwrap();
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    // End-of-video on a free chapter without a purchase: no progress row.
    let outcome = students
        .complete_chapter(user_id, free.id, true)
        .await
        .unwrap();

    assert!(outcome.progress.is_none());
    assert!(db.progress().get(user_id, free.id).await.unwrap().is_none());
}

#[tokio::test]
async fn resume_point_and_course_progress_track_completion() {
    let db = common::test_db().await;
    let (course, chapters) = common::create_published_course(&db, Uuid::new_v4(), 3).await;
    let students = StudentService::new(db.clone());
    let user_id = Uuid::new_v4();

    db.purchases().record(user_id, course.id).await.unwrap();

    let resume = students.resume_point(user_id, course.id).await.unwrap().unwrap();
    assert_eq!(resume.id, chapters[0].id);

    students
        .complete_chapter(user_id, chapters[0].id, true)
        .await
        .unwrap();

    let resume = students.resume_point(user_id, course.id).await.unwrap().unwrap();
    assert_eq!(resume.id, chapters[1].id);

    let ratio = students.course_progress(user_id, course.id).await.unwrap();
    assert!((ratio - 1.0 / 3.0).abs() < f64::EPSILON);
}
