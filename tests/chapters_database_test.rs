// ABOUTME: Integration tests for chapter storage
// ABOUTME: Append-position creation, partial updates, publish validation, and scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use uuid::Uuid;

use aula::errors::AppError;
use aula::models::UpdateChapterRequest;

#[tokio::test]
async fn chapters_are_appended_at_max_plus_one() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;

    let first = db.chapters().create(course.id, "Intro").await.unwrap();
    let second = db.chapters().create(course.id, "Basics").await.unwrap();
    let third = db.chapters().create(course.id, "Advanced").await.unwrap();

    assert_eq!(first.position, 1);
    assert_eq!(second.position, 2);
    assert_eq!(third.position, 3);

    let listed = db.chapters().list_for_course(course.id).await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "Basics", "Advanced"]);
}

#[tokio::test]
async fn positions_are_independent_per_course() {
    let db = common::test_db().await;
    let course_a = common::create_ready_course(&db, Uuid::new_v4()).await;
    let course_b = common::create_ready_course(&db, Uuid::new_v4()).await;

    db.chapters().create(course_a.id, "A1").await.unwrap();
    db.chapters().create(course_a.id, "A2").await.unwrap();
    let b1 = db.chapters().create(course_b.id, "B1").await.unwrap();

    assert_eq!(b1.position, 1);
}

#[tokio::test]
async fn update_merges_partial_fields() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = db.chapters().create(course.id, "Intro").await.unwrap();

    let updated = db
        .chapters()
        .update(
            chapter.id,
            &UpdateChapterRequest {
                description: Some("What this course covers".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Intro");
    assert_eq!(updated.description.as_deref(), Some("What this course covers"));
    assert!(updated.video_url.is_none());

    let reloaded = db.chapters().get(chapter.id).await.unwrap().unwrap();
    assert_eq!(reloaded.description.as_deref(), Some("What this course covers"));
}

#[tokio::test]
async fn publishing_an_incomplete_chapter_fails_with_validation() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = db.chapters().create(course.id, "Intro").await.unwrap();

    let err = db.chapters().publish(chapter.id).await.unwrap_err();
    match err {
        AppError::Validation(msg) => {
            assert!(msg.contains("description"), "unexpected message: {msg}");
            assert!(msg.contains("video_url"), "unexpected message: {msg}");
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    // A rejected publish leaves the chapter a draft.
    let reloaded = db.chapters().get(chapter.id).await.unwrap().unwrap();
    assert!(!reloaded.is_published);
}

#[tokio::test]
async fn publishing_a_complete_chapter_succeeds() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = common::create_ready_chapter(&db, course.id, "Intro").await;

    let published = db.chapters().publish(chapter.id).await.unwrap();
    assert!(published.is_published);

    let reloaded = db.chapters().get(chapter.id).await.unwrap().unwrap();
    assert!(reloaded.is_published);
}

#[tokio::test]
async fn get_in_course_rejects_foreign_chapters() {
    let db = common::test_db().await;
    let course_a = common::create_ready_course(&db, Uuid::new_v4()).await;
    let course_b = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = db.chapters().create(course_a.id, "Intro").await.unwrap();

    assert!(db
        .chapters()
        .get_in_course(chapter.id, course_a.id)
        .await
        .unwrap()
        .is_some());
    assert!(db
        .chapters()
        .get_in_course(chapter.id, course_b.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn deleting_a_chapter_removes_its_progress_rows() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = common::create_published_chapter(&db, course.id, "Intro").await;
    let user_id = Uuid::new_v4();

    db.progress()
        .mark_complete(user_id, chapter.id, true)
        .await
        .unwrap();
    assert!(db.progress().get(user_id, chapter.id).await.unwrap().is_some());

    db.chapters().delete(chapter.id).await.unwrap();

    assert!(db.chapters().get(chapter.id).await.unwrap().is_none());
    assert!(db.progress().get(user_id, chapter.id).await.unwrap().is_none());
}

#[tokio::test]
async fn deleting_a_missing_chapter_is_not_found() {
    let db = common::test_db().await;
    let err = db.chapters().delete(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn publish_toggles_return_the_stored_row() {
    let db = common::test_db().await;
    let course = common::create_ready_course(&db, Uuid::new_v4()).await;
    let chapter = common::create_ready_chapter(&db, course.id, "One").await;

    let published = db.chapters().publish(chapter.id).await.unwrap();
    let stored = db.chapters().get(chapter.id).await.unwrap().unwrap();
    assert!(stored.is_published);
    assert_eq!(published.updated_at, stored.updated_at);

    let unpublished = db.chapters().unpublish(chapter.id).await.unwrap();
    let stored = db.chapters().get(chapter.id).await.unwrap().unwrap();
    assert!(!stored.is_published);
    assert_eq!(unpublished.updated_at, stored.updated_at);
}
