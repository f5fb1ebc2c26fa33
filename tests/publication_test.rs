// ABOUTME: Unit tests for the publication validator
// ABOUTME: Field-completeness blockers and the cascading-unpublish predicate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

#![allow(missing_docs, clippy::unwrap_used)]

use chrono::Utc;
use uuid::Uuid;

use aula::errors::AppError;
use aula::models::{Chapter, Course};
use aula::publication;

fn draft_course() -> Course {
    let now = Utc::now();
    Course {
        id: Uuid::new_v4(),
        instructor_id: Uuid::new_v4(),
        title: "Test Course".to_owned(),
        description: None,
        image_url: None,
        price: None,
        category_id: None,
        is_published: false,
        created_at: now,
        updated_at: now,
    }
}

fn draft_chapter(course_id: Uuid, position: i64) -> Chapter {
    let now = Utc::now();
    Chapter {
        id: Uuid::new_v4(),
        course_id,
        title: "Test Chapter".to_owned(),
        description: None,
        video_url: None,
        position,
        is_published: false,
        is_free: false,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn chapter_blockers_name_every_missing_field() {
    let mut chapter = draft_chapter(Uuid::new_v4(), 1);
    assert_eq!(
        publication::chapter_publish_blockers(&chapter),
        vec!["description", "video_url"]
    );

    chapter.title = String::new();
    assert_eq!(
        publication::chapter_publish_blockers(&chapter),
        vec!["title", "description", "video_url"]
    );
}

#[test]
fn blank_strings_do_not_satisfy_required_fields() {
    let mut chapter = draft_chapter(Uuid::new_v4(), 1);
    chapter.description = Some("   ".to_owned());
    chapter.video_url = Some(String::new());
    assert!(!publication::can_publish_chapter(&chapter));
}

#[test]
fn complete_chapter_is_publishable() {
    let mut chapter = draft_chapter(Uuid::new_v4(), 1);
    chapter.description = Some("About this chapter".to_owned());
    chapter.video_url = Some("https://example.com/video.mp4".to_owned());
    assert!(publication::can_publish_chapter(&chapter));
    publication::validate_chapter_publish(&chapter).unwrap();
}

#[test]
fn chapter_validation_error_names_the_missing_field() {
    let mut chapter = draft_chapter(Uuid::new_v4(), 1);
    chapter.video_url = Some("https://example.com/video.mp4".to_owned());

    let err = publication::validate_chapter_publish(&chapter).unwrap_err();
    match err {
        AppError::Validation(msg) => {
            assert!(msg.contains("description"), "unexpected message: {msg}");
            assert!(!msg.contains("video_url"), "unexpected message: {msg}");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn course_requires_fields_and_a_published_chapter() {
    let course = draft_course();
    let missing = publication::course_publish_blockers(&course, &[]);
    assert_eq!(
        missing,
        vec!["description", "image_url", "category_id", "published_chapter"]
    );
}

#[test]
fn course_with_only_draft_chapters_is_not_publishable() {
    let mut course = draft_course();
    course.description = Some("About".to_owned());
    course.image_url = Some("https://example.com/cover.png".to_owned());
    course.category_id = Some(Uuid::new_v4());

    let chapters = vec![draft_chapter(course.id, 1), draft_chapter(course.id, 2)];
    assert_eq!(
        publication::course_publish_blockers(&course, &chapters),
        vec!["published_chapter"]
    );
}

#[test]
fn course_with_one_published_chapter_is_publishable() {
    let mut course = draft_course();
    course.description = Some("About".to_owned());
    course.image_url = Some("https://example.com/cover.png".to_owned());
    course.category_id = Some(Uuid::new_v4());

    let mut published = draft_chapter(course.id, 1);
    published.is_published = true;
    let chapters = vec![published, draft_chapter(course.id, 2)];

    assert!(publication::can_publish_course(&course, &chapters));
    publication::validate_course_publish(&course, &chapters).unwrap();
}

#[test]
fn cascade_predicate_fires_only_at_zero_published() {
    assert!(publication::course_must_unpublish(0));
    assert!(!publication::course_must_unpublish(1));
    assert!(!publication::course_must_unpublish(5));
}
