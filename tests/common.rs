// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory database creation and course/chapter fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors
#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

//! Shared test utilities for the Aula engine
//!
//! Each test gets its own single-connection in-memory SQLite database with
//! the full schema applied.

use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use aula::database::Database;
use aula::models::{Chapter, Course, UpdateChapterRequest, UpdateCourseRequest};

/// Create a fresh in-memory database with migrations applied
///
/// A single connection keeps the in-memory database alive and shared for the
/// whole test.
pub async fn test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let db = Database::from_pool(pool);
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// Create a course with every publish-required field filled in
pub async fn create_ready_course(db: &Database, instructor_id: Uuid) -> Course {
    let category = db.categories().upsert_by_name("Beginner Level").await.unwrap();
    let course = db.courses().create(instructor_id, "Test Course").await.unwrap();
    db.courses()
        .update(
            course.id,
            &UpdateCourseRequest {
                description: Some("A course used in tests".to_owned()),
                image_url: Some("https://example.com/cover.png".to_owned()),
                category_id: Some(category.id),
                price: Some(9.99),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

/// Create a chapter with publish-required fields filled in, still a draft
pub async fn create_ready_chapter(db: &Database, course_id: Uuid, title: &str) -> Chapter {
    let chapter = db.chapters().create(course_id, title).await.unwrap();
    db.chapters()
        .update(
            chapter.id,
            &UpdateChapterRequest {
                description: Some(format!("Description for {title}")),
                video_url: Some("https://example.com/video.mp4".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

/// Create and publish a chapter
pub async fn create_published_chapter(db: &Database, course_id: Uuid, title: &str) -> Chapter {
    let chapter = create_ready_chapter(db, course_id, title).await;
    db.chapters().publish(chapter.id).await.unwrap()
}

/// Create, publish, and mark a chapter free
pub async fn create_free_published_chapter(db: &Database, course_id: Uuid, title: &str) -> Chapter {
    let chapter = create_ready_chapter(db, course_id, title).await;
    db.chapters()
        .update(
            chapter.id,
            &UpdateChapterRequest {
                is_free: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    db.chapters().publish(chapter.id).await.unwrap()
}

/// Create a fully published course with `chapter_count` published chapters
pub async fn create_published_course(
    db: &Database,
    instructor_id: Uuid,
    chapter_count: usize,
) -> (Course, Vec<Chapter>) {
    let course = create_ready_course(db, instructor_id).await;
    let mut chapters = Vec::with_capacity(chapter_count);
    for i in 0..chapter_count {
        chapters.push(create_published_chapter(db, course.id, &format!("Chapter {}", i + 1)).await);
    }
    let course = db.courses().publish(course.id).await.unwrap();
    (course, chapters)
}
