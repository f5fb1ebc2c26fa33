// ABOUTME: Core data models for the Aula course platform engine
// ABOUTME: Courses, chapters, attachments, categories, user progress, and purchases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course authored by an instructor, composed of ordered chapters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique identifier
    pub id: Uuid,
    /// Instructor who owns the course; all authoring mutations require ownership
    pub instructor_id: Uuid,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Optional cover image URL
    pub image_url: Option<String>,
    /// Optional price; entitlement itself is tracked via purchases
    pub price: Option<f64>,
    /// Optional category
    pub category_id: Option<Uuid>,
    /// Whether the course is visible to students
    pub is_published: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A chapter within a course, ordered by `position` (dense 1..N per course)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    /// Unique identifier
    pub id: Uuid,
    /// Owning course
    pub course_id: Uuid,
    /// Display title
    pub title: String,
    /// Optional rich-text description
    pub description: Option<String>,
    /// Optional video URL (playback is external to the engine)
    pub video_url: Option<String>,
    /// 1-based position within the course
    pub position: i64,
    /// Whether the chapter is visible to students
    pub is_published: bool,
    /// Free chapters are watchable without a purchase
    pub is_free: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A downloadable file attached to a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier
    pub id: Uuid,
    /// Owning course
    pub course_id: Uuid,
    /// Display name
    pub name: String,
    /// Download URL
    pub url: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A course category (flat taxonomy, unique by name)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: Uuid,
    /// Unique display name
    pub name: String,
}

/// A user's completion mark for a chapter
///
/// At most one row exists per (user, chapter); writes go through an upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    /// Unique identifier
    pub id: Uuid,
    /// The student
    pub user_id: Uuid,
    /// The chapter the mark applies to
    pub chapter_id: Uuid,
    /// Whether the user has completed the chapter
    pub is_completed: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// An entitlement fact: presence of a (user, course) row means the user
/// may watch paid chapters and accrue tracked progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier
    pub id: Uuid,
    /// The purchasing user
    pub user_id: Uuid,
    /// The purchased course
    pub course_id: Uuid,
    /// Purchase timestamp
    pub created_at: DateTime<Utc>,
}

/// A course together with its chapters ordered by position ascending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseWithChapters {
    /// The course
    pub course: Course,
    /// Chapters ordered by position ascending
    pub chapters: Vec<Chapter>,
}

/// Request to update course fields; `None` leaves the stored value unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    /// New title (if provided)
    pub title: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New cover image URL (if provided)
    pub image_url: Option<String>,
    /// New price (if provided)
    pub price: Option<f64>,
    /// New category (if provided)
    pub category_id: Option<Uuid>,
}

/// Request to update chapter fields; `None` leaves the stored value unchanged
///
/// Publish state is never toggled through this request - it goes through the
/// explicit publish/unpublish operations so the invariant checks always run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChapterRequest {
    /// New title (if provided)
    pub title: Option<String>,
    /// New description (if provided)
    pub description: Option<String>,
    /// New video URL (if provided)
    pub video_url: Option<String>,
    /// New free-preview flag (if provided)
    pub is_free: Option<bool>,
}
