// ABOUTME: Publication validator for courses and chapters
// ABOUTME: Pure field-completeness checks and the cascading-unpublish re-derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use crate::errors::{AppError, AppResult};
use crate::models::{Chapter, Course};

/// Fields required before a chapter may be published
///
/// Returns the names of the missing fields, empty when publishable.
#[must_use]
pub fn chapter_publish_blockers(chapter: &Chapter) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if chapter.title.trim().is_empty() {
        missing.push("title");
    }
    if !has_text(chapter.description.as_deref()) {
        missing.push("description");
    }
    if !has_text(chapter.video_url.as_deref()) {
        missing.push("video_url");
    }
    missing
}

/// Fields and content required before a course may be published
///
/// `chapters` is the course's full chapter set; at least one must already be
/// published. Returns the names of the missing requirements, empty when
/// publishable.
#[must_use]
pub fn course_publish_blockers(course: &Course, chapters: &[Chapter]) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if course.title.trim().is_empty() {
        missing.push("title");
    }
    if !has_text(course.description.as_deref()) {
        missing.push("description");
    }
    if !has_text(course.image_url.as_deref()) {
        missing.push("image_url");
    }
    if course.category_id.is_none() {
        missing.push("category_id");
    }
    if !chapters.iter().any(|c| c.is_published) {
        missing.push("published_chapter");
    }
    missing
}

/// Whether the chapter satisfies its publish invariant
#[must_use]
pub fn can_publish_chapter(chapter: &Chapter) -> bool {
    chapter_publish_blockers(chapter).is_empty()
}

/// Whether the course satisfies its publish invariant
#[must_use]
pub fn can_publish_course(course: &Course, chapters: &[Chapter]) -> bool {
    course_publish_blockers(course, chapters).is_empty()
}

/// Validate a chapter publish attempt, naming the missing fields on failure
///
/// # Errors
///
/// Returns `Validation` listing every missing field.
pub fn validate_chapter_publish(chapter: &Chapter) -> AppResult<()> {
    let missing = chapter_publish_blockers(chapter);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "chapter is missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Validate a course publish attempt, naming the missing requirements on failure
///
/// # Errors
///
/// Returns `Validation` listing every missing field, with `published_chapter`
/// standing in for the at-least-one-published-chapter requirement.
pub fn validate_course_publish(course: &Course, chapters: &[Chapter]) -> AppResult<()> {
    let missing = course_publish_blockers(course, chapters);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(format!(
            "course is missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Re-derive the course-level publish invariant after a chapter unpublish or
/// delete: a course with zero published chapters must not stay published
///
/// Invoked transactionally with every chapter unpublish/delete - it is an
/// invariant-preservation step, not optional cleanup. It only ever forces an
/// unpublish; republishing is always an explicit instructor action.
#[must_use]
pub fn course_must_unpublish(remaining_published_chapters: i64) -> bool {
    remaining_published_chapters == 0
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
