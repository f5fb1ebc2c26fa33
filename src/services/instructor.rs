// ABOUTME: Instructor-facing authoring services
// ABOUTME: Ownership-checked course and chapter mutations, reorder, and attachments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use serde::Serialize;
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Attachment, Chapter, Course, CourseWithChapters, UpdateChapterRequest, UpdateCourseRequest,
};
use crate::publication;

/// Field-completion summary for the course setup screen
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SetupProgress {
    /// Requirements already satisfied
    pub completed: usize,
    /// Total requirements before the course can be published
    pub total: usize,
}

/// Instructor-side service: every mutation verifies course ownership first
///
/// A caller who does not own the course gets `Unauthorized`, regardless of
/// whether the target chapter or attachment exists.
pub struct InstructorService {
    db: Database,
}

impl InstructorService {
    /// Create a new instructor service
    #[must_use]
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create a course owned by the caller
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_course(&self, instructor_id: Uuid, title: &str) -> AppResult<Course> {
        self.db.courses().create(instructor_id, title).await
    }

    /// Fetch an owned course with its ordered chapters
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn course_setup(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<CourseWithChapters> {
        let course = self.require_ownership(instructor_id, course_id).await?;
        let chapters = self.db.chapters().list_for_course(course_id).await?;
        Ok(CourseWithChapters { course, chapters })
    }

    /// How many publish requirements the course currently satisfies
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn setup_progress(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<SetupProgress> {
        let with_chapters = self.course_setup(instructor_id, course_id).await?;
        let total = 5;
        let missing =
            publication::course_publish_blockers(&with_chapters.course, &with_chapters.chapters)
                .len();
        Ok(SetupProgress {
            completed: total - missing,
            total,
        })
    }

    /// Update course fields
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn update_course(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        request: &UpdateCourseRequest,
    ) -> AppResult<Course> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.courses().update(course_id, request).await
    }

    /// Publish a course, re-validating its invariant at toggle time
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `Validation` naming the
    /// missing requirements.
    pub async fn publish_course(&self, instructor_id: Uuid, course_id: Uuid) -> AppResult<Course> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.courses().publish(course_id).await
    }

    /// Unpublish a course
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn unpublish_course(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Course> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.courses().unpublish(course_id).await
    }

    /// Delete a course and everything it owns
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn delete_course(&self, instructor_id: Uuid, course_id: Uuid) -> AppResult<()> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.courses().delete(course_id).await
    }

    /// Append a new chapter to an owned course
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn create_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        title: &str,
    ) -> AppResult<Chapter> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.chapters().create(course_id, title).await
    }

    /// Update chapter fields
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `NotFound` if the chapter
    /// is not in the course.
    pub async fn update_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
        request: &UpdateChapterRequest,
    ) -> AppResult<Chapter> {
        self.require_chapter(instructor_id, course_id, chapter_id)
            .await?;
        self.db.chapters().update(chapter_id, request).await
    }

    /// Publish a chapter, re-validating its invariant at toggle time
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, `NotFound` if the chapter is
    /// not in the course, or `Validation` naming the missing fields.
    pub async fn publish_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> AppResult<Chapter> {
        self.require_chapter(instructor_id, course_id, chapter_id)
            .await?;
        self.db.chapters().publish(chapter_id).await
    }

    /// Unpublish a chapter; the course-level cascade check runs in the same
    /// transaction
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `NotFound` if the chapter
    /// is not in the course.
    pub async fn unpublish_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> AppResult<Chapter> {
        self.require_chapter(instructor_id, course_id, chapter_id)
            .await?;
        self.db.chapters().unpublish(chapter_id).await
    }

    /// Delete a chapter; the course-level cascade check runs in the same
    /// transaction
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `NotFound` if the chapter
    /// is not in the course.
    pub async fn delete_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> AppResult<Chapter> {
        self.require_chapter(instructor_id, course_id, chapter_id)
            .await?;
        self.db.chapters().delete(chapter_id).await
    }

    /// Rewrite the course's chapter ordering
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `InvalidOrdering` when
    /// the input is not an exact permutation of the course's chapter ids.
    pub async fn reorder_chapters(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        ordered_chapter_ids: &[Uuid],
    ) -> AppResult<()> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.chapters().reorder(course_id, ordered_chapter_ids).await
    }

    /// Add an attachment to an owned course
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the caller does not own the course.
    pub async fn add_attachment(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        name: &str,
        url: &str,
    ) -> AppResult<Attachment> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.attachments().add(course_id, name, url).await
    }

    /// Delete an attachment from an owned course
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` without ownership, or `NotFound` if no such
    /// attachment exists in the course.
    pub async fn delete_attachment(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        attachment_id: Uuid,
    ) -> AppResult<()> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db.attachments().delete(attachment_id, course_id).await
    }

    async fn require_ownership(&self, instructor_id: Uuid, course_id: Uuid) -> AppResult<Course> {
        self.db
            .courses()
            .get_owned(course_id, instructor_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("caller does not own this course"))
    }

    async fn require_chapter(
        &self,
        instructor_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> AppResult<Chapter> {
        self.require_ownership(instructor_id, course_id).await?;
        self.db
            .chapters()
            .get_in_course(chapter_id, course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))
    }
}
