// ABOUTME: Student-facing playback services
// ABOUTME: Chapter view assembly, end-of-video completion handling, and resume points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::access::{self, ChapterAccess};
use crate::database::Database;
use crate::entitlement::EntitlementSource;
use crate::errors::{AppError, AppResult};
use crate::models::{Attachment, Chapter, Course, UserProgress};

/// Everything the chapter player needs for one (user, chapter) request
#[derive(Debug, Clone, Serialize)]
pub struct ChapterView {
    /// The requested chapter
    pub chapter: Chapter,
    /// Its owning course
    pub course: Course,
    /// Course attachments, only exposed to entitled users
    pub attachments: Vec<Attachment>,
    /// The next published chapter for auto-advance, if any
    pub next_chapter: Option<Chapter>,
    /// The user's progress row for this chapter, if any
    pub user_progress: Option<UserProgress>,
    /// Whether the user holds an entitlement to the course
    pub has_entitlement: bool,
    /// Whether playback is locked behind a purchase (a paywall, not an error)
    pub locked: bool,
    /// Whether the player should fire completion when the video ends
    pub complete_on_end: bool,
}

/// Result of handling an end-of-video or manual completion toggle
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    /// The upserted progress row, absent when the caller was not eligible
    pub progress: Option<UserProgress>,
    /// The next published chapter id for auto-advance, if any
    pub next_chapter_id: Option<Uuid>,
}

/// Student-side service: playback access, completion tracking, and resume
pub struct StudentService {
    db: Database,
    entitlements: Arc<dyn EntitlementSource>,
}

impl StudentService {
    /// Create a service backed by the purchases table
    #[must_use]
    pub fn new(db: Database) -> Self {
        let entitlements: Arc<dyn EntitlementSource> = Arc::new(db.purchases());
        Self { db, entitlements }
    }

    /// Create a service with a custom entitlement source
    #[must_use]
    pub fn with_entitlements(db: Database, entitlements: Arc<dyn EntitlementSource>) -> Self {
        Self { db, entitlements }
    }

    /// Assemble the chapter player view
    ///
    /// Resolves the chapter within its course, evaluates access from the
    /// entitlement fact, and gathers progress, attachments (entitled users
    /// only), and the next published chapter for auto-advance. A locked
    /// chapter is returned as a view with `locked = true`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course or chapter is absent or the chapter
    /// is unpublished, or a database error.
    pub async fn chapter_view(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        chapter_id: Uuid,
    ) -> AppResult<ChapterView> {
        let course = self
            .db
            .courses()
            .get(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;

        let chapter = self
            .db
            .chapters()
            .get_in_course(chapter_id, course_id)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        let has_entitlement = self.entitlements.has_entitlement(user_id, course_id).await?;
        let ChapterAccess {
            locked,
            completion_eligible,
        } = access::evaluate_chapter(&chapter, has_entitlement);

        let user_progress = self.db.progress().get(user_id, chapter_id).await?;
        let already_completed = user_progress.as_ref().is_some_and(|p| p.is_completed);

        let attachments = if has_entitlement {
            self.db.attachments().list_for_course(course_id).await?
        } else {
            Vec::new()
        };

        let next_chapter = if locked {
            None
        } else {
            self.db
                .chapters()
                .next_published_chapter(course_id, chapter.position)
                .await?
        };

        Ok(ChapterView {
            complete_on_end: completion_eligible && !already_completed,
            chapter,
            course,
            attachments,
            next_chapter,
            user_progress,
            has_entitlement,
            locked,
        })
    }

    /// Handle the end-of-video event (or a manual completion toggle)
    ///
    /// Upserts the user's completion mark and returns the next published
    /// chapter id for auto-advance. Completion tracking requires an active
    /// entitlement: for unentitled viewers of free chapters the upsert is
    /// skipped and the current state is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter is absent, or a database error.
    pub async fn complete_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        is_completed: bool,
    ) -> AppResult<CompletionOutcome> {
        let chapter = self
            .db
            .chapters()
            .get(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        let has_entitlement = self
            .entitlements
            .has_entitlement(user_id, chapter.course_id)
            .await?;
        let verdict = access::evaluate_chapter(&chapter, has_entitlement);

        let progress = if verdict.completion_eligible {
            Some(
                self.db
                    .progress()
                    .mark_complete(user_id, chapter_id, is_completed)
                    .await?,
            )
        } else {
            debug!(user_id = %user_id, chapter_id = %chapter_id, "Completion skipped: no entitlement");
            self.db.progress().get(user_id, chapter_id).await?
        };

        let next_chapter_id = self
            .db
            .chapters()
            .next_published_chapter(chapter.course_id, chapter.position)
            .await?
            .map(|c| c.id);

        Ok(CompletionOutcome {
            progress,
            next_chapter_id,
        })
    }

    /// The user's resume point: the first published chapter without a
    /// completed mark, or `None` when the course is fully completed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resume_point(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Option<Chapter>> {
        self.db
            .progress()
            .first_incomplete_chapter(user_id, course_id)
            .await
    }

    /// The user's completion ratio for a course, in [0, 1]
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn course_progress(&self, user_id: Uuid, course_id: Uuid) -> AppResult<f64> {
        self.db.progress().completion_ratio(user_id, course_id).await
    }
}
