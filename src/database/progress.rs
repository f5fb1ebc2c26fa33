// ABOUTME: Database operations for user progress
// ABOUTME: Idempotent completion upserts, completion ratios, and resume lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Chapter, UserProgress};

/// User progress database operations manager
///
/// Progress is keyed by (user, chapter) with upsert-only writes, so replayed
/// end-of-video events never create duplicate rows. Course-level figures are
/// derived on demand from published chapters only.
pub struct ProgressManager {
    pool: SqlitePool,
}

impl ProgressManager {
    /// Create a new progress manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert a user's completion mark for a chapter
    ///
    /// Inserts a new row or updates the existing one atomically via
    /// `ON CONFLICT`. Idempotent: resubmitting the same value yields the same
    /// final state and exactly one row per (user, chapter).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn mark_complete(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        is_completed: bool,
    ) -> AppResult<UserProgress> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            r"
            INSERT INTO user_progress (id, user_id, chapter_id, is_completed, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT (user_id, chapter_id) DO UPDATE SET
                is_completed = excluded.is_completed,
                updated_at = excluded.updated_at
            RETURNING id, user_id, chapter_id, is_completed, created_at, updated_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(chapter_id.to_string())
        .bind(is_completed)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert user progress: {e}")))?;

        progress_from_row(&row)
    }

    /// Get a user's progress row for a chapter, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, user_id: Uuid, chapter_id: Uuid) -> AppResult<Option<UserProgress>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, chapter_id, is_completed, created_at, updated_at
            FROM user_progress
            WHERE user_id = ?1 AND chapter_id = ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(chapter_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| progress_from_row(&r)).transpose()
    }

    /// Count the user's completed chapters among a course's published chapters
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn completed_count(&self, user_id: Uuid, course_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) AS completed
            FROM user_progress up
            JOIN chapters c ON c.id = up.chapter_id
            WHERE up.user_id = ?1
              AND c.course_id = ?2
              AND c.is_published = 1
              AND up.is_completed = 1
            ",
        )
        .bind(user_id.to_string())
        .bind(course_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.try_get("completed")
            .map_err(|e| AppError::database(format!("Failed to get completed count: {e}")))
    }

    /// Compute the user's completion ratio for a course, in [0, 1]
    ///
    /// Completed published chapters over total published chapters. Unpublished
    /// chapters never count on either side. A course with zero published
    /// chapters yields 0 by convention rather than a division error.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    #[allow(clippy::cast_precision_loss)]
    pub async fn completion_ratio(&self, user_id: Uuid, course_id: Uuid) -> AppResult<f64> {
        let published = super::chapters::ChaptersManager::new(self.pool.clone())
            .count_published(course_id)
            .await?;
        if published == 0 {
            return Ok(0.0);
        }

        let completed = self.completed_count(user_id, course_id).await?;
        Ok(completed as f64 / published as f64)
    }

    /// Find the user's resume point: the first published chapter in position
    /// order without a completed progress row
    ///
    /// Returns `None` when the user has completed every published chapter (or
    /// the course has none).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn first_incomplete_chapter(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Chapter>> {
        let row = sqlx::query(
            r"
            SELECT c.id, c.course_id, c.title, c.description, c.video_url, c.position,
                   c.is_published, c.is_free, c.created_at, c.updated_at
            FROM chapters c
            LEFT JOIN user_progress up
                   ON up.chapter_id = c.id AND up.user_id = ?1
            WHERE c.course_id = ?2
              AND c.is_published = 1
              AND COALESCE(up.is_completed, 0) = 0
            ORDER BY c.position ASC, c.id ASC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(course_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| super::chapters::chapter_from_row(&r)).transpose()
    }
}

/// Map a user progress row into the model
fn progress_from_row(row: &SqliteRow) -> AppResult<UserProgress> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
    let user_id_str: String = row
        .try_get("user_id")
        .map_err(|e| AppError::database(format!("Failed to get user_id: {e}")))?;
    let chapter_id_str: String = row
        .try_get("chapter_id")
        .map_err(|e| AppError::database(format!("Failed to get chapter_id: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to get created_at: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| AppError::database(format!("Failed to get updated_at: {e}")))?;

    Ok(UserProgress {
        id: Uuid::parse_str(&id_str)?,
        user_id: Uuid::parse_str(&user_id_str)?,
        chapter_id: Uuid::parse_str(&chapter_id_str)?,
        is_completed: row
            .try_get("is_completed")
            .map_err(|e| AppError::database(format!("Failed to get is_completed: {e}")))?,
        created_at,
        updated_at,
    })
}
