// ABOUTME: Database operations for chapters
// ABOUTME: Append-position create, publish cascade checks, transactional reorder, next-chapter lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Chapter, UpdateChapterRequest};
use crate::publication;

/// Chapter database operations manager
///
/// Hosts the reordering engine and the position-ordered navigation queries in
/// addition to plain CRUD. Chapter unpublish and delete run the course-level
/// cascade check inside the same transaction: a course with zero published
/// chapters is forced unpublished.
pub struct ChaptersManager {
    pool: SqlitePool,
}

impl ChaptersManager {
    /// Create a new chapters manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new chapter appended at position max+1
    ///
    /// The position is assigned inside the insert statement so concurrent
    /// creates on the same course can't claim the same slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, course_id: Uuid, title: &str) -> AppResult<Chapter> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        let row = sqlx::query(
            r"
            INSERT INTO chapters (id, course_id, title, position, is_published, is_free, created_at, updated_at)
            VALUES (
                ?1, ?2, ?3,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM chapters WHERE course_id = ?2),
                0, 0, ?4, ?4
            )
            RETURNING position
            ",
        )
        .bind(id.to_string())
        .bind(course_id.to_string())
        .bind(title)
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create chapter: {e}")))?;

        let position: i64 = row
            .try_get("position")
            .map_err(|e| AppError::database(format!("Failed to get position: {e}")))?;

        Ok(Chapter {
            id,
            course_id,
            title: title.to_owned(),
            description: None,
            video_url: None,
            position,
            is_published: false,
            is_free: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a chapter by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, chapter_id: Uuid) -> AppResult<Option<Chapter>> {
        let row = sqlx::query(&format!("{CHAPTER_SELECT} WHERE id = ?1"))
            .bind(chapter_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| chapter_from_row(&r)).transpose()
    }

    /// Get a chapter by id, scoped to a course
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_in_course(
        &self,
        chapter_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Chapter>> {
        let row = sqlx::query(&format!(
            "{CHAPTER_SELECT} WHERE id = ?1 AND course_id = ?2"
        ))
        .bind(chapter_id.to_string())
        .bind(course_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| chapter_from_row(&r)).transpose()
    }

    /// List a course's chapters ordered by position ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Chapter>> {
        let rows = sqlx::query(&format!(
            "{CHAPTER_SELECT} WHERE course_id = ?1 ORDER BY position ASC, id ASC"
        ))
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        rows.iter().map(chapter_from_row).collect()
    }

    /// Count a course's published chapters
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count_published(&self, course_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS published FROM chapters WHERE course_id = ?1 AND is_published = 1",
        )
        .bind(course_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.try_get("published")
            .map_err(|e| AppError::database(format!("Failed to get published count: {e}")))
    }

    /// Apply a partial field update; `None` fields keep their stored value
    ///
    /// Publish state is never changed here - that goes through
    /// [`Self::publish`] / [`Self::unpublish`] so the invariants re-validate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter doesn't exist, or a database error.
    pub async fn update(
        &self,
        chapter_id: Uuid,
        request: &UpdateChapterRequest,
    ) -> AppResult<Chapter> {
        let chapter = self
            .get(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        let title = request.title.clone().unwrap_or(chapter.title);
        let description = request.description.clone().or(chapter.description);
        let video_url = request.video_url.clone().or(chapter.video_url);
        let is_free = request.is_free.unwrap_or(chapter.is_free);
        let now = Utc::now();

        sqlx::query(
            r"
            UPDATE chapters
            SET title = ?1, description = ?2, video_url = ?3, is_free = ?4, updated_at = ?5
            WHERE id = ?6
            ",
        )
        .bind(&title)
        .bind(&description)
        .bind(&video_url)
        .bind(is_free)
        .bind(now.to_rfc3339())
        .bind(chapter_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update chapter: {e}")))?;

        Ok(Chapter {
            title,
            description,
            video_url,
            is_free,
            updated_at: now,
            ..chapter
        })
    }

    /// Publish a chapter after re-validating its invariant at toggle time
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter doesn't exist, `Validation` naming
    /// the missing fields, or a database error.
    pub async fn publish(&self, chapter_id: Uuid) -> AppResult<Chapter> {
        let chapter = self
            .get(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        publication::validate_chapter_publish(&chapter)?;

        let now = Utc::now();
        sqlx::query("UPDATE chapters SET is_published = 1, updated_at = ?1 WHERE id = ?2")
            .bind(now.to_rfc3339())
            .bind(chapter_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to publish chapter: {e}")))?;

        Ok(Chapter {
            is_published: true,
            updated_at: now,
            ..chapter
        })
    }

    /// Unpublish a chapter and re-derive the course-level invariant in the
    /// same transaction
    ///
    /// If no published chapters remain, the owning course is forced
    /// unpublished. Forcing only ever unpublishes; republishing is always an
    /// explicit instructor action.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter doesn't exist, or a database error.
    pub async fn unpublish(&self, chapter_id: Uuid) -> AppResult<Chapter> {
        let chapter = self
            .get(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let now = Utc::now();
        sqlx::query("UPDATE chapters SET is_published = 0, updated_at = ?1 WHERE id = ?2")
            .bind(now.to_rfc3339())
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to unpublish chapter: {e}")))?;

        Self::cascade_course_unpublish(&mut tx, chapter.course_id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit chapter unpublish: {e}")))?;

        Ok(Chapter {
            is_published: false,
            updated_at: now,
            ..chapter
        })
    }

    /// Delete a chapter and its progress rows, re-deriving the course-level
    /// invariant in the same transaction
    ///
    /// Deleting is equivalent to unpublishing for the course invariant: if
    /// the last published chapter goes away, the course is forced
    /// unpublished. Remaining chapters keep their positions; the reordering
    /// engine reassigns a dense 1..N sequence on the next explicit reorder.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the chapter doesn't exist, or a database error.
    pub async fn delete(&self, chapter_id: Uuid) -> AppResult<Chapter> {
        let chapter = self
            .get(chapter_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chapter"))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query("DELETE FROM user_progress WHERE chapter_id = ?1")
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete chapter progress: {e}")))?;

        sqlx::query("DELETE FROM chapters WHERE id = ?1")
            .bind(chapter_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete chapter: {e}")))?;

        Self::cascade_course_unpublish(&mut tx, chapter.course_id).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit chapter delete: {e}")))?;

        info!(chapter_id = %chapter_id, course_id = %chapter.course_id, "Chapter deleted");
        Ok(chapter)
    }

    /// Rewrite a course's chapter positions to match `ordered_chapter_ids`
    ///
    /// The input must be an exact permutation of the course's current chapter
    /// ids - no additions, removals, or duplicates. The chapter at index i
    /// receives position i+1. Validation happens before any write, and the
    /// rewrite runs in a single transaction, so a rejected or failed reorder
    /// leaves stored positions untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOrdering` on a precondition violation, `Conflict` if
    /// the chapter set changed while the rewrite was in flight, or a database
    /// error.
    pub async fn reorder(&self, course_id: Uuid, ordered_chapter_ids: &[Uuid]) -> AppResult<()> {
        let current = self.list_for_course(course_id).await?;
        let current_ids: HashSet<Uuid> = current.iter().map(|c| c.id).collect();

        if ordered_chapter_ids.len() != current.len() {
            return Err(AppError::invalid_ordering(format!(
                "expected {} chapter ids, got {}",
                current.len(),
                ordered_chapter_ids.len()
            )));
        }

        let mut seen = HashSet::with_capacity(ordered_chapter_ids.len());
        for id in ordered_chapter_ids {
            if !current_ids.contains(id) {
                return Err(AppError::invalid_ordering(format!(
                    "chapter {id} does not belong to course {course_id}"
                )));
            }
            if !seen.insert(*id) {
                return Err(AppError::invalid_ordering(format!(
                    "chapter {id} appears more than once"
                )));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let now = Utc::now().to_rfc3339();
        for (index, chapter_id) in ordered_chapter_ids.iter().enumerate() {
            let position = i64::try_from(index)
                .map_err(|e| AppError::internal(format!("Chapter index out of range: {e}")))?
                + 1;

            let result = sqlx::query(
                "UPDATE chapters SET position = ?1, updated_at = ?2 WHERE id = ?3 AND course_id = ?4",
            )
            .bind(position)
            .bind(&now)
            .bind(chapter_id.to_string())
            .bind(course_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to reposition chapter: {e}")))?;

            // The chapter set was validated outside the transaction; a miss
            // here means it changed underfoot. Dropping tx rolls back.
            if result.rows_affected() == 0 {
                return Err(AppError::conflict(format!(
                    "chapter {chapter_id} was removed while reordering course {course_id}"
                )));
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit reorder: {e}")))?;

        info!(course_id = %course_id, chapters = ordered_chapter_ids.len(), "Chapters reordered");
        Ok(())
    }

    /// Resolve the next published chapter after `current_position`
    ///
    /// Returns the published chapter with the smallest position strictly
    /// greater than `current_position`, or `None` at the end of the course.
    /// Unpublished chapters are skipped - a student never navigates into one
    /// via "next". Positions are unique per course by invariant; if that is
    /// ever violated the lowest id wins and a data-integrity warning is
    /// logged rather than failing the lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn next_published_chapter(
        &self,
        course_id: Uuid,
        current_position: i64,
    ) -> AppResult<Option<Chapter>> {
        let rows = sqlx::query(&format!(
            r"
            {CHAPTER_SELECT}
            WHERE course_id = ?1 AND is_published = 1 AND position > ?2
            ORDER BY position ASC, id ASC
            LIMIT 2
            "
        ))
        .bind(course_id.to_string())
        .bind(current_position)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        let mut chapters = rows
            .iter()
            .map(chapter_from_row)
            .collect::<AppResult<Vec<_>>>()?;

        if chapters.len() == 2 && chapters[0].position == chapters[1].position {
            warn!(
                course_id = %course_id,
                position = chapters[0].position,
                "Duplicate chapter positions detected; resolving to lowest id"
            );
        }

        Ok(if chapters.is_empty() {
            None
        } else {
            Some(chapters.swap_remove(0))
        })
    }

    /// Force the course unpublished when it no longer has any published
    /// chapters, inside the caller's transaction
    async fn cascade_course_unpublish(
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        course_id: Uuid,
    ) -> AppResult<()> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS published FROM chapters WHERE course_id = ?1 AND is_published = 1",
        )
        .bind(course_id.to_string())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        let published: i64 = row
            .try_get("published")
            .map_err(|e| AppError::database(format!("Failed to get published count: {e}")))?;

        if publication::course_must_unpublish(published) {
            sqlx::query("UPDATE courses SET is_published = 0, updated_at = ?1 WHERE id = ?2")
                .bind(Utc::now().to_rfc3339())
                .bind(course_id.to_string())
                .execute(&mut **tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to unpublish course: {e}")))?;

            warn!(course_id = %course_id, "Course unpublished: no published chapters remain");
        }

        Ok(())
    }
}

pub(crate) const CHAPTER_SELECT: &str = r"
    SELECT id, course_id, title, description, video_url, position,
           is_published, is_free, created_at, updated_at
    FROM chapters
";

/// Map a chapter row into the model
///
/// # Errors
///
/// Returns an error if a column is missing or has an unexpected type.
pub(crate) fn chapter_from_row(row: &SqliteRow) -> AppResult<Chapter> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
    let course_id_str: String = row
        .try_get("course_id")
        .map_err(|e| AppError::database(format!("Failed to get course_id: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to get created_at: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| AppError::database(format!("Failed to get updated_at: {e}")))?;

    Ok(Chapter {
        id: Uuid::parse_str(&id_str)?,
        course_id: Uuid::parse_str(&course_id_str)?,
        title: row
            .try_get("title")
            .map_err(|e| AppError::database(format!("Failed to get title: {e}")))?,
        description: row
            .try_get("description")
            .map_err(|e| AppError::database(format!("Failed to get description: {e}")))?,
        video_url: row
            .try_get("video_url")
            .map_err(|e| AppError::database(format!("Failed to get video_url: {e}")))?,
        position: row
            .try_get("position")
            .map_err(|e| AppError::database(format!("Failed to get position: {e}")))?,
        is_published: row
            .try_get("is_published")
            .map_err(|e| AppError::database(format!("Failed to get is_published: {e}")))?,
        is_free: row
            .try_get("is_free")
            .map_err(|e| AppError::database(format!("Failed to get is_free: {e}")))?,
        created_at,
        updated_at,
    })
}
