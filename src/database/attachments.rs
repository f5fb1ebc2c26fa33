// ABOUTME: Database operations for course attachments
// ABOUTME: Add, list, and delete downloadable files owned by a course
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Attachment;

/// Attachment database operations manager
pub struct AttachmentsManager {
    pool: SqlitePool,
}

impl AttachmentsManager {
    /// Create a new attachments manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add an attachment to a course
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn add(&self, course_id: Uuid, name: &str, url: &str) -> AppResult<Attachment> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO attachments (id, course_id, name, url, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(id.to_string())
        .bind(course_id.to_string())
        .bind(name)
        .bind(url)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add attachment: {e}")))?;

        Ok(Attachment {
            id,
            course_id,
            name: name.to_owned(),
            url: url.to_owned(),
            created_at: now,
        })
    }

    /// List a course's attachments, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_course(&self, course_id: Uuid) -> AppResult<Vec<Attachment>> {
        let rows = sqlx::query(
            r"
            SELECT id, course_id, name, url, created_at
            FROM attachments
            WHERE course_id = ?1
            ORDER BY created_at DESC
            ",
        )
        .bind(course_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        rows.iter().map(attachment_from_row).collect()
    }

    /// Delete an attachment, scoped to its course
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the attachment doesn't exist in the course, or a
    /// database error.
    pub async fn delete(&self, attachment_id: Uuid, course_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM attachments WHERE id = ?1 AND course_id = ?2")
            .bind(attachment_id.to_string())
            .bind(course_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete attachment: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Attachment"));
        }
        Ok(())
    }
}

fn attachment_from_row(row: &SqliteRow) -> AppResult<Attachment> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
    let course_id_str: String = row
        .try_get("course_id")
        .map_err(|e| AppError::database(format!("Failed to get course_id: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to get created_at: {e}")))?;

    Ok(Attachment {
        id: Uuid::parse_str(&id_str)?,
        course_id: Uuid::parse_str(&course_id_str)?,
        name: row
            .try_get("name")
            .map_err(|e| AppError::database(format!("Failed to get name: {e}")))?,
        url: row
            .try_get("url")
            .map_err(|e| AppError::database(format!("Failed to get url: {e}")))?,
        created_at,
    })
}
