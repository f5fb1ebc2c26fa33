// ABOUTME: Database operations for courses
// ABOUTME: CRUD, ownership lookup, and validated publish/unpublish transitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Chapter, Course, UpdateCourseRequest};
use crate::publication;

/// Course database operations manager
pub struct CoursesManager {
    pool: SqlitePool,
}

impl CoursesManager {
    /// Create a new courses manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new course owned by `instructor_id`
    ///
    /// Courses start unpublished with only a title; the remaining fields are
    /// filled in through updates before the first publish.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, instructor_id: Uuid, title: &str) -> AppResult<Course> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO courses (id, instructor_id, title, is_published, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4)
            ",
        )
        .bind(id.to_string())
        .bind(instructor_id.to_string())
        .bind(title)
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create course: {e}")))?;

        Ok(Course {
            id,
            instructor_id,
            title: title.to_owned(),
            description: None,
            image_url: None,
            price: None,
            category_id: None,
            is_published: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a course by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, course_id: Uuid) -> AppResult<Option<Course>> {
        let row = sqlx::query(&format!("{COURSE_SELECT} WHERE id = ?1"))
            .bind(course_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| course_from_row(&r)).transpose()
    }

    /// Get a course by id, but only if `instructor_id` owns it
    ///
    /// Used by every authoring mutation to enforce ownership.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_owned(
        &self,
        course_id: Uuid,
        instructor_id: Uuid,
    ) -> AppResult<Option<Course>> {
        let row = sqlx::query(&format!(
            "{COURSE_SELECT} WHERE id = ?1 AND instructor_id = ?2"
        ))
        .bind(course_id.to_string())
        .bind(instructor_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        row.map(|r| course_from_row(&r)).transpose()
    }

    /// Apply a partial field update; `None` fields keep their stored value
    ///
    /// Publish state is never changed here - that goes through
    /// [`Self::publish`] / [`Self::unpublish`] so the invariants re-validate.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course doesn't exist, or a database error.
    pub async fn update(
        &self,
        course_id: Uuid,
        request: &UpdateCourseRequest,
    ) -> AppResult<Course> {
        let course = self
            .get(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;

        let title = request.title.clone().unwrap_or(course.title);
        let description = request.description.clone().or(course.description);
        let image_url = request.image_url.clone().or(course.image_url);
        let price = request.price.or(course.price);
        let category_id = request.category_id.or(course.category_id);
        let now = Utc::now();

        sqlx::query(
            r"
            UPDATE courses
            SET title = ?1, description = ?2, image_url = ?3, price = ?4,
                category_id = ?5, updated_at = ?6
            WHERE id = ?7
            ",
        )
        .bind(&title)
        .bind(&description)
        .bind(&image_url)
        .bind(price)
        .bind(category_id.map(|c| c.to_string()))
        .bind(now.to_rfc3339())
        .bind(course_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update course: {e}")))?;

        Ok(Course {
            title,
            description,
            image_url,
            price,
            category_id,
            updated_at: now,
            ..course
        })
    }

    /// Publish a course after re-validating its invariant at toggle time
    ///
    /// The re-validation and the flag write share one transaction, so a
    /// chapter unpublish landing in between cannot produce a published course
    /// with zero published chapters. A failed validation drops the
    /// transaction, leaving the course untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course doesn't exist, `Validation` naming
    /// the missing requirements, or a database error.
    pub async fn publish(&self, course_id: Uuid) -> AppResult<Course> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let row = sqlx::query(&format!("{COURSE_SELECT} WHERE id = ?1"))
            .bind(course_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;
        let course = row
            .map(|r| course_from_row(&r))
            .transpose()?
            .ok_or_else(|| AppError::not_found("Course"))?;

        let chapter_rows = sqlx::query(&format!(
            "{} WHERE course_id = ?1 ORDER BY position ASC, id ASC",
            super::chapters::CHAPTER_SELECT
        ))
        .bind(course_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;
        let chapters: Vec<Chapter> = chapter_rows
            .iter()
            .map(super::chapters::chapter_from_row)
            .collect::<AppResult<_>>()?;

        publication::validate_course_publish(&course, &chapters)?;

        let now = Utc::now();
        sqlx::query("UPDATE courses SET is_published = 1, updated_at = ?1 WHERE id = ?2")
            .bind(now.to_rfc3339())
            .bind(course_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to publish course: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit course publish: {e}")))?;

        info!(course_id = %course_id, "Course published");
        Ok(Course {
            is_published: true,
            updated_at: now,
            ..course
        })
    }

    /// Unpublish a course
    ///
    /// Always permitted; chapters keep their own publish state.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course doesn't exist, or a database error.
    pub async fn unpublish(&self, course_id: Uuid) -> AppResult<Course> {
        let course = self
            .get(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))?;

        let now = Utc::now();
        sqlx::query("UPDATE courses SET is_published = 0, updated_at = ?1 WHERE id = ?2")
            .bind(now.to_rfc3339())
            .bind(course_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unpublish course: {e}")))?;

        Ok(Course {
            is_published: false,
            updated_at: now,
            ..course
        })
    }

    /// Delete a course and everything it owns: chapters, their progress rows,
    /// attachments, and purchases, in a single transaction
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the course doesn't exist, or a database error.
    pub async fn delete(&self, course_id: Uuid) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let id = course_id.to_string();

        sqlx::query(
            r"
            DELETE FROM user_progress
            WHERE chapter_id IN (SELECT id FROM chapters WHERE course_id = ?1)
            ",
        )
        .bind(&id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete course progress: {e}")))?;

        sqlx::query("DELETE FROM chapters WHERE course_id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete course chapters: {e}")))?;

        sqlx::query("DELETE FROM attachments WHERE course_id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete course attachments: {e}")))?;

        sqlx::query("DELETE FROM purchases WHERE course_id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete course purchases: {e}")))?;

        let result = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(&id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete course: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Course"));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit course delete: {e}")))?;

        info!(course_id = %course_id, "Course deleted");
        Ok(())
    }
}

const COURSE_SELECT: &str = r"
    SELECT id, instructor_id, title, description, image_url, price,
           category_id, is_published, created_at, updated_at
    FROM courses
";

/// Map a course row into the model
///
/// # Errors
///
/// Returns an error if a column is missing or has an unexpected type.
pub(crate) fn course_from_row(row: &SqliteRow) -> AppResult<Course> {
    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
    let instructor_id_str: String = row
        .try_get("instructor_id")
        .map_err(|e| AppError::database(format!("Failed to get instructor_id: {e}")))?;
    let category_id_str: Option<String> = row
        .try_get("category_id")
        .map_err(|e| AppError::database(format!("Failed to get category_id: {e}")))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| AppError::database(format!("Failed to get created_at: {e}")))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| AppError::database(format!("Failed to get updated_at: {e}")))?;

    Ok(Course {
        id: Uuid::parse_str(&id_str)?,
        instructor_id: Uuid::parse_str(&instructor_id_str)?,
        title: row
            .try_get("title")
            .map_err(|e| AppError::database(format!("Failed to get title: {e}")))?,
        description: row
            .try_get("description")
            .map_err(|e| AppError::database(format!("Failed to get description: {e}")))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| AppError::database(format!("Failed to get image_url: {e}")))?,
        price: row
            .try_get("price")
            .map_err(|e| AppError::database(format!("Failed to get price: {e}")))?,
        category_id: category_id_str.map(|s| Uuid::parse_str(&s)).transpose()?,
        is_published: row
            .try_get("is_published")
            .map_err(|e| AppError::database(format!("Failed to get is_published: {e}")))?,
        created_at,
        updated_at,
    })
}
