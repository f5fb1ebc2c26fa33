// ABOUTME: Database operations for course categories
// ABOUTME: Upsert-by-name and alphabetical listing used by seeding and course setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Category;

/// Category database operations manager
pub struct CategoriesManager {
    pool: SqlitePool,
}

impl CategoriesManager {
    /// Create a new categories manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a category by name, returning the existing row if the name is
    /// already taken
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn upsert_by_name(&self, name: &str) -> AppResult<Category> {
        let row = sqlx::query(
            r"
            INSERT INTO categories (id, name)
            VALUES (?1, ?2)
            ON CONFLICT (name) DO UPDATE SET name = excluded.name
            RETURNING id, name
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert category: {e}")))?;

        let id_str: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;

        Ok(Category {
            id: Uuid::parse_str(&id_str)?,
            name: row
                .try_get("name")
                .map_err(|e| AppError::database(format!("Failed to get name: {e}")))?,
        })
    }

    /// List all categories ordered by name ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        rows.into_iter()
            .map(|row| {
                let id_str: String = row
                    .try_get("id")
                    .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
                Ok(Category {
                    id: Uuid::parse_str(&id_str)?,
                    name: row
                        .try_get("name")
                        .map_err(|e| AppError::database(format!("Failed to get name: {e}")))?,
                })
            })
            .collect()
    }
}
