// ABOUTME: Database operations for purchases
// ABOUTME: Records the entitlement fact consumed by the access evaluator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::Purchase;

/// Purchase database operations manager
///
/// Payment processing itself is external; the engine only records and reads
/// the resulting (user, course) entitlement fact.
pub struct PurchasesManager {
    pool: SqlitePool,
}

impl PurchasesManager {
    /// Create a new purchases manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record an entitlement for (user, course)
    ///
    /// Idempotent: recording an existing entitlement leaves the original row
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn record(&self, user_id: Uuid, course_id: Uuid) -> AppResult<Purchase> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(
            r"
            INSERT INTO purchases (id, user_id, course_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, course_id) DO UPDATE SET user_id = excluded.user_id
            RETURNING id, user_id, course_id, created_at
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(course_id.to_string())
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record purchase: {e}")))?;

        let id_str: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Failed to get id: {e}")))?;
        let created_at: DateTime<Utc> = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Failed to get created_at: {e}")))?;

        Ok(Purchase {
            id: Uuid::parse_str(&id_str)?,
            user_id,
            course_id,
            created_at,
        })
    }

    /// Whether (user, course) holds an active entitlement
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn has_entitlement(&self, user_id: Uuid, course_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS owned FROM purchases WHERE user_id = ?1 AND course_id = ?2",
        )
        .bind(user_id.to_string())
        .bind(course_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Database query failed: {e}")))?;

        let owned: i64 = row
            .try_get("owned")
            .map_err(|e| AppError::database(format!("Failed to get owned count: {e}")))?;
        Ok(owned > 0)
    }
}
