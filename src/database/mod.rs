// ABOUTME: Core database management with migration system for SQLite
// ABOUTME: Connection pooling, schema setup, and per-domain manager accessors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

/// Course attachment storage
pub mod attachments;
/// Course category storage
pub mod categories;
/// Chapter storage, reordering engine, and navigation resolver
pub mod chapters;
/// Course CRUD and publication state
pub mod courses;
/// User progress tracking (completion upserts and derived ratios)
pub mod progress;
/// Purchase records (the entitlement fact)
pub mod purchases;

pub use attachments::AttachmentsManager;
pub use categories::CategoriesManager;
pub use chapters::ChaptersManager;
pub use courses::CoursesManager;
pub use progress::ProgressManager;
pub use purchases::PurchasesManager;

use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database connection pool for the course engine
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - `SQLite` file creation fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Wrap an existing pool without running migrations
    ///
    /// Used by tests and tooling that manage their own pool options; call
    /// [`Self::migrate`] before use.
    #[must_use]
    pub const fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Run all pending migrations embedded at compile time from ./migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails or the connection is lost.
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Get the courses manager
    #[must_use]
    pub fn courses(&self) -> CoursesManager {
        CoursesManager::new(self.pool.clone())
    }

    /// Get the chapters manager
    #[must_use]
    pub fn chapters(&self) -> ChaptersManager {
        ChaptersManager::new(self.pool.clone())
    }

    /// Get the progress manager
    #[must_use]
    pub fn progress(&self) -> ProgressManager {
        ProgressManager::new(self.pool.clone())
    }

    /// Get the purchases manager
    #[must_use]
    pub fn purchases(&self) -> PurchasesManager {
        PurchasesManager::new(self.pool.clone())
    }

    /// Get the attachments manager
    #[must_use]
    pub fn attachments(&self) -> AttachmentsManager {
        AttachmentsManager::new(self.pool.clone())
    }

    /// Get the categories manager
    #[must_use]
    pub fn categories(&self) -> CategoriesManager {
        CategoriesManager::new(self.pool.clone())
    }
}
