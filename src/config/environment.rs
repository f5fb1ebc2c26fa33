// ABOUTME: Environment-based configuration loading
// ABOUTME: Reads DATABASE_URL and LOG_LEVEL with local-development defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use std::env;

use crate::errors::{AppError, AppResult};

/// Default SQLite database for local development
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/aula.db";

/// Server configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection string (`sqlite:` URLs only)
    pub database_url: String,
    /// Log filter directive handed to `tracing-subscriber`
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `DATABASE_URL` defaults to a local SQLite file; `LOG_LEVEL` defaults
    /// to `info`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `DATABASE_URL` is set but not a SQLite URL.
    pub fn from_env() -> AppResult<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());
        if !database_url.starts_with("sqlite:") {
            return Err(AppError::invalid_input(format!(
                "Unsupported DATABASE_URL (expected sqlite:...): {database_url}"
            )));
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned());

        Ok(Self {
            database_url,
            log_level,
        })
    }
}
