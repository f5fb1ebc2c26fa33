// ABOUTME: Main library entry point for the Aula course platform engine
// ABOUTME: Chapter access control, publication invariants, and completion tracking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

#![deny(unsafe_code)]

//! # Aula Course Platform Engine
//!
//! The rules engine behind an online-course platform: instructors author
//! courses composed of ordered chapters; students enroll, watch, and have
//! their progress tracked per chapter.
//!
//! ## What lives here
//!
//! - **Access evaluation**: locked/unlocked decisions from a chapter's free
//!   flag and the caller's entitlement fact
//! - **Publication invariants**: field-completeness checks for publishing,
//!   and the cascading unpublish that keeps a course consistent as chapters
//!   are edited, deleted, or unpublished
//! - **Progress tracking**: idempotent per-chapter completion upserts and
//!   derived course completion ratios
//! - **Reordering**: transactional rewrites of a course's chapter positions
//! - **Navigation**: position-ordered next-chapter and resume-point lookups
//!
//! Video playback, payments, file storage, and authentication are external:
//! the engine sees a single end-of-video event, an opaque entitlement
//! boolean, and opaque user ids.
//!
//! ## Example
//!
//! ```rust,no_run
//! use aula::config::ServerConfig;
//! use aula::database::Database;
//! use aula::errors::AppResult;
//! use aula::services::StudentService;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let db = Database::new(&config.database_url).await?;
//!     let _students = StudentService::new(db);
//!     Ok(())
//! }
//! ```

/// Access evaluator: locked/completion-eligible decisions
pub mod access;

/// Configuration management
pub mod config;

/// SQLite storage layer with per-domain managers
pub mod database;

/// Entitlement fact seam between services and storage
pub mod entitlement;

/// Application error types
pub mod errors;

/// Core data models
pub mod models;

/// Publication validator: publish invariants and the cascade re-derivation
pub mod publication;

/// Request-scoped services composing the storage managers
pub mod services;
