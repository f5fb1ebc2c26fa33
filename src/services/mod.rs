// ABOUTME: Request-scoped services composing the storage managers
// ABOUTME: One synchronous entry point per end-user action
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

/// Instructor-side authoring operations with ownership enforcement
pub mod instructor;
/// Student-side playback, completion, and resume operations
pub mod student;

pub use instructor::InstructorService;
pub use student::{ChapterView, CompletionOutcome, StudentService};
