// ABOUTME: Configuration management for the Aula engine
// ABOUTME: Environment-only configuration, no config files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

/// Environment-derived server configuration
pub mod environment;

pub use environment::ServerConfig;
