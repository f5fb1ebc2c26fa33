// ABOUTME: Integration tests for database setup against a file-backed SQLite database
// ABOUTME: Verifies connection, file creation, and schema availability end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

#![allow(missing_docs, clippy::unwrap_used)]

use uuid::Uuid;

use aula::database::Database;

#[tokio::test]
async fn new_creates_the_database_file_and_applies_the_schema() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("aula.db");
    let database_url = format!("sqlite:{}", db_path.display());

    let db = Database::new(&database_url).await.unwrap();
    assert!(db_path.exists());

    let instructor_id = Uuid::new_v4();
    let course = db.courses().create(instructor_id, "Persistent").await.unwrap();
    let fetched = db.courses().get(course.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Persistent");
    assert!(!fetched.is_published);
}

#[tokio::test]
async fn migrations_are_idempotent_across_reconnects() {
    let dir = tempfile::tempdir().unwrap();
    let database_url = format!("sqlite:{}", dir.path().join("aula.db").display());

    let db = Database::new(&database_url).await.unwrap();
    let course = db
        .courses()
        .create(Uuid::new_v4(), "Survives Reopen")
        .await
        .unwrap();
    drop(db);

    let reopened = Database::new(&database_url).await.unwrap();
    let fetched = reopened.courses().get(course.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Survives Reopen");
}
