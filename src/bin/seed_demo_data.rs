// ABOUTME: Demo data seeding utility for the Aula course platform engine
// ABOUTME: Seeds the category taxonomy and an optional demo course with chapters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

//! # Demo Data Seeder
//!
//! Seeds the category taxonomy and, with `--with-demo-course`, a published
//! demo course with a free preview chapter.
//!
//! ## Usage
//!
//! ```bash
//! # Seed categories only
//! cargo run --bin seed-demo-data
//!
//! # Override database URL
//! cargo run --bin seed-demo-data -- --database-url sqlite:./data/aula.db
//!
//! # Also create a demo course
//! cargo run --bin seed-demo-data -- --with-demo-course
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use aula::config::ServerConfig;
use aula::database::Database;
use aula::models::{UpdateChapterRequest, UpdateCourseRequest};

/// Category names seeded into every fresh database
const CATEGORY_NAMES: [&str; 3] = ["Beginner Level", "Intermediate Level", "Tutor Level"];

#[derive(Parser)]
#[command(
    name = "seed-demo-data",
    about = "Seed the Aula database with categories and optional demo content"
)]
struct Args {
    /// Database URL (defaults to DATABASE_URL or the local SQLite file)
    #[arg(long)]
    database_url: Option<String>,

    /// Also create a published demo course with chapters
    #[arg(long)]
    with_demo_course: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let args = Args::parse();
    let database_url = args.database_url.unwrap_or(config.database_url);

    let db = Database::new(&database_url).await?;

    let categories = db.categories();
    for name in CATEGORY_NAMES {
        let category = categories.upsert_by_name(name).await?;
        info!(id = %category.id, name = %category.name, "Category seeded");
    }

    if args.with_demo_course {
        seed_demo_course(&db).await?;
    }

    info!("Seeding complete");
    Ok(())
}

/// Create a published demo course with a free preview chapter
async fn seed_demo_course(db: &Database) -> Result<()> {
    let instructor_id = Uuid::new_v4();
    let courses = db.courses();
    let chapters = db.chapters();

    let beginner = db.categories().upsert_by_name("Beginner Level").await?;

    let course = courses.create(instructor_id, "Getting Started with Aula").await?;
    courses
        .update(
            course.id,
            &UpdateCourseRequest {
                description: Some("A short demo course seeded for local development.".to_owned()),
                image_url: Some("https://placehold.co/600x400".to_owned()),
                price: Some(19.99),
                category_id: Some(beginner.id),
                ..Default::default()
            },
        )
        .await?;

    let titles = ["Welcome", "Your First Course", "Publishing and Progress"];
    for (index, title) in titles.iter().enumerate() {
        let chapter = chapters.create(course.id, title).await?;
        chapters
            .update(
                chapter.id,
                &UpdateChapterRequest {
                    description: Some(format!("Demo chapter: {title}")),
                    video_url: Some("https://example.com/demo.mp4".to_owned()),
                    is_free: Some(index == 0),
                    ..Default::default()
                },
            )
            .await?;
        chapters.publish(chapter.id).await?;
    }

    let course = courses.publish(course.id).await?;
    info!(course_id = %course.id, instructor_id = %instructor_id, "Demo course seeded");
    Ok(())
}
