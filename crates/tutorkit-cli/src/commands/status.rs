//! The `tutorkit status` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use tutorkit_core::mastery::{ChapterStatus, MasteryTracker};

pub fn execute(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    mastery_path: Option<PathBuf>,
) -> Result<()> {
    let (config, curriculum) = super::load_context(config_path, curriculum_path)?;
    let mastery_path = mastery_path.unwrap_or_else(|| config.mastery_path.clone());
    let tracker = MasteryTracker::open(mastery_path);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Chapter", "Title", "Progress", "Status"]);

    for chapter in &curriculum.chapters {
        let (mastered, total) = tracker.chapter_progress(chapter);
        let status = match tracker.chapter_status(chapter) {
            ChapterStatus::NotStarted => "not started",
            ChapterStatus::InProgress => "in progress",
            ChapterStatus::Completed => "completed",
        };
        table.add_row(vec![
            Cell::new(&chapter.id),
            Cell::new(chapter.short_title.as_deref().unwrap_or(&chapter.title)),
            Cell::new(format!("{mastered}/{total}")),
            Cell::new(status),
        ]);
    }

    println!("{}", curriculum.title);
    println!("{table}");

    let (mastered, total) = tracker.overall_progress(&curriculum);
    println!("Overall: {mastered}/{total} sections mastered");

    Ok(())
}
