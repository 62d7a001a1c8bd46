//! The `tutorkit master` command.

use std::path::PathBuf;

use anyhow::Result;

use tutorkit_core::mastery::MasteryTracker;

pub fn execute(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    chapter_id: String,
    section_id: String,
    mastery_path: Option<PathBuf>,
) -> Result<()> {
    let (config, curriculum) = super::load_context(config_path, curriculum_path)?;
    let addr = super::require_section(&curriculum, &chapter_id, &section_id)?;

    let mastery_path = mastery_path.unwrap_or_else(|| config.mastery_path.clone());
    let mut tracker = MasteryTracker::open(mastery_path);

    let mastered = tracker.toggle_and_persist(&addr);
    if mastered {
        println!("Marked {addr} as mastered.");
    } else {
        println!("Cleared mastery for {addr}.");
    }

    Ok(())
}
