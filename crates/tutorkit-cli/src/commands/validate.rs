//! The `tutorkit validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>, curriculum_path: Option<PathBuf>) -> Result<()> {
    let (_, curriculum) = super::load_context(config_path, curriculum_path)?;

    let sections: usize = curriculum.chapters.iter().map(|c| c.sections.len()).sum();
    println!(
        "Curriculum: {} ({} chapters, {} sections)",
        curriculum.title,
        curriculum.chapters.len(),
        sections
    );

    let warnings = curriculum.validate();
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.location, w.message);
    }

    if warnings.is_empty() {
        println!("Curriculum valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
