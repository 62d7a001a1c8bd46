//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tutorkit_core::curriculum::Curriculum;
use tutorkit_core::model::SectionAddress;
use tutorkit_providers::TutorConfig;

pub mod ask;
pub mod enrich;
pub mod master;
pub mod show;
pub mod status;
pub mod validate;

/// Load config and curriculum, with CLI overrides taking precedence over the
/// configured paths.
pub(crate) fn load_context(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
) -> Result<(TutorConfig, Curriculum)> {
    let config = tutorkit_providers::load_config_from(config_path.as_deref())?;
    let path = curriculum_path.unwrap_or_else(|| config.curriculum_path.clone());
    let curriculum = Curriculum::load(&path)?;
    Ok((config, curriculum))
}

/// Resolve a chapter/section pair or fail with a message naming what is
/// missing.
pub(crate) fn require_section(
    curriculum: &Curriculum,
    chapter_id: &str,
    section_id: &str,
) -> Result<SectionAddress> {
    let addr = SectionAddress::new(chapter_id, section_id);
    curriculum
        .section_at(&addr)
        .with_context(|| format!("no section {addr} in the curriculum"))?;
    Ok(addr)
}
