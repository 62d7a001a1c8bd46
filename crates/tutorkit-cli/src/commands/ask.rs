//! The `tutorkit ask` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tutorkit_core::session::{Sender, StudySession};

pub async fn execute(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    chapter_id: String,
    section_id: String,
    question: String,
) -> Result<()> {
    let (config, curriculum) = super::load_context(config_path, curriculum_path)?;
    let addr = super::require_section(&curriculum, &chapter_id, &section_id)?;
    let client = config.default_client()?;

    let mut session = StudySession::new();
    session.set_section(Some(addr));
    session
        .send_chat(&question, &curriculum, client.as_ref())
        .await?;

    let answer = session
        .conversation()
        .iter()
        .rev()
        .find(|turn| turn.sender == Sender::Assistant)
        .context("the tutor did not answer")?;
    println!("{}", answer.text);

    Ok(())
}
