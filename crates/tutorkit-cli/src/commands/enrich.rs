//! The `tutorkit enrich` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use tutorkit_core::artifact::{ArtifactKind, GeneratedArtifact};
use tutorkit_core::session::StudySession;

pub async fn execute(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    chapter_id: String,
    section_id: String,
    kind: String,
) -> Result<()> {
    let kind: ArtifactKind = kind.parse().map_err(anyhow::Error::msg)?;
    let (config, curriculum) = super::load_context(config_path, curriculum_path)?;
    let addr = super::require_section(&curriculum, &chapter_id, &section_id)?;
    let client = config.default_client()?;

    let mut session = StudySession::new();
    session.set_section(Some(addr));
    session
        .request_artifact(kind, &curriculum, client.as_ref())
        .await?;

    if let Some(message) = session.artifact_error() {
        anyhow::bail!("generation failed: {message}");
    }
    let artifact = session
        .artifacts()
        .get(&kind)
        .context("no artifact was produced")?;
    print_artifact(artifact);

    Ok(())
}

fn print_artifact(artifact: &GeneratedArtifact) {
    match artifact {
        GeneratedArtifact::Takeaways(payload) => {
            println!("Key takeaways:");
            for takeaway in &payload.key_takeaways {
                println!("  - {takeaway}");
            }
        }
        GeneratedArtifact::ReviewQuestions(payload) => {
            println!("Review questions:");
            for (i, q) in payload.review_questions.iter().enumerate() {
                println!("  {}. {}", i + 1, q.question);
                if let Some(options) = &q.options {
                    for option in options {
                        println!("     - {option}");
                    }
                }
                println!("     Answer: {}", q.answer);
                if let Some(explanation) = &q.explanation {
                    println!("     ({explanation})");
                }
            }
        }
        GeneratedArtifact::Scenario(payload) => {
            println!("Practical scenario:");
            println!("  {}", payload.practical_scenario.description);
            if let Some(guidance) = &payload.practical_scenario.guidance {
                println!("  Guidance: {guidance}");
            }
        }
        GeneratedArtifact::FurtherStudy(payload) => {
            println!("Further study:");
            for resource in &payload.further_study_recommendations {
                match &resource.link {
                    Some(link) => println!("  - {} ({link})", resource.title),
                    None => println!("  - {}", resource.title),
                }
                println!("    {}", resource.description);
            }
        }
    }
}
