//! The `tutorkit show` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Table};

use tutorkit_core::render::{Block, CalloutTone, RenderedOutput, Renderer};

pub fn execute(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    chapter_id: String,
    section_id: Option<String>,
) -> Result<()> {
    let (config, curriculum) = super::load_context(config_path, curriculum_path)?;
    let tracker = tutorkit_core::mastery::MasteryTracker::open(&config.mastery_path);

    let resolved = curriculum.resolve(&chapter_id, section_id.as_deref());
    let chapter = resolved
        .chapter
        .with_context(|| format!("no chapter {chapter_id} in the curriculum"))?;

    let Some(section_id) = section_id else {
        println!("{} — {}", chapter.id, chapter.title);
        for section in &chapter.sections {
            let addr = tutorkit_core::model::SectionAddress::new(&chapter.id, &section.id);
            let marker = if tracker.is_mastered(&addr) { " [mastered]" } else { "" };
            println!("  {}  {}{marker}", section.id, section.title);
        }
        return Ok(());
    };

    let section = resolved
        .section
        .with_context(|| format!("no section {section_id} in chapter {chapter_id}"))?;

    let addr = tutorkit_core::model::SectionAddress::new(&chapter.id, &section.id);
    let marker = if tracker.is_mastered(&addr) { " [mastered]" } else { "" };
    println!("# {} / {}{marker}\n", chapter.title, section.title);
    let mut renderer = Renderer::new();
    for output in renderer.render_section(&section.content) {
        print_output(&output);
    }

    if let Some(extra) = curriculum.end_of_chapter_for(&addr) {
        println!("--- End of chapter ---\n");
        for output in renderer.render_section(extra) {
            print_output(&output);
        }
    }

    Ok(())
}

fn print_output(output: &RenderedOutput) {
    for block in &output.blocks {
        print_block(block);
    }
}

fn print_block(block: &Block) {
    match block {
        Block::Heading { level, text } => {
            println!("{} {text}\n", "#".repeat(*level as usize));
        }
        Block::Paragraph { text } => println!("{text}\n"),
        Block::Analogy { lhs, rhs } => println!("  {lhs}  =  {rhs}\n"),
        Block::List { ordered, items } => {
            for (i, item) in items.iter().enumerate() {
                if *ordered {
                    println!("  {}. {item}", i + 1);
                } else {
                    println!("  - {item}");
                }
            }
            println!();
        }
        Block::Table {
            headers,
            rows,
            caption,
        } => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(headers);
            for row in rows {
                table.add_row(row);
            }
            println!("{table}");
            if let Some(caption) = caption {
                println!("({caption})");
            }
            println!();
        }
        Block::Chart { title, summary } => {
            match title {
                Some(title) => println!("[chart] {title}: {summary}\n"),
                None => println!("[chart] {summary}\n"),
            };
        }
        Block::Diagram { definition } => println!("[diagram]\n{definition}\n"),
        Block::Callout { tone, label, text } => {
            let marker = match tone {
                CalloutTone::Tip => "tip",
                CalloutTone::Caution => "caution",
            };
            println!("[{marker}] {label}: {text}\n");
        }
        Block::Flashcards(view) => {
            println!("Flashcards: {}", view.title);
            for card in &view.cards {
                println!("  [{}] {}", card.id, card.shown);
            }
            println!();
        }
        Block::Scenario(view) => {
            println!("Scenario: {}", view.title);
            println!("{}", view.description);
            for choice in &view.choices {
                println!("  ({}) {}", choice.id, choice.text);
            }
            println!();
        }
        Block::Phishing(view) => {
            println!("Exercise: {}", view.title);
            println!("{}", view.introduction);
            for email in &view.emails {
                println!("  [{}] {} — {}", email.id, email.sender, email.subject);
            }
            println!();
        }
        Block::PasswordMeter(view) => {
            println!("Exercise: {} (score {} — {})", view.title, view.score, view.strength);
            for (message, met) in &view.criteria {
                println!("  [{}] {message}", if *met { "x" } else { " " });
            }
            println!();
        }
        Block::WifiPicker(view) => {
            println!("Exercise: {}", view.title);
            println!("{}", view.scenario_description);
            for network in &view.networks {
                println!("  [{}] {} ({})", network.id, network.ssid, network.security);
            }
            println!();
        }
        Block::Placeholder { kind, reason } => {
            println!("[unavailable: {kind}] {reason}\n");
        }
    }
}
