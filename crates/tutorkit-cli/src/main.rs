//! tutorkit CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tutorkit", version, about = "Interactive security-awareness curriculum")]
struct Cli {
    /// Config file path (default: tutorkit.toml, then ~/.config/tutorkit/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Curriculum JSON file (overrides the configured path)
    #[arg(long, global = true)]
    curriculum: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a chapter's sections, or render one section
    Show {
        /// Chapter id (e.g. "chapter-1")
        chapter: String,

        /// Section id within the chapter (e.g. "1.2")
        section: Option<String>,
    },

    /// Show mastery progress across the curriculum
    Status {
        /// Mastery store path (overrides the configured path)
        #[arg(long)]
        mastery: Option<PathBuf>,
    },

    /// Toggle a section's mastered flag
    Master {
        /// Chapter id
        chapter: String,

        /// Section id
        section: String,

        /// Mastery store path (overrides the configured path)
        #[arg(long)]
        mastery: Option<PathBuf>,
    },

    /// Check the curriculum for authoring issues
    Validate,

    /// Generate a study aid for a section
    Enrich {
        /// Chapter id
        chapter: String,

        /// Section id
        section: String,

        /// Artifact kind: takeaways, review-questions, scenario, further-study
        #[arg(long, default_value = "takeaways")]
        kind: String,
    },

    /// Ask the tutor a question about a section
    Ask {
        /// Chapter id
        chapter: String,

        /// Section id
        section: String,

        /// The question to ask
        question: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tutorkit=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Show { chapter, section } => {
            commands::show::execute(cli.config, cli.curriculum, chapter, section)
        }
        Commands::Status { mastery } => commands::status::execute(cli.config, cli.curriculum, mastery),
        Commands::Master {
            chapter,
            section,
            mastery,
        } => commands::master::execute(cli.config, cli.curriculum, chapter, section, mastery),
        Commands::Validate => commands::validate::execute(cli.config, cli.curriculum),
        Commands::Enrich {
            chapter,
            section,
            kind,
        } => commands::enrich::execute(cli.config, cli.curriculum, chapter, section, kind).await,
        Commands::Ask {
            chapter,
            section,
            question,
        } => commands::ask::execute(cli.config, cli.curriculum, chapter, section, question).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
