//! Developer CLI for running the engine against saved report files
//!
//! The engine is consumed as a library by the surrounding application;
//! this binary exists for development and staff tooling only.

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fcra-engine")]
#[command(about = "Credit report parsing and FCRA litigation-scoring engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a saved report document and run the full analysis chain
    Analyze {
        /// Path to the raw report document (HTML or extracted text)
        #[arg(long, short)]
        input: PathBuf,

        /// Provider hint; never inferred from document content
        #[arg(long, short)]
        provider: String,

        /// Capture date of the pull (defaults to today)
        #[arg(long)]
        captured_on: Option<NaiveDate>,

        /// Willfulness score 0-100 from case intake
        #[arg(long, default_value_t = 0)]
        willfulness: u8,

        /// Standing: dissemination evidence present
        #[arg(long)]
        dissemination: bool,

        /// Standing: concrete-harm evidence present
        #[arg(long)]
        concrete_harm: bool,

        /// Standing: causation established
        #[arg(long)]
        causation: bool,

        /// Documentation package complete
        #[arg(long)]
        documented: bool,

        /// Optional TOML configuration file
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = FormatArg::Terminal)]
        format: FormatArg,
    },

    /// List the supported provider hints
    Providers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Json,
    Terminal,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Analyze {
            input,
            provider,
            captured_on,
            willfulness,
            dissemination,
            concrete_harm,
            causation,
            documented,
            config,
            format,
        } => {
            let provider = crate::core::Provider::from_hint(&provider).ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown provider hint {provider:?}; run `fcra-engine providers` for the list"
                )
            })?;
            if let Some(path) = config {
                let loaded = crate::config::EngineConfig::load(&path)?;
                crate::config::set_config(loaded);
            }
            let engine_config = crate::config::get_config();

            let document = std::fs::read(&input)?;
            let inputs = crate::pipeline::AnalysisInputs {
                captured_on: captured_on
                    .unwrap_or_else(|| Utc::now().date_naive()),
                analyzed_at: Utc::now(),
                harm_items: Vec::new(),
                standing: crate::core::StandingInputs {
                    dissemination,
                    concrete_harm,
                    causation,
                },
                willfulness_score: willfulness,
                documentation_complete: documented,
            };

            let analysis =
                crate::pipeline::analyze_report(&document, provider, &inputs, engine_config)?;
            let format = match format {
                FormatArg::Json => crate::io::OutputFormat::Json,
                FormatArg::Terminal => crate::io::OutputFormat::Terminal,
            };
            crate::io::create_writer(format).write_analysis(&analysis)?;
            Ok(())
        }
        Commands::Providers => {
            for provider in crate::core::Provider::ALL {
                println!("{provider}");
            }
            Ok(())
        }
    }
}
