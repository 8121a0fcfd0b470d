use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lambda-forge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate AWS Lambda handlers and SAM templates")]
#[command(long_about = "Renders a SAM template from a function configuration file, asks a language model to write the matching handler, and analyzes or improves existing handlers.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to settings file
    #[arg(short, long, global = true, value_name = "FILE", env = "LAMBDA_FORGE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample function configuration to start from
    Init {
        /// Where to write the configuration
        #[arg(short, long, default_value = "function.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Render template.yaml from a function configuration (no model needed)
    Template {
        /// Function configuration (.toml, .yaml or .json)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Output directory for generated files
        #[arg(short, long, value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Print instead of writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate handler.py and template.yaml, then review them
    Generate {
        /// Function configuration (.toml, .yaml or .json)
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// What the function should do, in plain language
        #[arg(short, long)]
        description: String,

        /// Output directory for generated files
        #[arg(short, long, value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        /// Skip the review of the generated code
        #[arg(long)]
        no_review: bool,

        /// Print instead of writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Analyze an existing handler
    Analyze {
        /// Handler source file
        #[arg(value_name = "HANDLER")]
        handler: PathBuf,

        /// SAM template deployed with the handler
        #[arg(short, long, value_name = "TEMPLATE")]
        template: Option<PathBuf>,
    },

    /// Generate an improved version of an existing handler
    Improve {
        /// Handler source file
        #[arg(value_name = "HANDLER")]
        handler: PathBuf,

        /// Where to write the improved handler
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print instead of writing files
        #[arg(long)]
        dry_run: bool,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
