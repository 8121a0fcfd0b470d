//! # lambda-forge
//!
//! Turns a function configuration into an AWS SAM template and asks a
//! language model to write, review, analyze or improve the Lambda handler
//! that goes with it.
//!
//! ## Features
//!
//! - **Template Generation**: Deterministic `template.yaml` from a typed configuration
//! - **Handler Generation**: Handler code from a natural-language description
//! - **Review and Debugging**: Analysis and improvement of existing handlers
//! - **Two Front Ends**: A command-line tool and a JSON REST server
//!
//! ## Example
//!
//! ```rust,no_run
//! use lambda_forge::{generate_sam_template, FunctionConfiguration};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FunctionConfiguration::default();
//! let template = generate_sam_template(&config)?;
//! println!("{}", template);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod server;
pub mod workflow;

// Re-export commonly used types and functions
pub use error::{LambdaForgeError, Result};
pub use generator::{generate_sam_template, FunctionConfiguration};
pub use llm::{ChatClient, LanguageModel};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
