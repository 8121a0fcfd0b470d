use crate::error::Result;

pub mod function_config;
pub mod sam_gen;

pub use function_config::FunctionConfiguration;

/// File name used when the template is written to disk
pub const TEMPLATE_FILE_NAME: &str = "template.yaml";

/// Generate the SAM template (`template.yaml`) for a function configuration
pub fn generate_sam_template(config: &FunctionConfiguration) -> Result<String> {
    sam_gen::generate(config)
}
