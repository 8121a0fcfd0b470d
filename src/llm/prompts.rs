//! Prompt templates for handler generation, review, analysis and improvement.
//!
//! Placeholders use `{name}` and are filled in a single pass, so user text
//! that happens to contain a placeholder is never expanded again.

use crate::generator::function_config::SubnetType;
use crate::generator::FunctionConfiguration;

pub const GENERATE_HANDLER_PROMPT: &str = r#"Write the Python code for an AWS Lambda function that does the following:

Description: {description}
Trigger type: {trigger}
Entry point: {handler}

Configuration context:
{context}

The function must:
1. Follow AWS Lambda best practices
2. Include appropriate error handling and logging
3. Be efficient and clear
4. Include every import it needs
5. Include explanatory comments
6. NOT include sample code or templates
7. Implement ONLY the requested functionality

Important:
- The code must be a single coherent implementation
- Do NOT include multiple versions or examples
- Do NOT include commented-out code or alternatives
- Make sure every function is properly defined
- Only include strictly necessary dependencies

Structure the code in this order:
1. Imports
2. Logging setup
3. Required AWS client setup
4. Main {handler} function
5. Helper functions
"#;

pub const REVIEW_PROMPT: &str = r#"Analyze and explain the following AWS Lambda code:

FUNCTIONALITY DESCRIPTION:
{description}

PYTHON CODE:
{python_code}

SAM TEMPLATE:
{sam_template}

Please provide a clear, structured explanation:
1. General explanation of the code and how it works
2. Breakdown of each important part
3. How it meets the requested requirements
4. Important considerations to keep in mind

Use simple, clear language aimed at developers with basic experience."#;

pub const ANALYSIS_PROMPT: &str = r#"Analyze the following AWS Lambda code and provide a detailed report:

PYTHON CODE:
{handler_code}
{template_section}

Please provide a detailed analysis that includes:

1. Code Analysis
   - Structure and organization
   - Error handling
   - Logging and monitoring
   - Security

2. Potential Problems
   - Performance issues
   - Memory leaks
   - Security issues
   - Bad practices

3. Recommendations
   - Specific code improvements
   - Optimizations
   - Best practices
   - Recommended patterns

4. Resources and Costs
   - Memory usage
   - Execution time
   - Estimated costs
   - Resource optimization

Use clear language and give specific examples where needed."#;

pub const IMPROVEMENT_PROMPT: &str = r#"Based on the code provided, generate an improved version that fixes the problems you identify:

ORIGINAL CODE:
{code}

Generate an improved version that:
1. Fixes the identified problems
2. Implements best practices
3. Optimizes performance
4. Improves security

Provide the complete, improved code with explanatory comments.
The code must be a single coherent implementation, with no alternatives or commented-out code."#;

/// Fill `{name}` placeholders from `values`. Unknown placeholders are left alone.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Settings the handler code should know about, including the ones that
/// never reach the template.
pub fn configuration_context(config: &FunctionConfiguration) -> String {
    let environment = config.environment();
    let mut lines = vec![
        format!("- Runtime: {}", config.runtime),
        format!("- Memory: {} MB, timeout: {} seconds", config.memory, config.timeout),
    ];
    if !environment.is_empty() {
        let names: Vec<&str> = environment.iter().map(|(k, _)| k).collect();
        lines.push(format!("- Environment variables: {}", names.join(", ")));
    }
    if let Some(level) = environment.get("LOG_LEVEL") {
        lines.push(format!("- Log level: {}", level));
    }
    if let Some(observability) = &config.observability {
        lines.push(format!(
            "- CloudWatch log retention: {} days",
            observability.log_retention
        ));
    }
    if let Some(error_handling) = &config.error_handling {
        if error_handling.use_dlq {
            lines.push(format!(
                "- Failed events go to an {} dead-letter queue",
                error_handling.dlq_type.as_str()
            ));
        }
        if error_handling.create_alarm {
            lines.push("- A CloudWatch alarm watches for errors".to_string());
        }
    }
    if let Some(vpc) = config.vpc.as_ref().filter(|v| v.enabled) {
        let subnet = match vpc.subnet_type {
            SubnetType::Private => "private",
            SubnetType::Public => "public",
        };
        lines.push(format!(
            "- Runs in {} VPC subnets, {}",
            subnet,
            if vpc.needs_internet {
                "with internet access"
            } else {
                "without internet access"
            }
        ));
    }
    if let Some(secrets) = &config.secrets {
        if secrets.secrets_manager {
            lines.push("- Reads secrets from AWS Secrets Manager".to_string());
        }
        if secrets.parameter_store {
            lines.push("- Reads parameters from SSM Parameter Store".to_string());
        }
        if secrets.use_kms {
            lines.push("- Environment variables are encrypted with KMS".to_string());
        }
    }
    lines.join("\n")
}

pub fn generate_handler_prompt(config: &FunctionConfiguration, description: &str) -> String {
    let context = configuration_context(config);
    fill(
        GENERATE_HANDLER_PROMPT,
        &[
            ("description", description),
            ("trigger", config.trigger.label()),
            ("handler", config.handler_name.as_str()),
            ("context", context.as_str()),
        ],
    )
}

pub fn review_prompt(description: &str, python_code: &str, sam_template: &str) -> String {
    fill(
        REVIEW_PROMPT,
        &[
            ("description", description),
            ("python_code", python_code),
            ("sam_template", sam_template),
        ],
    )
}

/// The template section is dropped entirely when no template was supplied.
pub fn analysis_prompt(handler_code: &str, template: Option<&str>) -> String {
    let template_section = match template.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) => format!("\nSAM TEMPLATE:\n{}", t),
        None => String::new(),
    };
    fill(
        ANALYSIS_PROMPT,
        &[
            ("handler_code", handler_code),
            ("template_section", template_section.as_str()),
        ],
    )
}

pub fn improvement_prompt(code: &str) -> String {
    fill(IMPROVEMENT_PROMPT, &[("code", code)])
}
