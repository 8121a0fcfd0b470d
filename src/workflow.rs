//! # Generator and Debugger Flows
//!
//! Each flow is one user action. Model calls inside a flow run strictly one
//! after the other; a failure ends the flow and is returned unchanged.

use crate::error::Result;
use crate::generator::{self, FunctionConfiguration};
use crate::llm::{prompts, strip_code_fence, LanguageModel};
use serde::Serialize;

/// Artifacts of a generator run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedFunction {
    /// Handler source (`handler.py`)
    pub code: String,
    /// SAM template (`template.yaml`)
    pub template: String,
    /// Model review of code and template, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Generate handler code for `description`, render the template, and
/// optionally have the model review both.
///
/// The template is rendered first so an invalid configuration never costs a
/// model call.
pub async fn generate_function(
    model: &dyn LanguageModel,
    config: &FunctionConfiguration,
    description: &str,
    review: bool,
) -> Result<GeneratedFunction> {
    let template = generator::generate_sam_template(config)?;

    log::info!("Requesting handler code for a {} trigger", config.trigger.label());
    let reply = model
        .complete(&prompts::generate_handler_prompt(config, description))
        .await?;
    let code = strip_code_fence(&reply).to_string();

    let explanation = if review {
        log::info!("Requesting review of the generated handler");
        Some(
            model
                .complete(&prompts::review_prompt(description, &code, &template))
                .await?,
        )
    } else {
        None
    };

    Ok(GeneratedFunction {
        code,
        template,
        explanation,
    })
}

/// Produce a written analysis of existing handler code.
pub async fn analyze_function(
    model: &dyn LanguageModel,
    handler_code: &str,
    template: Option<&str>,
) -> Result<String> {
    log::info!("Requesting analysis of {} bytes of handler code", handler_code.len());
    let analysis = model
        .complete(&prompts::analysis_prompt(handler_code, template))
        .await?;
    Ok(analysis)
}

/// Produce an improved version of existing handler code.
pub async fn improve_function(model: &dyn LanguageModel, handler_code: &str) -> Result<String> {
    log::info!("Requesting improved handler code");
    let reply = model
        .complete(&prompts::improvement_prompt(handler_code))
        .await?;
    Ok(strip_code_fence(&reply).to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{LambdaForgeError, LlmError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every prompt it receives.
    pub(crate) struct ScriptedModel {
        replies: Mutex<VecDeque<std::result::Result<String, LlmError>>>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn new(replies: Vec<std::result::Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn complete(&self, prompt: &str) -> std::result::Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyResponse))
        }
    }

    #[tokio::test]
    async fn test_generate_calls_model_in_order() {
        let model = ScriptedModel::new(vec![
            Ok("```python\ndef lambda_handler(event, context):\n    return 1\n```".to_string()),
            Ok("It returns 1.".to_string()),
        ]);
        let config = FunctionConfiguration::default();

        let result = generate_function(&model, &config, "return one", true)
            .await
            .unwrap();

        assert_eq!(result.code, "def lambda_handler(event, context):\n    return 1");
        assert_eq!(result.explanation.as_deref(), Some("It returns 1."));
        assert!(result.template.contains("AWS::Serverless::Function"));

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("return one"));
        assert!(prompts[0].contains("S3 Upload"));
        assert!(prompts[1].contains("def lambda_handler(event, context):"));
        assert!(prompts[1].contains(&result.template));
    }

    #[tokio::test]
    async fn test_generate_without_review_makes_one_call() {
        let model = ScriptedModel::new(vec![Ok("print('hi')".to_string())]);

        let result = generate_function(&model, &FunctionConfiguration::default(), "say hi", false)
            .await
            .unwrap();

        assert_eq!(result.code, "print('hi')");
        assert!(result.explanation.is_none());
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_config_skips_model() {
        let model = ScriptedModel::new(vec![]);
        let config = FunctionConfiguration {
            timeout: 7,
            ..Default::default()
        };

        let result = generate_function(&model, &config, "anything", true).await;

        assert!(matches!(result, Err(LambdaForgeError::Generation(_))));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_review_failure_is_returned() {
        let model = ScriptedModel::new(vec![
            Ok("code".to_string()),
            Err(LlmError::Api {
                status: 500,
                body: "boom".to_string(),
            }),
        ]);

        let result =
            generate_function(&model, &FunctionConfiguration::default(), "anything", true).await;

        match result {
            Err(LambdaForgeError::Llm(LlmError::Api { status, body })) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(model.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_and_improve() {
        let model = ScriptedModel::new(vec![
            Ok("Looks fine.".to_string()),
            Ok("```\nimproved\n```".to_string()),
        ]);

        let analysis = analyze_function(&model, "def h(): pass", Some("Transform: x"))
            .await
            .unwrap();
        let improved = improve_function(&model, "def h(): pass").await.unwrap();

        assert_eq!(analysis, "Looks fine.");
        assert_eq!(improved, "improved");
        let prompts = model.prompts();
        assert!(prompts[0].contains("SAM TEMPLATE:\nTransform: x"));
        assert!(prompts[1].contains("ORIGINAL CODE:\ndef h(): pass"));
    }
}
