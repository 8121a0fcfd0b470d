use crate::error::Result;
use crate::generator::function_config::{FunctionConfiguration, Trigger};
use serde_yaml::{Mapping, Value};

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
const SERVERLESS_TRANSFORM: &str = "AWS::Serverless-2016-10-31";
const FUNCTION_TYPE: &str = "AWS::Serverless::Function";
const TEMPLATE_DESCRIPTION: &str = "Lambda generated with lambda-forge";

/// Logical id of the generated function resource
pub const FUNCTION_RESOURCE: &str = "MyFunction";

/// Render the SAM template for `config` as YAML.
///
/// Keys keep insertion order, so the same configuration always produces
/// byte-identical output.
pub fn generate(config: &FunctionConfiguration) -> Result<String> {
    let template = build_template(config)?;
    Ok(serde_yaml::to_string(&template)?)
}

/// Build the template document without serializing it
pub fn build_template(config: &FunctionConfiguration) -> Result<Value> {
    config.validate()?;

    let mut resource = Mapping::new();
    resource.insert("Type".into(), FUNCTION_TYPE.into());
    resource.insert("Properties".into(), function_properties(config).into());

    let mut resources = Mapping::new();
    resources.insert(FUNCTION_RESOURCE.into(), resource.into());

    let mut template = Mapping::new();
    template.insert("AWSTemplateFormatVersion".into(), TEMPLATE_FORMAT_VERSION.into());
    template.insert("Transform".into(), SERVERLESS_TRANSFORM.into());
    template.insert("Description".into(), TEMPLATE_DESCRIPTION.into());
    template.insert("Resources".into(), resources.into());

    Ok(template.into())
}

fn function_properties(config: &FunctionConfiguration) -> Mapping {
    let mut props = Mapping::new();

    // Image based functions carry neither handler nor runtime
    if !config.is_container() {
        props.insert(
            "Handler".into(),
            format!("handler.{}", config.handler_name).into(),
        );
        props.insert("Runtime".into(), config.runtime.as_str().into());
    }
    props.insert("MemorySize".into(), config.memory.into());
    props.insert("Timeout".into(), config.timeout.into());

    let mut variables = Mapping::new();
    for (key, value) in config.environment().iter() {
        variables.insert(key.into(), value.into());
    }
    let mut environment = Mapping::new();
    environment.insert("Variables".into(), variables.into());
    props.insert("Environment".into(), environment.into());

    props.insert("Events".into(), event_binding(&config.trigger).into());

    if let Some(concurrency) = &config.concurrency {
        if concurrency.reserved > 0 {
            props.insert(
                "ReservedConcurrentExecutions".into(),
                concurrency.reserved.into(),
            );
        }
        if concurrency.provisioned > 0 {
            props.insert(
                "ProvisionedConcurrencyConfig".into(),
                single("ProvisionedConcurrentExecutions", concurrency.provisioned.into()),
            );
        }
    }

    if let Some(invoke) = &config.async_invoke {
        if config.trigger.is_async() {
            let mut invoke_config = Mapping::new();
            invoke_config.insert("MaximumEventAgeInSeconds".into(), invoke.max_event_age.into());
            invoke_config.insert("MaximumRetryAttempts".into(), invoke.max_retry.into());
            props.insert("EventInvokeConfig".into(), invoke_config.into());
        }
    }

    if let Some(vpc) = config.vpc.as_ref().filter(|vpc| vpc.enabled) {
        let mut vpc_config = Mapping::new();
        vpc_config.insert("SubnetIds".into(), split_list(&vpc.subnet_ids, ','));
        vpc_config.insert(
            "SecurityGroupIds".into(),
            split_list(&vpc.security_group_ids, ','),
        );
        props.insert("VpcConfig".into(), vpc_config.into());
    }

    if config.observability.as_ref().is_some_and(|o| o.xray) {
        props.insert("Tracing".into(), "Active".into());
    }

    if let Some(dlq) = config.error_handling.as_ref().filter(|e| e.use_dlq) {
        let mut dead_letter = Mapping::new();
        dead_letter.insert("Type".into(), dlq.dlq_type.as_str().into());
        dead_letter.insert("TargetArn".into(), dlq.dlq_arn.as_str().into());
        props.insert("DeadLetterQueue".into(), dead_letter.into());
    }

    if let Some(deployment) = &config.deployment {
        if config.is_container() {
            props.insert("PackageType".into(), "Image".into());
            props.insert("ImageUri".into(), deployment.ecr_uri.as_str().into());
        } else if !deployment.layers.is_empty() {
            props.insert("Layers".into(), split_list(&deployment.layers, '\n'));
        }
        if deployment.auto_publish {
            props.insert("AutoPublishAlias".into(), "live".into());
        }
    }

    if let Some(secrets) = &config.secrets {
        if secrets.use_kms && !secrets.kms_key_arn.is_empty() {
            props.insert("KmsKeyArn".into(), secrets.kms_key_arn.as_str().into());
        }
    }

    props
}

fn event_binding(trigger: &Trigger) -> Mapping {
    let (name, kind, properties) = match trigger {
        Trigger::S3Upload { bucket_name, prefix } => {
            let mut properties = Mapping::new();
            properties.insert("Bucket".into(), single("Ref", bucket_name.as_str().into()));
            properties.insert(
                "Events".into(),
                Value::Sequence(vec!["s3:ObjectCreated:*".into()]),
            );
            if !prefix.is_empty() {
                let mut rule = Mapping::new();
                rule.insert("Name".into(), "prefix".into());
                rule.insert("Value".into(), prefix.as_str().into());
                let rules = single("Rules", Value::Sequence(vec![rule.into()]));
                properties.insert("Filter".into(), single("S3Key", rules));
            }
            ("S3Event", "S3", properties)
        }
        Trigger::ApiGateway { route, http_method } => {
            let mut properties = Mapping::new();
            properties.insert("Path".into(), route.as_str().into());
            properties.insert("Method".into(), http_method.as_str().into());
            ("ApiEvent", "Api", properties)
        }
        Trigger::Scheduled { schedule_expression } => {
            let mut properties = Mapping::new();
            properties.insert("Schedule".into(), schedule_expression.as_str().into());
            ("ScheduleEvent", "Schedule", properties)
        }
        Trigger::Sns { topic_arn } => {
            let mut properties = Mapping::new();
            properties.insert("Topic".into(), topic_arn.as_str().into());
            ("SnsEvent", "SNS", properties)
        }
        Trigger::Sqs { queue_arn, batch_size } => {
            let mut properties = Mapping::new();
            properties.insert("Queue".into(), queue_arn.as_str().into());
            properties.insert("BatchSize".into(), (*batch_size).into());
            ("SqsEvent", "SQS", properties)
        }
    };

    let mut event = Mapping::new();
    event.insert("Type".into(), kind.into());
    event.insert("Properties".into(), properties.into());

    let mut events = Mapping::new();
    events.insert(name.into(), event.into());
    events
}

fn single(key: &str, value: Value) -> Value {
    let mut mapping = Mapping::new();
    mapping.insert(key.into(), value);
    mapping.into()
}

/// Split without trimming; empty tokens are kept as-is.
fn split_list(raw: &str, separator: char) -> Value {
    Value::Sequence(raw.split(separator).map(Value::from).collect())
}
