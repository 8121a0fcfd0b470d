use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use lambda_forge::{
    cli::{Cli, Commands},
    common::file_utils::{ensure_writable, read_file_safe, write_artifact, MAX_SOURCE_SIZE},
    config::{self, types::Config},
    generator::{self, TEMPLATE_FILE_NAME},
    workflow, ChatClient,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn run() -> lambda_forge::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let settings = config::load_config(cli.settings.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Init { output, force } => handle_init(&output, force, quiet),
        Commands::Template {
            config,
            output,
            dry_run,
            force,
        } => handle_template(&settings, &config, output, dry_run, force, quiet),
        Commands::Generate {
            config,
            description,
            output,
            no_review,
            dry_run,
            force,
        } => {
            handle_generate(
                &settings,
                &config,
                &description,
                output,
                !no_review,
                dry_run,
                force,
                quiet,
            )
            .await
        }
        Commands::Analyze { handler, template } => {
            handle_analyze(&settings, &handler, template.as_deref(), quiet).await
        }
        Commands::Improve {
            handler,
            output,
            dry_run,
            force,
        } => handle_improve(&settings, &handler, output, dry_run, force, quiet).await,
    }
}

/// Resolve the credential and build the model client. Only commands that
/// talk to the model call this.
fn build_model(settings: &Config) -> lambda_forge::Result<ChatClient> {
    let api_key = config::resolve_api_key(&settings.llm)?;
    let client = ChatClient::new(&settings.llm, api_key)?;
    log::info!("Using model {}", client.model());
    Ok(client)
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn output_dir(settings: &Config, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| settings.output.directory.clone())
}

fn handle_init(output: &Path, force: bool, quiet: bool) -> lambda_forge::Result<()> {
    write_artifact(output, config::SAMPLE_FUNCTION_CONFIG, force)?;
    if !quiet {
        println!("✅ Sample configuration written to {}", output.display());
        println!(
            "   Next: lambda-forge template --config {}",
            output.display()
        );
    }
    Ok(())
}

fn handle_template(
    settings: &Config,
    config_path: &Path,
    output: Option<PathBuf>,
    dry_run: bool,
    force: bool,
    quiet: bool,
) -> lambda_forge::Result<()> {
    let function = config::load_function_config(config_path)?;
    let template = generator::generate_sam_template(&function)?;

    if dry_run {
        println!("{}", template);
        return Ok(());
    }

    let path = output_dir(settings, output).join(TEMPLATE_FILE_NAME);
    write_artifact(&path, &template, force || settings.output.overwrite_existing)?;
    if !quiet {
        println!("✅ {} generated successfully!", path.display());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_generate(
    settings: &Config,
    config_path: &Path,
    description: &str,
    output: Option<PathBuf>,
    review: bool,
    dry_run: bool,
    force: bool,
    quiet: bool,
) -> lambda_forge::Result<()> {
    let function = config::load_function_config(config_path)?;
    let dir = output_dir(settings, output);
    let force = force || settings.output.overwrite_existing;
    let handler_path = dir.join(&settings.output.handler_file);
    let template_path = dir.join(TEMPLATE_FILE_NAME);

    // Both files or neither, and no model calls for output we cannot write
    if !dry_run {
        ensure_writable(&[handler_path.as_path(), template_path.as_path()], force)?;
    }
    let model = build_model(settings)?;

    let pb = spinner("Generating handler code...", quiet);
    let result = workflow::generate_function(&model, &function, description, review).await;
    pb.finish_and_clear();
    let generated = result?;

    if dry_run {
        println!("{}", format!("--- {} (dry run) ---", settings.output.handler_file).bold());
        println!("{}", generated.code);
        println!("{}", format!("--- {} (dry run) ---", TEMPLATE_FILE_NAME).bold());
        println!("{}", generated.template);
    } else {
        write_artifact(&handler_path, &generated.code, force)?;
        write_artifact(&template_path, &generated.template, force)?;
        if !quiet {
            println!("✅ {} generated successfully!", handler_path.display());
            println!("✅ {} generated successfully!", template_path.display());
        }
    }

    if let Some(explanation) = &generated.explanation {
        if !quiet {
            println!("\n{}", "📚 Code explanation".bright_cyan().bold());
        }
        println!("{}", explanation);
    }

    if !quiet && !dry_run {
        println!("\n{}", "🚀 Next steps".bright_green().bold());
        println!("   sam build");
        println!("   sam deploy --guided");
    }
    Ok(())
}

async fn handle_analyze(
    settings: &Config,
    handler: &Path,
    template: Option<&Path>,
    quiet: bool,
) -> lambda_forge::Result<()> {
    let handler_code = read_file_safe(handler, MAX_SOURCE_SIZE)?;
    let template = match template {
        Some(path) => Some(read_file_safe(path, MAX_SOURCE_SIZE)?),
        None => None,
    };
    let model = build_model(settings)?;

    let pb = spinner("Analyzing handler...", quiet);
    let result = workflow::analyze_function(&model, &handler_code, template.as_deref()).await;
    pb.finish_and_clear();
    let analysis = result?;

    if !quiet {
        println!("{}", "📋 Detailed analysis".bright_cyan().bold());
    }
    println!("{}", analysis);
    Ok(())
}

async fn handle_improve(
    settings: &Config,
    handler: &Path,
    output: Option<PathBuf>,
    dry_run: bool,
    force: bool,
    quiet: bool,
) -> lambda_forge::Result<()> {
    let handler_code = read_file_safe(handler, MAX_SOURCE_SIZE)?;
    let path = output.unwrap_or_else(|| {
        settings
            .output
            .directory
            .join(&settings.output.improved_handler_file)
    });
    let force = force || settings.output.overwrite_existing;
    if !dry_run {
        ensure_writable(&[path.as_path()], force)?;
    }
    let model = build_model(settings)?;

    let pb = spinner("Generating improved handler...", quiet);
    let result = workflow::improve_function(&model, &handler_code).await;
    pb.finish_and_clear();
    let improved = result?;

    if dry_run {
        println!("{}", improved);
        return Ok(());
    }

    write_artifact(&path, &improved, force)?;
    if !quiet {
        println!("✅ Improved handler written to {}", path.display());
    }
    Ok(())
}
