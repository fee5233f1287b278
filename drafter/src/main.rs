//! Drafter binary entry point

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use drafter::core::TemplateRegistry;
use drafter::{DocumentGenerator, DrafterConfig, DrafterError, HttpProviderClient};
use shared::{logging, DocumentType, GenerationRequest, Priority, UsageSummary};

/// Government correspondence drafter
#[derive(Parser)]
#[command(name = "drafter")]
#[command(about = "Drafts official letters, emails, minutes, memos, circulars and notices with LLM providers")]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one document and print the result as JSON
    Generate(GenerateArgs),
    /// Print the template catalogue as JSON
    Templates,
    /// Aggregate persisted results (one GenerationResult JSON per line)
    Summary {
        /// Results file in JSON lines format
        path: PathBuf,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Document type (official_letter, email, meeting_minutes, memo, circular, notice)
    #[arg(long = "type")]
    document_type: Option<DocumentType>,

    #[arg(long)]
    subject: Option<String>,

    /// Main content of the document
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,

    /// Read the main content from a file
    #[arg(long)]
    content_file: Option<PathBuf>,

    /// low, normal, high or urgent
    #[arg(long)]
    priority: Option<Priority>,

    /// Metadata as key=value; values containing ';' become lists
    #[arg(long = "meta", value_parser = parse_meta)]
    meta: Vec<(String, Value)>,

    /// Full request as a JSON file; other flags override its fields
    #[arg(long)]
    request: Option<PathBuf>,

    /// Overall generation budget in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print only the generated text
    #[arg(long)]
    text: bool,
}

fn parse_meta(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty metadata key in '{raw}'"));
    }

    let value = if value.contains(';') {
        Value::Array(
            value
                .split(';')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )
    } else {
        Value::String(value.trim().to_string())
    };
    Ok((key.to_string(), value))
}

fn build_request(args: &GenerateArgs) -> anyhow::Result<GenerationRequest> {
    let base = match &args.request {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading request file {}", path.display()))?;
            Some(
                serde_json::from_str::<GenerationRequest>(&raw)
                    .with_context(|| format!("parsing request file {}", path.display()))?,
            )
        }
        None => None,
    };

    let content = match (&args.content, &args.content_file) {
        (Some(content), _) => Some(content.clone()),
        (None, Some(path)) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("reading content file {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let mut request = match base {
        Some(mut request) => {
            if let Some(document_type) = args.document_type {
                request.document_type = document_type;
            }
            if let Some(subject) = &args.subject {
                request.subject = subject.clone();
            }
            if let Some(content) = content {
                request.content = content;
            }
            request
        }
        None => {
            let Some(document_type) = args.document_type else {
                bail!("--type is required without --request");
            };
            GenerationRequest::new(
                document_type,
                args.subject.clone().unwrap_or_default(),
                content.unwrap_or_default(),
            )
        }
    };

    if let Some(priority) = args.priority {
        request.priority = priority;
    }
    for (key, value) in &args.meta {
        request.metadata.insert(key.clone(), value.clone());
    }
    Ok(request)
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<ExitCode> {
    let request = build_request(&args)?;

    let mut config = DrafterConfig::from_env().context("loading configuration")?;
    if let Some(secs) = args.timeout_secs {
        config = config.with_generation_timeout(Duration::from_secs(secs));
    }

    let providers: Vec<String> = config
        .providers
        .iter()
        .map(|p| format!("{}:{}", p.provider, p.model))
        .collect();
    logging::log_startup(
        "drafter",
        &format!(
            "drafter: providers [{}], budget {:?}, retries {}",
            providers.join(", "),
            config.generation_timeout,
            config.retry.max_retries
        ),
    );

    let client = HttpProviderClient::new(config.api_keys.clone());
    let generator = DocumentGenerator::from_config(client, &config);

    match generator
        .generate(&request, &config.providers, config.generation_timeout)
        .await
    {
        Ok(result) => {
            if args.text {
                println!("{}", result.text);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            report_failure(&error)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn report_failure(error: &DrafterError) -> anyhow::Result<()> {
    logging::log_error("drafter", "generation", error);
    let report = json!({
        "error": error.to_string(),
        "retryable": error.is_retryable(),
        "attempts": error.attempts(),
    });
    eprintln!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_summary(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading results file {}", path.display()))?;
    let summary = UsageSummary::from_json_lines(&raw)
        .with_context(|| format!("parsing results file {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    match args.command {
        Command::Generate(generate) => run_generate(generate).await,
        Command::Templates => {
            let catalogue = TemplateRegistry::new().catalogue();
            println!("{}", serde_json::to_string_pretty(&catalogue)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Summary { path } => {
            run_summary(&path)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("recipient_name=Shri A. Patil").unwrap(),
            ("recipient_name".to_string(), Value::String("Shri A. Patil".to_string()))
        );
        assert_eq!(
            parse_meta("attendees=CE; EE ;").unwrap().1,
            json!(["CE", "EE"])
        );
        assert!(parse_meta("novalue").is_err());
        assert!(parse_meta("=x").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "drafter",
            "generate",
            "--type",
            "meeting-minutes",
            "--subject",
            "Review",
            "--content",
            "Notes",
            "--meta",
            "meeting_date=12/06/2025",
            "--priority",
            "high",
        ])
        .unwrap();

        let Command::Generate(generate) = args.command else {
            panic!("expected generate");
        };
        let request = build_request(&generate).unwrap();
        assert_eq!(request.document_type, DocumentType::MeetingMinutes);
        assert_eq!(request.priority, Priority::High);
        assert_eq!(request.metadata_text("meeting_date").as_deref(), Some("12/06/2025"));
    }
}
