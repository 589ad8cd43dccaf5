use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use checkwise_cli::config::{self, API_URL_ENV, CheckwiseConfig};
use checkwise_cli::record_file::RecordFile;
use checkwise_cli::render;
use checkwise_client::{DiagnosisService, HttpDiagnosisService};
use checkwise_panel::ParameterRegistry;
use checkwise_session::{Session, assess_reliability};

#[derive(Parser)]
#[command(name = "checkwise")]
#[command(version)]
#[command(about = "CBC parameter intake, validation and submission", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Prediction service base URL (overrides the config file and CHECKWISE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active parameter registry
    Parameters {
        /// Use the built-in reference panel instead of fetching metadata
        #[arg(long)]
        offline: bool,
    },

    /// Evaluate a record file without submitting it
    Check {
        /// JSON object of key → number | null | {"value", "unit"}
        record: PathBuf,

        /// Use the built-in reference panel instead of fetching metadata
        #[arg(long)]
        offline: bool,
    },

    /// Validate and submit a record file for prediction
    Submit {
        record: PathBuf,
    },

    /// Extract parameters from a report (PDF, image, spreadsheet or text)
    Upload {
        file: PathBuf,

        /// Submit the extracted record afterwards
        #[arg(long)]
        submit: bool,
    },

    /// Check the prediction service
    Health,

    /// List the conditions the model can predict
    Diseases,

    /// Show or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = config::load_config()?
        .with_overrides(std::env::var(API_URL_ENV).ok(), cli.api_url.clone());
    init_tracing(&config, cli.json);

    match cli.command {
        Commands::Config { action } => run_config(action, &config),
        Commands::Health => {
            let health = service(&config)?.health().await?;
            println!("{}", render::health(&health));
            Ok(())
        }
        Commands::Diseases => {
            let response = service(&config)?.diseases().await?;
            if !response.success {
                return Err(eyre::eyre!(
                    response
                        .error
                        .unwrap_or_else(|| "disease list unavailable".to_string())
                ));
            }
            for disease in response.diseases {
                println!("{disease}");
            }
            Ok(())
        }
        Commands::Parameters { offline } => {
            let session = open_session(&config, offline).await?;
            println!("{}", render::registry(session.registry()));
            Ok(())
        }
        Commands::Check { record, offline } => {
            let session = open_session(&config, offline).await?;
            RecordFile::load(&record)?.apply(&session)?;
            print_report(&session);
            Ok(())
        }
        Commands::Submit { record } => {
            let session = open_session(&config, false).await?;
            RecordFile::load(&record)?.apply(&session)?;
            submit(&session).await
        }
        Commands::Upload { file, submit: then_submit } => {
            let session = open_session(&config, false).await?;
            session.upload(&file).await?;
            print_report(&session);
            if then_submit {
                println!();
                submit(&session).await?;
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &CheckwiseConfig, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn service(config: &CheckwiseConfig) -> Result<Arc<dyn DiagnosisService>> {
    let service = HttpDiagnosisService::new(&config.api_base_url, config.timeout_secs)?;
    Ok(Arc::new(service))
}

async fn open_session(config: &CheckwiseConfig, offline: bool) -> Result<Session> {
    let service = service(config)?;
    if offline {
        return Ok(Session::with_registry(service, ParameterRegistry::reference()));
    }
    Ok(Session::start(service).await)
}

fn print_report(session: &Session) {
    let snapshot = session.snapshot();
    println!(
        "{}",
        render::report(&snapshot.record, &snapshot.report, session.registry())
    );
}

async fn submit(session: &Session) -> Result<()> {
    let report = session.report();
    let model = session.submit().await?;
    let top = model.top().map(|e| e.probability).unwrap_or_default();

    println!("{}", render::prediction(&model));
    println!();
    println!("{}", render::reliability(&assess_reliability(&report, top)));
    Ok(())
}

fn run_config(action: ConfigAction, effective: &CheckwiseConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", config::config_path()?.display());
            println!("{}", serde_json::to_string_pretty(effective)?);
        }
        ConfigAction::Init { force } => {
            if config::has_config() && !force {
                return Err(eyre::eyre!(
                    "config already exists at {} (use --force to overwrite)",
                    config::config_path()?.display()
                ));
            }
            let fresh = CheckwiseConfig {
                created_at: Some(jiff::Timestamp::now()),
                ..CheckwiseConfig::default()
            };
            let path = config::save_config(&fresh)?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}
