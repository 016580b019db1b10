//! hivbind - HIV-1 protease binding affinity predictor.
//! Entry point for the command-line binary.

mod config;
mod render;

use clap::Parser;
use hivbind_molecules::ligand::PubChemClient;
use hivbind_molecules::model::PretrainedArtifacts;
use hivbind_molecules::BindingPipeline;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hivbind")]
#[command(about = "Predict HIV-1 protease binding affinity (ΔG) from a PubChem CID")]
struct Cli {
    /// PubChem Compound IDs to evaluate; starts an interactive session when omitted
    cids: Vec<String>,

    /// Path to hivbind.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory containing rf_model.json and scaler.json
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// PubChem request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,
}

const QUIT_COMMANDS: [&str; 3] = ["quit", "exit", "q"];

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so reports and JSON stay clean on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hivbind=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.models_dir {
        config.set_models_dir(dir);
    }
    if let Some(secs) = cli.timeout {
        anyhow::ensure!(secs > 0, "--timeout must be greater than zero");
        config.pubchem.timeout_secs = secs;
    }

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let artifacts = match PretrainedArtifacts::load(
        &config.artifacts.model_path,
        &config.artifacts.scaler_path,
    ) {
        Ok(a) => a,
        Err(e) => {
            eprint!("{}", render::startup_error(&e));
            return Ok(ExitCode::FAILURE);
        }
    };

    let source = PubChemClient::with_base_url(&config.pubchem.base_url, config.timeout())?;
    let pipeline = BindingPipeline::new(Arc::new(source), artifacts);
    info!(
        "PubChem: {} (timeout {}s)",
        config.pubchem.base_url, config.pubchem.timeout_secs
    );

    if !cli.cids.is_empty() {
        let mut failed = false;
        for cid in &cli.cids {
            failed |= !evaluate(&pipeline, cid, cli.json).await?;
        }
        return Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS });
    }

    interactive(&pipeline, cli.json).await?;
    Ok(ExitCode::SUCCESS)
}

/// Run one request and print the outcome. Returns whether it succeeded.
async fn evaluate(pipeline: &BindingPipeline, cid: &str, json: bool) -> anyhow::Result<bool> {
    match pipeline.run(cid).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::report(&report));
            }
            Ok(true)
        }
        Err(e) => {
            if json {
                let body = serde_json::json!({ "cid": cid.trim(), "error": e.to_string() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print!("{}", render::request_error(&e));
            }
            Ok(false)
        }
    }
}

async fn interactive(pipeline: &BindingPipeline, json: bool) -> anyhow::Result<()> {
    let prompt = std::io::stdin().is_terminal() && !json;
    if prompt {
        println!("{}", render::banner());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if prompt {
            print!("CID> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if QUIT_COMMANDS.contains(&line.trim()) {
            break;
        }
        evaluate(pipeline, &line, json).await?;
    }
    Ok(())
}
