//! Clauseguard CLI — contract risk analysis from the command line.
//!
//! Usage:
//!   clauseguard analyze <file> [--contract-type rental] [--model <id>]
//!   clauseguard compare <original> <revised> [--side tenant]
//!   clauseguard stats
//!
//! analyze and compare read plain-text contract files, call the Gemini
//! API (GEMINI_API_KEY must be set), and print the JSON result; stats
//! prints the aggregated community dataset without touching the network.

use clap::{Parser, Subcommand};
use clauseguard::{gemini, CommunityStore, ContractAnalyzer, GeminiClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "clauseguard",
    version,
    about = "Contract risk analysis with community-backed insights"
)]
struct Cli {
    /// Model identifier passed to the generation API
    #[arg(long, global = true, default_value = gemini::DEFAULT_MODEL)]
    model: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a contract text file
    Analyze {
        /// Path to the contract text file
        file: PathBuf,
        /// Contract type hint (rental, employment, nda, ...)
        #[arg(long)]
        contract_type: Option<String>,
    },
    /// Compare two versions of a contract
    Compare {
        /// Path to the original contract text file
        original: PathBuf,
        /// Path to the revised contract text file
        revised: PathBuf,
        /// Which side you are on (tenant, employee, buyer, ...)
        #[arg(long, default_value = "tenant")]
        side: String,
    },
    /// Print aggregated community statistics
    Stats,
}

fn build_analyzer(model: &str) -> Result<ContractAnalyzer, String> {
    let api_key = std::env::var("GEMINI_API_KEY")
        .map_err(|_| "GEMINI_API_KEY environment variable not set".to_string())?;
    let client = GeminiClient::new(api_key).with_model(model);
    Ok(ContractAnalyzer::new(Arc::new(client)))
}

fn read_contract(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: failed to render result: {}", e);
            1
        }
    }
}

async fn cmd_analyze(model: &str, file: &Path, contract_type: Option<&str>) -> i32 {
    let analyzer = match build_analyzer(model) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let text = match read_contract(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match analyzer.analyze(&text, contract_type).await {
        Ok(report) => print_json(&report),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

async fn cmd_compare(model: &str, original: &Path, revised: &Path, side: &str) -> i32 {
    let analyzer = match build_analyzer(model) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let (original, revised) = match (read_contract(original), read_contract(revised)) {
        (Ok(o), Ok(r)) => (o, r),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    match analyzer.compare(&original, &revised, side).await {
        Ok(comparison) => print_json(&comparison),
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_stats() -> i32 {
    print_json(&CommunityStore::builtin().aggregate())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Analyze {
            file,
            contract_type,
        } => cmd_analyze(&cli.model, &file, contract_type.as_deref()).await,
        Commands::Compare {
            original,
            revised,
            side,
        } => cmd_compare(&cli.model, &original, &revised, &side).await,
        Commands::Stats => cmd_stats(),
    };
    std::process::exit(code);
}
