//! Command-line entry point for the payroll engine.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use payroll_engine::assignment::{BulkAssignment, bulk_assign};
use payroll_engine::calculation::{RiskTable, RunTotals, compute_line_item, summarize_run};
use payroll_engine::config::{ConfigLoader, PayrollConfig};
use payroll_engine::models::{Contract, Novelties, PayrollRun, Person};
use payroll_engine::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "payroll-engine",
    about = "Compute payroll line items from contracts and novelties",
    version
)]
struct Cli {
    /// Configuration directory (defaults to the built-in 2025 reference values)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log level or filter directive; RUST_LOG overrides it
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute one line item from a JSON request
    Compute {
        /// Request file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Compute line items for every active contract not yet in a run
    Bulk {
        /// Request file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the occupational-risk table, or resolve one level
    Risk {
        /// Resolve this level instead of printing the table
        #[arg(long)]
        level: Option<u8>,
    },
}

#[derive(Debug, Deserialize)]
struct ComputeRequest {
    run_id: String,
    person: Person,
    contract: Contract,
    #[serde(default)]
    novelties: Novelties,
}

#[derive(Debug, Deserialize)]
struct BulkRequest {
    run: PayrollRun,
    contracts: Vec<Contract>,
    #[serde(default)]
    existing_contract_ids: Vec<String>,
    #[serde(default)]
    novelties: Option<Novelties>,
}

#[derive(Debug, Serialize)]
struct BulkResponse {
    run_id: String,
    #[serde(flatten)]
    assignment: BulkAssignment,
    totals: RunTotals,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(&cli.log_level).context("failed to initialize logging")?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Compute { input } => {
            let request: ComputeRequest = read_request(input.as_deref())?;
            let item = compute_line_item(
                &request.run_id,
                &request.contract,
                &request.person,
                &request.novelties,
                &config,
            )
            .with_context(|| format!("failed to compute contract '{}'", request.contract.id))?;
            print_json(&item)?;
        }
        Command::Bulk { input } => {
            let request: BulkRequest = read_request(input.as_deref())?;
            print_json(&assign_bulk(request, &config)?)?;
        }
        Command::Risk { level } => {
            let table = RiskTable::from_config(&config);
            match level {
                Some(level) => {
                    let resolution = table.resolve(Some(level));
                    println!(
                        "requested {} -> level {} ({}) rate {}{}",
                        level,
                        resolution.level,
                        resolution.label,
                        resolution.rate,
                        if resolution.defaulted { " [clamped]" } else { "" }
                    );
                }
                None => {
                    println!("{}", table.clause());
                    for entry in table.entries() {
                        println!("{}  {:<8}  {}", entry.level, entry.rate, entry.label);
                    }
                }
            }
        }
    }

    Ok(())
}

fn assign_bulk(request: BulkRequest, config: &PayrollConfig) -> Result<BulkResponse> {
    let existing = request.existing_contract_ids.into_iter().collect();
    let defaults = request.novelties.unwrap_or_else(Novelties::neutral);
    let assignment = bulk_assign(&request.run, &request.contracts, &existing, &defaults, config);
    let totals = summarize_run(&assignment.created)
        .with_context(|| format!("failed to total run '{}'", request.run.id))?;

    Ok(BulkResponse {
        run_id: request.run.id,
        assignment,
        totals,
    })
}

fn load_config(path: Option<&Path>) -> Result<PayrollConfig> {
    match path {
        Some(path) => {
            let loader = ConfigLoader::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            Ok(loader.into_config())
        }
        None => Ok(PayrollConfig::reference()),
    }
}

fn read_request<T: DeserializeOwned>(input: Option<&Path>) -> Result<T> {
    let body = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("failed to read request from stdin")?;
            body
        }
    };
    serde_json::from_str(&body).context("request is not valid JSON for this command")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
