use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use permit_audit::audit::{
    run_cross_employer_flow, run_inbound_relocation_flow, run_job_quota_flow, QuotaConfig,
    RecordSet, RelocationConfig,
};
use permit_audit::config::AppConfig;
use permit_audit::error::AppError;
use permit_audit::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "permit-audit",
    about = "Audit employment-permit record batches against regulatory rule flows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Job-quota compliance audit (rule R1)
    Flow1(BatchArgs),
    /// Cross-employer relocation audit from A to B (rule R2)
    Flow2(CrossEmployerArgs),
    /// Inbound relocation audit into B (rule R4)
    Flow4(BatchArgs),
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// JSON file with the normalized current batch
    #[arg(long)]
    current: PathBuf,
    /// JSON file with the normalized historical ledger
    #[arg(long)]
    historical: PathBuf,
    /// JSON file with the flow configuration
    #[arg(long)]
    config: PathBuf,
}

#[derive(Args, Debug)]
struct CrossEmployerArgs {
    #[command(flatten)]
    batch: BatchArgs,
    /// Employer number the aliens are leaving
    #[arg(long)]
    employer_a: String,
    /// Employer number the aliens are joining
    #[arg(long)]
    employer_b: String,
}

fn main() -> Result<(), AppError> {
    let app_config = AppConfig::load();
    telemetry::init(&app_config.telemetry)?;

    let cli = Cli::parse();
    match cli.command {
        Command::Flow1(args) => {
            let (current, historical) = load_batches(&args)?;
            let config: QuotaConfig = load_json(&args.config)?;
            let result = run_job_quota_flow(&current, &historical, &config)?;
            info!(
                flow = "flow1",
                status = %result.verdict.status,
                count_abnormal = result.verdict.count_abnormal,
                "audit complete"
            );
            print_result(&result)
        }
        Command::Flow2(args) => {
            let (current, historical) = load_batches(&args.batch)?;
            let config: RelocationConfig = load_json(&args.batch.config)?;
            let result = run_cross_employer_flow(
                &current,
                &historical,
                &config,
                &args.employer_a,
                &args.employer_b,
            )?;
            info!(
                flow = "flow2",
                status = %result.verdict.status,
                count_abnormal = result.verdict.count_abnormal,
                "audit complete"
            );
            print_result(&result)
        }
        Command::Flow4(args) => {
            let (current, historical) = load_batches(&args)?;
            let config: RelocationConfig = load_json(&args.config)?;
            let result = run_inbound_relocation_flow(&current, &historical, &config)?;
            info!(
                flow = "flow4",
                status = %result.verdict.status,
                count_abnormal = result.verdict.count_abnormal,
                "audit complete"
            );
            print_result(&result)
        }
    }
}

fn load_batches(args: &BatchArgs) -> Result<(RecordSet, RecordSet), AppError> {
    let current: RecordSet = load_json(&args.current)?;
    let historical: RecordSet = load_json(&args.historical)?;
    info!(
        current = current.len(),
        historical = historical.len(),
        "record batches loaded"
    );
    Ok((current, historical))
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_result<T: Serialize>(result: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}
