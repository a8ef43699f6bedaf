use anyhow::Context;
use clap::{Parser, ValueEnum};
use policy_audit_core::error::GateError;
use policy_audit_core::gate::ReportGate;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Replays a recorded generator output through the report gate.
#[derive(Debug, Parser)]
#[command(name = "report_gate", version)]
struct Args {
    /// Path to the report JSON, or `-` for stdin.
    report_json: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print nothing on acceptance; only the exit code reports the result.
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("report_gate error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let text = read_input(&args.report_json)?;
    let gate = ReportGate::new_v1();

    match gate.accept_str(&text) {
        Ok(outcome) => {
            if !args.quiet {
                match args.format {
                    OutputFormat::Text => println!(
                        "ACCEPTED final_score={} fingerprint={}",
                        outcome.receipt.recomputed_final_score, outcome.receipt.fingerprint
                    ),
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&outcome.receipt)?)
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            match args.format {
                OutputFormat::Text => print_rejection(&err),
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&err.to_rejection())?)
                }
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("reading report from stdin")?;
        return Ok(s);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_rejection(err: &GateError) {
    println!("REJECTED {}", err.kind());
    match err {
        GateError::SchemaViolation(v) | GateError::ScoringInvariantViolation(v) => {
            for x in v {
                println!("  {}: {}", x.path, x.reason);
            }
        }
        GateError::ClauseTraceMissing(v) => {
            for x in v {
                println!("  {}: {}", x.path, x.reason);
            }
        }
        GateError::ScoringMathError {
            stated,
            recomputed,
            penalty_sum,
        } => println!(
            "  audit_ledger.final_score: stated {} recomputed {} penalty_sum {}",
            stated, recomputed, penalty_sum
        ),
    }
}
