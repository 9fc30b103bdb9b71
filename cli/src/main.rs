//! mockchart command-line interface.
//!
//! Generates synthetic records, claims, lab reports and visit notes as JSON
//! on stdout, or sweeps many seeds through the verifier.
//!
//! Usage:
//!   mockchart --seed 42 record
//!   mockchart --today 2026-03-01 claim --diagnosis I10 --diagnosis E11.9
//!   mockchart lab a1c
//!   mockchart --config mockchart.toml verify --count 100

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mockchart_config::GeneratorConfig;
use mockchart_contracts::{clinical::LabTestType, error::MockchartResult};
use mockchart_verify::{fingerprint, validate_claim_json, RecordVerifier};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Synthetic medical records and CMS-1500 claims.
#[derive(Parser, Debug)]
#[command(
    name = "mockchart",
    about = "Generate correlated synthetic medical records and claims",
    long_about = "Generates synthetic-but-consistent patient records, CMS-1500 claims,\n\
                  lab reports and visit notes as JSON. Identical seed and date give\n\
                  identical output."
)]
struct Cli {
    /// Seed for the random generator. Overrides the config file.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// TOML generator configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Generation date (YYYY-MM-DD). Defaults to the local date.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a full patient record.
    Record,
    /// Generate a record and a claim billed from it.
    Claim {
        /// ICD-10 code to bill. Repeat for several; overrides the config pool.
        #[arg(long = "diagnosis", value_name = "CODE")]
        diagnoses: Vec<String>,
    },
    /// Generate one standalone lab report.
    Lab {
        /// cbc, cmp, lipid, a1c, thyroid or urinalysis.
        test_type: LabTestType,
    },
    /// Generate one standalone visit report.
    Visit,
    /// Generate records and claims and check every consistency rule.
    Verify {
        #[arg(long, default_value_t = 25)]
        count: usize,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-stage generation logs on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("mockchart error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Command dispatch ──────────────────────────────────────────────────────────

/// Returns `Ok(false)` when `verify` found failures.
fn run(cli: Cli) -> MockchartResult<bool> {
    let config = resolve_config(&cli)?;
    let mut generator = config.build_generator()?;
    info!(seed = generator.seed(), today = %generator.today(), "generator ready");

    match cli.command {
        Command::Record => {
            let record = generator.generate_record(&config.record)?;
            emit(&record, cli.pretty)?;
        }
        Command::Claim { .. } => {
            let record = generator.generate_record(&config.record)?;
            let claim = generator.generate_claim(Some(&record), config.diagnosis_pool());
            emit(&claim, cli.pretty)?;
        }
        Command::Lab { test_type } => {
            emit(&generator.generate_lab(test_type, None), cli.pretty)?;
        }
        Command::Visit => {
            emit(&generator.generate_visit(None), cli.pretty)?;
        }
        Command::Verify { count } => return verify(&mut generator, &config, count),
    }
    Ok(true)
}

/// Load the config file if given, then apply command-line overrides.
fn resolve_config(cli: &Cli) -> MockchartResult<GeneratorConfig> {
    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(today) = cli.today {
        config.today = Some(today);
    }
    if let Command::Claim { diagnoses } = &cli.command {
        if !diagnoses.is_empty() {
            config.claim.diagnosis_pool = diagnoses.clone();
        }
    }
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> MockchartResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn verify(
    generator: &mut mockchart_core::ChartGenerator,
    config: &GeneratorConfig,
    count: usize,
) -> MockchartResult<bool> {
    let verifier = RecordVerifier::default();
    let mut failed = 0;

    for i in 0..count {
        let record = generator.generate_record(&config.record)?;
        let claim = generator.generate_claim(Some(&record), config.diagnosis_pool());
        let report = verifier
            .verify_all(&record, &claim)?
            .merge(validate_claim_json(&serde_json::to_value(&claim)?)?);

        let digest = fingerprint(&record)?;
        if report.passed {
            println!("record {:>4}  {}  ok", i + 1, &digest[..16]);
        } else {
            failed += 1;
            println!("record {:>4}  {}  FAILED", i + 1, &digest[..16]);
            for failure in &report.failures {
                println!("    [{}] {}", failure.rule_id, failure.message);
            }
        }
    }

    println!();
    println!(
        "seed {}  date {}  {} generated, {} failed",
        generator.seed(),
        generator.today(),
        count,
        failed
    );
    Ok(failed == 0)
}
