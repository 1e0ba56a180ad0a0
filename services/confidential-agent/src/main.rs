use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use credtrust_agent::{load_secrets, pipeline, resolve_config, RunOverrides};
use credtrust_attestation::{verify_commitment, verify_input, ATTESTATION_SCHEME};
use credtrust_core::logging;
use credtrust_protected_data::decode_record;
use credtrust_scoring::{known_identifiers, scorer_for_profile};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "credtrust-agent",
    version,
    about = "CredTrust confidential computation agent"
)]
struct Cli {
    /// Print a machine-readable version handshake and exit
    #[arg(long)]
    version_json: bool,

    /// TOML configuration file (also CREDTRUST_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: RunOverrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Score the staged protected dataset and commit the result (default)
    Run,
    /// Verify a committed result offline
    Verify {
        #[arg(long)]
        descriptor: PathBuf,
        /// Protected record the result is expected to be bound to
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionHandshake {
    version: &'static str,
    attestation_scheme: &'static str,
    scoring_functions: [&'static str; 2],
}

fn main() {
    let Cli {
        version_json,
        config,
        overrides,
        command,
    } = Cli::parse();

    if version_json {
        let handshake = VersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            attestation_scheme: ATTESTATION_SCHEME,
            scoring_functions: known_identifiers(),
        };
        let code = match serde_json::to_string(&handshake) {
            Ok(line) => {
                println!("{}", line);
                0
            }
            Err(err) => {
                eprintln!("{}", err);
                1
            }
        };
        std::process::exit(code);
    }

    let code = match command.unwrap_or(Command::Run) {
        Command::Run => run_agent(config.as_deref(), &overrides),
        Command::Verify { descriptor, record } => {
            logging::init();
            match verify(&descriptor, record.as_deref()) {
                Ok(()) => 0,
                Err(err) => {
                    tracing::error!(error = %format!("{:#}", err), "Verification failed");
                    1
                }
            }
        }
    };

    std::process::exit(code);
}

fn run_agent(config_path: Option<&Path>, overrides: &RunOverrides) -> i32 {
    let lookup = |key: &str| std::env::var(key).ok();

    let config = match resolve_config(config_path, lookup, overrides) {
        Ok(config) => config,
        Err(err) => {
            logging::init();
            tracing::error!(error = %err, exit_code = err.exit_code(), "Invalid configuration");
            return err.exit_code();
        }
    };

    logging::init_with_format(config.log_format);

    let outcome = load_secrets(&config, lookup).and_then(|store| {
        let scorer = scorer_for_profile(config.profile);
        pipeline::run(&config, store, scorer.as_ref())
    });

    match outcome {
        Ok(commitment) => {
            println!("{}", commitment.descriptor_path.display());
            0
        }
        Err(err) => {
            tracing::error!(
                error = %err,
                exit_code = err.exit_code(),
                "Confidential computation failed"
            );
            err.exit_code()
        }
    }
}

fn verify(descriptor: &Path, record: Option<&Path>) -> Result<()> {
    let verified = verify_commitment(descriptor)
        .with_context(|| format!("failed to verify commitment: {}", descriptor.display()))?;

    if let Some(path) = record {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read record: {}", path.display()))?;
        let input = decode_record(&bytes)
            .with_context(|| format!("failed to decode record: {}", path.display()))?;
        verify_input(&verified.record, &input).context("record does not match commitment")?;
    }

    println!(
        "verified result={} score={} tier={} attestation={}",
        verified.result_path.display(),
        verified.record.score,
        verified.record.tier,
        verified.record.attestation
    );
    Ok(())
}
