//! CLI command implementations

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::{rngs::OsRng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use tracing::info;

use tsspv_core::{
    group, reconstruct, trace, verify_distribution, verify_share, verify_trace, Dealer, Rbox,
    ReconstructionOracle, ThresholdConfig,
};

/// Parameter grid swept by `tsspv bench` when no instance is given
pub const BENCH_GRID: &[(usize, usize, usize)] = &[(32, 17, 11), (64, 33, 22), (128, 65, 43)];

/// TSS-PV - publicly verifiable threshold secret sharing with tracing
#[derive(Parser)]
#[command(name = "tsspv")]
#[command(about = "Publicly verifiable threshold secret sharing with traitor tracing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deal, verify, reconstruct and trace one instance
    Run {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Player indices (0-based) whose shares leak into the oracle;
        /// defaults to the first `collusion` players
        #[arg(long, value_delimiter = ',')]
        leaked: Vec<usize>,

        /// Write the public transcript as JSON
        #[arg(long)]
        transcript_out: Option<PathBuf>,
    },

    /// Time every protocol phase
    Bench {
        #[command(flatten)]
        instance: InstanceArgs,

        /// Print the rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "tsspv.json")]
        path: PathBuf,
    },
}

/// Instance selection shared by `run` and `bench`
#[derive(Args, Default)]
pub struct InstanceArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of players (n)
    #[arg(short = 'n', long)]
    pub players: Option<usize>,

    /// Reconstruction threshold (k)
    #[arg(short = 'k', long)]
    pub threshold: Option<usize>,

    /// Collusion bound (f)
    #[arg(short = 'f', long)]
    pub collusion: Option<usize>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

impl InstanceArgs {
    /// Whether any instance parameter was given
    pub fn is_set(&self) -> bool {
        self.config.is_some()
            || self.players.is_some()
            || self.threshold.is_some()
            || self.collusion.is_some()
    }

    /// Config file (or default) overridden by explicit flags
    pub fn resolve(&self) -> Result<ThresholdConfig> {
        let mut config = match &self.config {
            Some(path) => ThresholdConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => ThresholdConfig::default(),
        };
        if let Some(n) = self.players {
            config.players = n;
        }
        if let Some(k) = self.threshold {
            config.threshold = k;
        }
        if let Some(f) = self.collusion {
            config.collusion = f;
        }
        config.validate()?;
        Ok(config)
    }

    /// Seeded generator, or one keyed from the OS
    pub fn rng(&self) -> Result<ChaCha20Rng> {
        Ok(match self.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_rng(OsRng)?,
        })
    }
}

/// Outcome of `tsspv run`
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Instance parameters
    pub config: ThresholdConfig,
    /// Hex encoding of the dealer commitment
    pub commitment: String,
    /// ShD accepted the transcript
    pub distribution_verified: bool,
    /// The first `k` shares reconstructed `B^s`
    pub quorum_reconstructs: bool,
    /// An empty oracle refused `k - 1` shares
    pub sub_quorum_rejected: bool,
    /// Leaked player indices, sorted and deduplicated
    pub leaked: Vec<usize>,
    /// Indices returned by Trace
    pub traced: Vec<usize>,
    /// TrVer accepted the trace
    pub trace_verified: bool,
    /// Queries answered or refused by the tracing oracle
    pub oracle_queries: u64,
}

/// Run one full instance
pub fn run_instance(
    config: &ThresholdConfig,
    leaked: &[usize],
    rng: &mut ChaCha20Rng,
) -> Result<(RunReport, tsspv_core::DealerOutput)> {
    if let Some(&bad) = leaked.iter().find(|&&i| i >= config.players) {
        bail!("leaked index {} out of range for {} players", bad, config.players);
    }
    let mut leaked = leaked.to_vec();
    leaked.sort_unstable();
    leaked.dedup();
    // beyond the bound every query reconstructs and nobody would be traced
    if leaked.len() > config.collusion {
        bail!(
            "{} leaked shares exceed the collusion bound f = {}",
            leaked.len(),
            config.collusion
        );
    }

    let out = Dealer::setup(config, rng)?;
    let cm = out.tracing_key.commitment(&out.params);
    let secret = out.tracing_key.secret_point();

    let distribution_verified = verify_distribution(&out.params, &out.transcript, &cm);
    let quorum_reconstructs = reconstruct(config.threshold, &out.shares)? == secret;

    let leaked_shares = leaked.iter().map(|&i| out.shares[i]).collect();
    let rbox = Rbox::new(config.threshold, leaked_shares, &out.transcript, &out.params);
    let sub_quorum_rejected = Rbox::new(config.threshold, vec![], &out.transcript, &out.params)
        .query(&out.shares[..config.threshold - 1])
        .is_none();

    let traced = trace(&out.tracing_key, &out.transcript, &out.params, config, &rbox)?;
    let trace_verified = verify_trace(
        &out.verification_key(),
        &traced,
        &out.transcript,
        &out.params,
        config,
        &rbox,
    );

    let report = RunReport {
        config: *config,
        commitment: hex::encode(group::encode_point(&cm)),
        distribution_verified,
        quorum_reconstructs,
        sub_quorum_rejected,
        leaked,
        traced: traced.indices,
        trace_verified,
        oracle_queries: rbox.stats().total(),
    };
    Ok((report, out))
}

/// Timings of one benchmark instance
#[derive(Debug, Serialize)]
pub struct BenchRow {
    /// Instance parameters
    pub config: ThresholdConfig,
    /// Dealer setup
    pub setup: Duration,
    /// ShD over the whole transcript
    pub distribution: Duration,
    /// Mean ShS time per share
    pub share_per_check: Duration,
    /// Interpolation of `k` shares
    pub reconstruct: Duration,
    /// Trace
    pub trace: Duration,
    /// TrVer
    pub trace_verify: Duration,
    /// Oracle queries made by Trace and TrVer
    pub oracle_queries: u64,
    /// Every check passed and Trace found exactly the leaked shares
    pub all_ok: bool,
}

/// Time every phase for one instance; the first `collusion` players leak
pub fn bench_instance(config: &ThresholdConfig, rng: &mut ChaCha20Rng) -> Result<BenchRow> {
    let started = Instant::now();
    let out = Dealer::setup(config, rng)?;
    let setup = started.elapsed();

    let cm = out.tracing_key.commitment(&out.params);
    let started = Instant::now();
    let distribution_ok = verify_distribution(&out.params, &out.transcript, &cm);
    let distribution = started.elapsed();

    let quorum = &out.shares[..config.threshold];
    let started = Instant::now();
    let shares_ok = quorum
        .iter()
        .all(|share| verify_share(&out.params, &out.transcript, share));
    let share_per_check = started.elapsed() / config.threshold as u32;

    let started = Instant::now();
    let recon_ok = reconstruct(config.threshold, quorum)? == out.tracing_key.secret_point();
    let reconstruct_time = started.elapsed();

    let leaked = out.shares[..config.collusion].to_vec();
    let rbox = Rbox::new(config.threshold, leaked, &out.transcript, &out.params);
    let started = Instant::now();
    let traced = trace(&out.tracing_key, &out.transcript, &out.params, config, &rbox)?;
    let trace_time = started.elapsed();

    let started = Instant::now();
    let verified = verify_trace(
        &out.verification_key(),
        &traced,
        &out.transcript,
        &out.params,
        config,
        &rbox,
    );
    let trace_verify = started.elapsed();

    let all_ok = distribution_ok
        && shares_ok
        && recon_ok
        && verified
        && traced.indices == (0..config.collusion).collect::<Vec<_>>();

    Ok(BenchRow {
        config: *config,
        setup,
        distribution,
        share_per_check,
        reconstruct: reconstruct_time,
        trace: trace_time,
        trace_verify,
        oracle_queries: rbox.stats().total(),
        all_ok,
    })
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            instance,
            leaked,
            transcript_out,
        } => {
            let config = instance.resolve()?;
            let mut rng = instance.rng()?;
            let leaked = if leaked.is_empty() {
                (0..config.collusion).collect()
            } else {
                leaked
            };

            let (report, out) = run_instance(&config, &leaked, &mut rng)?;
            if let Some(path) = transcript_out {
                std::fs::write(&path, out.transcript.to_json()?)
                    .with_context(|| format!("writing transcript to {}", path.display()))?;
                info!("Transcript written to {}", path.display());
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !(report.distribution_verified && report.trace_verified) {
                bail!("protocol run failed verification");
            }
        }

        Commands::Bench { instance, json } => {
            let mut rng = instance.rng()?;
            let configs: Vec<ThresholdConfig> = if instance.is_set() {
                vec![instance.resolve()?]
            } else {
                BENCH_GRID
                    .iter()
                    .map(|&(n, k, f)| ThresholdConfig::new(n, k, f))
                    .collect()
            };

            let mut rows = Vec::with_capacity(configs.len());
            for config in &configs {
                info!(n = config.players, k = config.threshold, f = config.collusion, "Benchmarking");
                rows.push(bench_instance(config, &mut rng)?);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            println!(
                "{:>5} {:>5} {:>5} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>6}",
                "n", "k", "f", "setup", "ShD", "ShS", "recon", "trace", "trver", "ok"
            );
            for row in &rows {
                println!(
                    "{:>5} {:>5} {:>5} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?} {:>10.2?} {:>6}",
                    row.config.players,
                    row.config.threshold,
                    row.config.collusion,
                    row.setup,
                    row.distribution,
                    row.share_per_check,
                    row.reconstruct,
                    row.trace,
                    row.trace_verify,
                    row.all_ok
                );
            }
        }

        Commands::InitConfig { path } => {
            ThresholdConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
