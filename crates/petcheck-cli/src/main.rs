//! petcheck CLI - contract checks for pet-store style REST APIs

mod logging;
mod storage;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use petcheck_core::fixture::EntityKind;
use petcheck_core::{Config, RunReport, generate_schema};
use petcheck_runner::{ScenarioRunner, catalog};

const INIT_FILE: &str = ".petcheck.toml";

#[derive(Parser)]
#[command(name = "petcheck")]
#[command(about = "Contract checks for pet-store style REST APIs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "terminal")]
    output: OutputFormat,

    /// Verbose output (scenario progress on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run contract scenarios against the configured service
    Run {
        /// Config file (default: .petcheck.toml, .petcheck.json or petcheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Run only scenarios whose name contains this (repeatable)
        #[arg(short, long)]
        filter: Vec<String>,

        /// Stop after the first failing scenario
        #[arg(long)]
        stop_on_failure: bool,

        /// Do not save the report
        #[arg(long)]
        no_save: bool,

        /// Fixture seed, for reproducing a run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// List built-in scenarios
    List {
        /// Show only scenarios whose name contains this (repeatable)
        #[arg(short, long)]
        filter: Vec<String>,
    },

    /// Print generated request bodies
    Fixture {
        /// Entity kind: pet, order or user
        kind: EntityKind,

        /// Print a JSON array of this many random entities
        #[arg(short = 'n', long, conflicts_with = "test")]
        count: Option<usize>,

        /// Print the deterministic test entity
        #[arg(long)]
        test: bool,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Initialize config file
    Init,

    /// Export JSON Schema of the run report
    Schema,
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Terminal,
    Json,
    Silent,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: {e:#}");
    }

    match run(cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(3)
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Run {
            config,
            filter,
            stop_on_failure,
            no_save,
            seed,
        } => {
            let cfg = match config {
                Some(path) => Config::load(&path)?,
                None => Config::load_default()?,
            };
            run_scenarios(&cfg, filter, stop_on_failure, !no_save, seed, cli.output)
        }

        Commands::List { filter } => {
            let cfg = Config {
                scenarios: filter,
                ..Config::default()
            };
            let scenarios: Vec<_> = catalog::all()
                .into_iter()
                .filter(|s| cfg.selects(&s.id()))
                .collect();
            match cli.output {
                OutputFormat::Terminal => {
                    for s in &scenarios {
                        println!("{:<36} {}", s.id(), s.description);
                    }
                }
                OutputFormat::Json => {
                    let list: Vec<_> = scenarios
                        .iter()
                        .map(|s| serde_json::json!({"name": s.id(), "description": s.description}))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&list)?);
                }
                OutputFormat::Silent => {}
            }
            Ok(0)
        }

        Commands::Fixture {
            kind,
            count,
            test,
            seed,
        } => {
            let mut rng = seed.map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
            let json = match (count, test) {
                (Some(n), _) => kind.array_json(&mut rng, n)?,
                (None, true) => kind.test_json(&mut rng)?,
                (None, false) => kind.random_json(&mut rng)?,
            };
            if cli.output != OutputFormat::Silent {
                println!("{json}");
            }
            Ok(0)
        }

        Commands::Init => {
            let config_path = Path::new(INIT_FILE);
            if config_path.exists() {
                eprintln!("{INIT_FILE} already exists");
                return Ok(1);
            }

            std::fs::write(config_path, Config::example())
                .with_context(|| format!("cannot write {INIT_FILE}"))?;
            println!("Created {INIT_FILE}");
            println!("\nEdit the file to configure:");
            println!("  - base_url: service to check");
            println!("  - api_key: sent on deletes");
            println!("  - scenarios: name filter");
            Ok(0)
        }

        Commands::Schema => {
            println!("{}", generate_schema()?);
            Ok(0)
        }
    }
}

fn run_scenarios(
    cfg: &Config,
    filter: Vec<String>,
    stop_on_failure: bool,
    save: bool,
    seed: Option<u64>,
    output: OutputFormat,
) -> Result<i32> {
    let runner = ScenarioRunner::from_config(cfg)?
        .with_filter(filter)
        .with_stop_on_failure(stop_on_failure || cfg.stop_on_failure)
        .with_seed(seed);

    let catalog = catalog::all();
    let selected = runner.select(&catalog).len();

    if output != OutputFormat::Silent {
        eprintln!("Config:");
        eprintln!("  base_url:  {}", cfg.base_url);
        if !cfg.headers.is_empty() {
            eprintln!("  headers:   {} configured", cfg.headers.len());
        }
        eprintln!("  scenarios: {selected} of {}", catalog.len());
        if let Some(seed) = seed {
            eprintln!("  seed:      {seed}");
        }
        eprintln!();
    }

    if selected == 0 {
        eprintln!("Error: No scenarios selected. Check --filter and the scenarios list in config.");
        return Ok(3);
    }

    let report = runner.run(&catalog);

    match output {
        OutputFormat::Terminal => print_terminal(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Silent => {}
    }

    if save && cfg.save_reports {
        match storage::save_report(cfg, &report) {
            Ok(path) => {
                if output != OutputFormat::Silent {
                    eprintln!("Report saved: {}", path.display());
                }
            }
            Err(e) => eprintln!("Warning: failed to save report: {e}"),
        }
    }

    Ok(report.exit_code())
}

fn print_terminal(report: &RunReport) {
    for scenario in &report.scenarios {
        println!("{}", scenario.summary_line());
    }

    let verdict = match report.exit_code() {
        0 => "PASS",
        1 => "FAIL",
        _ => "ERROR",
    };
    println!("\n{verdict}: {}", report.summary());
    println!(
        "  Duration: {} ms against {}",
        report.duration_ms, report.base_url
    );

    let failed_cleanups: Vec<_> = report
        .scenarios
        .iter()
        .flat_map(|s| s.cleanup.iter())
        .filter(|c| !c.ok)
        .collect();
    if !failed_cleanups.is_empty() {
        println!("\nCleanup warnings ({}):", failed_cleanups.len());
        for c in failed_cleanups {
            let detail = c
                .error
                .clone()
                .or_else(|| c.status.map(|s| format!("status {s}")))
                .unwrap_or_default();
            println!("  {}: {detail}", c.target);
        }
    }
    println!("  Exit code: {}", report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::parse_from([
            "petcheck",
            "run",
            "--filter",
            "pet::",
            "--filter",
            "store::",
            "--stop-on-failure",
            "--seed",
            "7",
            "--output",
            "json",
        ]);
        assert!(cli.output == OutputFormat::Json);
        let Commands::Run {
            filter,
            stop_on_failure,
            seed,
            no_save,
            ..
        } = cli.command
        else {
            panic!("expected run");
        };
        assert_eq!(filter, ["pet::", "store::"]);
        assert!(stop_on_failure);
        assert!(!no_save);
        assert_eq!(seed, Some(7));
    }

    #[test]
    fn fixture_kind_is_case_insensitive() {
        let cli = Cli::parse_from(["petcheck", "fixture", "Order", "--test"]);
        let Commands::Fixture { kind, test, .. } = cli.command else {
            panic!("expected fixture");
        };
        assert_eq!(kind, EntityKind::Order);
        assert!(test);
    }

    #[test]
    fn count_conflicts_with_test() {
        let err = Cli::try_parse_from(["petcheck", "fixture", "pet", "--test", "-n", "2"]);
        assert!(err.is_err());
    }
}
