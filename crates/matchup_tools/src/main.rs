//! Unit matchup calculator.
//!
//! # Usage
//!
//! ```bash
//! # Twenty spearmen against the same cost of horsemen
//! matchup battle --catalog units.json --a Spearman --b Horseman --count-a 20 --balance
//!
//! # Army B from a RON config with buffs, JSON output
//! matchup battle --catalog units.json --a Archer --config-b knights.ron --json
//!
//! # Cost-matched counts, catalog listing and checks
//! matchup balance --catalog units.json Spearman Horseman
//! matchup units --catalog units.json
//! matchup validate --catalog units.ron
//! ```
//!
//! Reports go to stdout, logs to stderr (`RUST_LOG=debug` for more).

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use matchup_core::army::{ArmyConfig, WeaponMode};
use matchup_core::catalog::{balance_units, UnitCatalog};
use matchup_core::error::{MatchupError, Result};
use matchup_core::report::ResultSink;
use matchup_core::simulation::{run_battle_with, SimulationConfig};
use matchup_tools::listing::list_units;
use matchup_tools::loader::load_catalog;
use matchup_tools::selection::{parse_mode, scale_to_ratio, ArmySelection};
use matchup_tools::sinks::{JsonSink, TextSink};
use matchup_tools::validate::validate_catalog_file;

#[derive(Parser)]
#[command(name = "matchup")]
#[command(about = "Resolve fights between two unit armies")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a battle between two armies
    Battle(BattleArgs),

    /// Print unit counts at which both armies cost the same
    Balance {
        /// Unit catalog (JSON or RON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// First unit
        unit_a: String,

        /// Second unit
        unit_b: String,
    },

    /// List catalog units with ages, costs and tags
    Units {
        /// Unit catalog (JSON or RON)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Check a catalog for unusable entries
    Validate {
        /// Unit catalog (JSON or RON)
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

#[derive(Args)]
struct BattleArgs {
    /// Unit catalog (JSON or RON)
    #[arg(short, long)]
    catalog: PathBuf,

    /// Unit for army A
    #[arg(long = "a")]
    unit_a: Option<String>,

    /// Unit for army B
    #[arg(long = "b")]
    unit_b: Option<String>,

    /// Age for army A (default: 3, or the highest available)
    #[arg(long)]
    age_a: Option<String>,

    /// Age for army B
    #[arg(long)]
    age_b: Option<String>,

    /// Units in army A
    #[arg(long)]
    count_a: Option<u32>,

    /// Units in army B
    #[arg(long)]
    count_b: Option<u32>,

    /// Weapon mode for army A: primary, secondary or both
    #[arg(long, value_parser = parse_mode)]
    mode_a: Option<WeaponMode>,

    /// Weapon mode for army B
    #[arg(long, value_parser = parse_mode)]
    mode_b: Option<WeaponMode>,

    /// Free hits army A lands before time zero
    #[arg(long)]
    first_hits_a: Option<u32>,

    /// Free hits army B lands before time zero
    #[arg(long)]
    first_hits_b: Option<u32>,

    /// RON army config for army A; flags override its fields
    #[arg(long)]
    config_a: Option<PathBuf>,

    /// RON army config for army B
    #[arg(long)]
    config_b: Option<PathBuf>,

    /// Resize both armies to equal cost, keeping at least army A's count
    #[arg(long)]
    balance: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Print every attack event after the summary
    #[arg(long)]
    timeline: bool,
}

fn main() {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Battle(args) => cmd_battle(args),
        Commands::Balance {
            catalog,
            unit_a,
            unit_b,
        } => cmd_balance(&catalog, &unit_a, &unit_b),
        Commands::Units { catalog } => cmd_units(&catalog),
        Commands::Validate { catalog } => cmd_validate(&catalog),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn cmd_battle(args: BattleArgs) -> Result<()> {
    let catalog = load_catalog(&args.catalog)?;

    let mut request_a = ArmySelection {
        unit: args.unit_a,
        age: args.age_a,
        count: args.count_a,
        mode: args.mode_a,
        first_hits: args.first_hits_a,
        config: args.config_a,
    }
    .into_request("A")?;
    let mut request_b = ArmySelection {
        unit: args.unit_b,
        age: args.age_b,
        count: args.count_b,
        mode: args.mode_b,
        first_hits: args.first_hits_b,
        config: args.config_b,
    }
    .into_request("B")?;

    if args.balance {
        match balance_units(&catalog, &request_a.unit, &request_b.unit) {
            Some(ratio) => {
                (request_a.count, request_b.count) = scale_to_ratio(request_a.count, ratio)?;
                tracing::info!(
                    count_a = request_a.count,
                    count_b = request_b.count,
                    "Balanced army sizes by cost"
                );
            }
            None => tracing::warn!("Cannot balance armies: a unit has no cost"),
        }
    }

    let army_a = ArmyConfig::build(&catalog, &request_a)?;
    let army_b = ArmyConfig::build(&catalog, &request_b)?;

    let config = SimulationConfig {
        record_timeline: args.timeline || args.json,
        ..SimulationConfig::default()
    };
    let outcome = run_battle_with(&army_a, &army_b, &config);

    let stdout = std::io::stdout().lock();
    if args.json {
        JsonSink::new(stdout).present(&outcome)
    } else {
        TextSink::new(stdout)
            .with_timeline(args.timeline)
            .present(&outcome)
    }
}

fn cmd_balance(catalog: &Path, unit_a: &str, unit_b: &str) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    catalog.require(unit_a)?;
    catalog.require(unit_b)?;

    let (count_a, count_b) = balance_units(&catalog, unit_a, unit_b).ok_or_else(|| {
        MatchupError::InvalidSelection(format!("{unit_a} or {unit_b} has no cost"))
    })?;
    println!("{count_a} {unit_a} = {count_b} {unit_b}");
    Ok(())
}

fn cmd_units(catalog: &Path) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    for line in list_units(&catalog) {
        println!("{line}");
    }
    Ok(())
}

fn cmd_validate(catalog: &Path) -> Result<()> {
    tracing::info!("Validating catalog: {}", catalog.display());
    let issues = validate_catalog_file(catalog)?;
    if issues.is_empty() {
        tracing::info!("Validation passed");
        Ok(())
    } else {
        for issue in &issues {
            println!("{issue}");
        }
        Err(MatchupError::InvalidCatalog(issues.len()))
    }
}
