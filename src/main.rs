use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use encounter_builder::{xp_cost, Catalog, Creature, SortKey, MAX_XP, PARTY_LEVEL};

/// Build a level-1 encounter from the bestiary within the XP budget
#[derive(Parser, Debug)]
#[command(name = "encounter-builder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Creature dataset (JSON with a top-level "monsters" array)
    #[arg(long, env = "ENCOUNTER_CATALOG", default_value = "data/monsters.json", global = true)]
    catalog: PathBuf,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Append logs to this file (the UI otherwise discards them)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive encounter builder (default)
    Ui,

    /// Print the filtered catalog with XP costs
    List {
        /// Column to sort by; dataset order when omitted
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// XP cost of a creature level
    Cost {
        #[arg(allow_negative_numbers = true)]
        level: i32,

        #[arg(long, default_value_t = PARTY_LEVEL, allow_negative_numbers = true)]
        party_level: i32,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SortArg {
    Name,
    Level,
    Xp,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Level => SortKey::Level,
            SortArg::Xp => SortKey::Xp,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Ui);

    let interactive = matches!(command, Command::Ui);
    init_tracing(&cli.log_level, cli.log_file.as_deref(), interactive)?;

    match command {
        Command::Ui => run_ui_mode(&cli.catalog),
        Command::List { sort, desc, json } => {
            let catalog = Catalog::from_file(&cli.catalog)?;
            print!("{}", render_list(&catalog, sort.map(SortKey::from), desc, json)?);
            Ok(())
        }
        Command::Cost { level, party_level } => {
            println!("{}", xp_cost(level, party_level));
            Ok(())
        }
    }
}

/// Stderr logging, except in the UI where stderr would draw over the screen
fn init_tracing(level: &str, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {:?}", path))?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .init();
    } else if interactive {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::sink))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

/// One `list --json` row: the creature plus its XP cost
#[derive(Serialize)]
struct ListRow<'a> {
    #[serde(flatten)]
    creature: &'a Creature,
    xp_cost: i32,
}

fn render_list(catalog: &Catalog, sort: Option<SortKey>, descending: bool, json: bool) -> Result<String> {
    let creatures = catalog.sorted(sort, descending);

    if json {
        let rows: Vec<ListRow> = creatures
            .iter()
            .map(|&creature| ListRow {
                creature,
                xp_cost: creature.xp_cost(),
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "{:<32} {:>5} {:>7}  Traits", "Name", "Level", "XP")?;
    writeln!(out, "{}", "─".repeat(72))?;
    for creature in &creatures {
        writeln!(
            out,
            "{:<32} {:>5} {:>7}  {}",
            creature.name,
            creature.level,
            creature.xp_cost(),
            creature.trait_list().join(", ")
        )?;
    }
    writeln!(out, "{}", "─".repeat(72))?;
    writeln!(
        out,
        "{} creatures | budget {} XP at party level {}",
        creatures.len(),
        MAX_XP,
        PARTY_LEVEL
    )?;

    Ok(out)
}

#[cfg(feature = "tui")]
fn run_ui_mode(path: &Path) -> Result<()> {
    use encounter_builder::ui;

    let catalog = Catalog::from_file(path)?;
    if catalog.is_empty() {
        eprintln!("❌ No creatures in {:?} pass the catalog filter.", path);
        std::process::exit(1);
    }

    let mut app = ui::App::new(catalog);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_path: &Path) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print the catalog: encounter-builder list");
    std::process::exit(1);
}
