use clap::{Parser, Subcommand};
use orrery_catalog::DiffCatalog;
use orrery_patch::DiffStack;
use orrery_persist::{SessionState, SessionStore};
use orrery_universe::{Region, SpawnerRegistry, Universe};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orrery-cli", about = "CLI tool for orrery patch operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version
    Info,
    /// Validate a catalog file and list its diffs
    Inspect {
        /// Path to the diff catalog JSON file
        catalog: PathBuf,
    },
    /// Run an apply/revert/session round trip on a built-in demo universe
    Demo {
        /// Optional path to write and re-read the session file
        #[arg(short, long)]
        session: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("orrery-cli v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Inspect { catalog } => {
            let catalog = DiffCatalog::load(&catalog)?;
            println!("Catalog: {} diffs", catalog.len());
            for name in catalog.names() {
                let def = catalog.get(name).expect("name came from this catalog");
                println!(
                    "  {name}: {} regions, {} actions",
                    def.regions.len(),
                    def.action_count()
                );
            }
        }
        Commands::Demo { session } => {
            run_demo(session)?;
        }
    }

    Ok(())
}

const DEMO_CATALOG: &str = r#"{
    "unidiffs": [
        {
            "name": "gamma-outpost",
            "regions": [
                {
                    "name": "Gamma",
                    "sites": [ { "name": "Outpost", "op": "add" } ],
                    "spawners": [ { "name": "raiders", "chance": 40, "op": "add" } ]
                }
            ]
        },
        {
            "name": "delta-haven",
            "regions": [
                {
                    "name": "Delta",
                    "sites": [ { "name": "Haven", "op": "add" } ]
                }
            ]
        }
    ]
}"#;

fn run_demo(session: Option<PathBuf>) -> anyhow::Result<()> {
    let mut universe = Universe::new();
    universe.insert_region(Region::new("Gamma"));
    universe.insert_region(Region::new("Delta"));

    let mut spawners = SpawnerRegistry::new();
    spawners.register("raiders");

    let catalog = DiffCatalog::parse(DEMO_CATALOG)?;
    let mut stack = DiffStack::new();

    println!("Applying 'gamma-outpost' and 'delta-haven'");
    stack.apply(&mut universe, &spawners, &catalog, "gamma-outpost")?;
    stack.apply(&mut universe, &spawners, &catalog, "delta-haven")?;
    print_universe(&universe);
    println!("Active diffs: {:?}", stack.active_names());

    let state = SessionState::capture(&stack);
    if let Some(path) = &session {
        let store = SessionStore::open(path);
        store.save(&state)?;
        println!("Session saved to {}", path.display());
    }

    println!("Clearing the stack (reverts everything, LIFO)");
    stack.clear(&mut universe);
    print_universe(&universe);

    let state = match &session {
        Some(path) => SessionStore::open(path).load()?,
        None => state,
    };
    println!("Restoring session: {:?}", state.diffs);
    state.restore(&mut stack, &mut universe, &spawners, &catalog);
    print_universe(&universe);
    println!("Active diffs: {:?}", stack.active_names());

    Ok(())
}

fn print_universe(universe: &Universe) {
    for region in universe.regions() {
        println!(
            "  [{}] sites={:?} spawners={}",
            region.name(),
            region.sites(),
            region.spawners().len()
        );
    }
}
