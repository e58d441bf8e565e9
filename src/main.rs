//! Stowswap CLI - Collision-Free Multi-Robot Warehouse Path Planning
//!
//! Thin wiring: parse arguments, load the map/agent/item/picking-list
//! files, build a world, run one of the two planning modes, and write the
//! result CSV.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "stowswap")]
#[command(author = "Stowswap Team")]
#[command(version = "0.1.0")]
#[command(about = "Collision-Free Multi-Robot Warehouse Path Planning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and execute pickups/dropoffs for a warehouse scenario
    Plan {
        /// Path to the map config (JSON, or CSV with --config)
        #[arg(long)]
        map: PathBuf,

        /// DATASET companion JSON, required when --map is a CSV
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the agent config CSV
        #[arg(long)]
        agents: PathBuf,

        /// Path to the item config CSV
        #[arg(long)]
        items: Option<PathBuf>,

        /// Path to the picking list CSV
        #[arg(long = "picking-list")]
        picking_list: PathBuf,

        /// Path to a manual-assignment CSV; switches task assignment from
        /// nearest-greedy to replaying these rows verbatim
        #[arg(long = "task-assignment")]
        task_assignment: Option<PathBuf>,

        /// Planning mode
        #[arg(long, value_enum, default_value_t = Mode::PushSwap)]
        mode: Mode,

        /// Per-round wall-clock budget in milliseconds (push-swap mode only)
        #[arg(long = "timeout-ms")]
        timeout_ms: Option<u64>,

        /// Path to write the result CSV
        #[arg(long)]
        output: PathBuf,

        /// Print per-round planner diagnostics
        #[arg(short, long)]
        verbose: bool,
    },

    /// Build a world and export it as a `storehouse.map`/`storehouse.task`
    /// pair for an external MAPD solver
    ExportMapd {
        #[arg(long)]
        map: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        agents: PathBuf,

        #[arg(long)]
        items: Option<PathBuf>,

        #[arg(long = "picking-list")]
        picking_list: PathBuf,

        /// Directory to write storehouse.map and storehouse.task into
        #[arg(long = "out-dir")]
        out_dir: PathBuf,
    },

    /// Decode a solver's `storehouse.out` file and print its task
    /// assignments and per-agent paths
    ImportMapd {
        /// Path to the storehouse.out file
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Mode {
    PushSwap,
    Astar,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { map, config, agents, items, picking_list, task_assignment, mode, timeout_ms, output, verbose } => {
            run_plan(&map, config.as_deref(), &agents, items.as_deref(), &picking_list, task_assignment.as_deref(), mode, timeout_ms, &output, verbose)
        }
        Commands::ExportMapd { map, config, agents, items, picking_list, out_dir } => {
            run_export_mapd(&map, config.as_deref(), &agents, items.as_deref(), &picking_list, &out_dir)
        }
        Commands::ImportMapd { input } => run_import_mapd(&input),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_plan(
    map_path: &std::path::Path,
    dataset_config: Option<&std::path::Path>,
    agents_path: &std::path::Path,
    items_path: Option<&std::path::Path>,
    picking_list_path: &std::path::Path,
    task_assignment_path: Option<&std::path::Path>,
    mode: Mode,
    timeout_ms: Option<u64>,
    output_path: &std::path::Path,
    verbose: bool,
) -> anyhow::Result<()> {
    // The DATASET companion JSON only gates which branch `load_map_config`
    // takes for CSV maps; it carries no fields this port reads beyond that,
    // so we just require it to exist rather than actually parsing it.
    if map_path.extension().and_then(|e| e.to_str()) != Some("json") && dataset_config.is_none() {
        anyhow::bail!("--config (DATASET companion) is required when --map is not JSON");
    }

    println!("Loading map from: {}", map_path.display());
    let map_spec = stowswap_config::load_map_config(map_path)?;

    let item_specs = match items_path {
        Some(path) => stowswap_config::load_item_config(path)?,
        None => Vec::new(),
    };
    let agent_specs = stowswap_config::load_agent_config(agents_path)?;
    let picking_list = stowswap_config::load_picking_list(picking_list_path)?;

    println!(
        "World: {}x{} grid, {} rack(s), {} agent(s)",
        map_spec.width,
        map_spec.height,
        map_spec.racks.len(),
        agent_specs.len()
    );

    let mut world = stowswap_sim::World::build(map_spec, item_specs, agent_specs, picking_list)?;

    let agent_names: std::collections::HashMap<_, _> =
        world.agent_by_name.iter().map(|(name, &id)| (id, name.clone())).collect();

    let manual_rows = match task_assignment_path {
        Some(path) => Some(stowswap_config::load_manual_assignment(path)?),
        None => None,
    };

    let started = Instant::now();
    let log = match (mode, manual_rows) {
        (Mode::PushSwap, None) => {
            let budget = timeout_ms.map(|ms| stowswap_planner::PlanningBudget { max_duration: Duration::from_millis(ms) });
            let assignment = stowswap_policies::NearestTaskAssignment::new();
            stowswap_sim::run_push_and_swap_mode(&mut world, &assignment, budget, verbose)?
        }
        (Mode::PushSwap, Some(rows)) => {
            let assignment = resolve_manual_assignment(&world, &rows);
            let budget = timeout_ms.map(|ms| stowswap_planner::PlanningBudget { max_duration: Duration::from_millis(ms) });
            stowswap_sim::run_push_and_swap_mode(&mut world, &assignment, budget, verbose)?
        }
        (Mode::Astar, None) => {
            let assignment = stowswap_policies::NearestTaskAssignment::new();
            stowswap_sim::run_single_agent_mode(&mut world, &assignment)?
        }
        (Mode::Astar, Some(rows)) => {
            let assignment = resolve_manual_assignment(&world, &rows);
            stowswap_sim::run_single_agent_mode(&mut world, &assignment)?
        }
    };
    let elapsed = started.elapsed();

    stowswap_io::write_result_csv(output_path, &log, &agent_names)?;
    println!("Result written to: {}", output_path.display());

    let summary = stowswap_io::summarize(&log, elapsed);
    println!("{summary}");

    Ok(())
}

/// Build a world from the same loader inputs `plan` uses and hand it to an
/// external MAPD solver as a `storehouse.map`/`storehouse.task` pair.
fn run_export_mapd(
    map_path: &std::path::Path,
    dataset_config: Option<&std::path::Path>,
    agents_path: &std::path::Path,
    items_path: Option<&std::path::Path>,
    picking_list_path: &std::path::Path,
    out_dir: &std::path::Path,
) -> anyhow::Result<()> {
    if map_path.extension().and_then(|e| e.to_str()) != Some("json") && dataset_config.is_none() {
        anyhow::bail!("--config (DATASET companion) is required when --map is not JSON");
    }

    let map_spec = stowswap_config::load_map_config(map_path)?;
    let item_specs = match items_path {
        Some(path) => stowswap_config::load_item_config(path)?,
        None => Vec::new(),
    };
    let agent_specs = stowswap_config::load_agent_config(agents_path)?;
    let picking_list = stowswap_config::load_picking_list(picking_list_path)?;
    let world = stowswap_sim::World::build(map_spec, item_specs, agent_specs, picking_list)?;

    std::fs::create_dir_all(out_dir)?;
    let map_out = out_dir.join("storehouse.map");
    let task_out = out_dir.join("storehouse.task");
    stowswap_io::write_storehouse_map(&map_out, &world)?;
    stowswap_io::write_storehouse_task(&task_out, &world)?;

    println!("Wrote {}", map_out.display());
    println!("Wrote {}", task_out.display());
    Ok(())
}

/// Decode a `storehouse.out` file and print a short summary of what it
/// contains, so a solver's output can be sanity-checked from the CLI.
fn run_import_mapd(input_path: &std::path::Path) -> anyhow::Result<()> {
    let output = stowswap_io::read_storehouse_out(input_path)?;

    println!("{} agent(s)", output.paths.len());
    for (i, (assignments, path)) in output.task_assignments.iter().zip(output.paths.iter()).enumerate() {
        println!("agent {i}: {} task assignment(s), {} path step(s)", assignments.len(), path.len());
        for entry in assignments {
            println!(
                "  task {} at {:?} -> {:?} (ideal={}, real={}, delay={})",
                entry.task_id, entry.pos, entry.action, entry.ideal_step, entry.real_step, entry.delay
            );
        }
    }
    Ok(())
}

/// Resolve a manual-assignment CSV (agent name + item name + target +
/// action) into a [`stowswap_policies::ManualTaskAssignment`] against a
/// built world: each row's item is matched to whichever of its tasks
/// targets the row's store point.
fn resolve_manual_assignment(
    world: &stowswap_sim::World,
    rows: &[stowswap_config::ManualAssignmentSpec],
) -> stowswap_policies::ManualTaskAssignment {
    use stowswap_entities::Action;
    use stowswap_policies::AssignmentRow;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(&agent_id) = world.agent_by_name.get(&row.agent_name) else { continue };
        let Some(&item_id) = world.item_by_name.get(&row.item_name) else { continue };
        let action = match row.action {
            stowswap_config::ManualAction::PickUp => Action::PickUp,
            stowswap_config::ManualAction::DropOff => Action::DropOff,
            stowswap_config::ManualAction::Dock => Action::Dock,
        };
        let target_sp = world.store_points.values().find(|sp| sp.pos == row.target).map(|sp| sp.id);
        let task = world.tasks.values().find(|t| {
            t.item == item_id && target_sp.map(|sp| t.target_store_point == sp).unwrap_or(true)
        });
        if let Some(task) = task {
            out.push(AssignmentRow { agent: agent_id, task: task.id, action });
        }
    }
    stowswap_policies::ManualTaskAssignment::new(out)
}
