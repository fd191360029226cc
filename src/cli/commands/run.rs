//! Run command - Place agents on a map and let them find the exit

use std::{fs::File, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    adapters::GridWorld,
    app::{AgentConfig, AppBuilder},
    cli::{
        config::RunConfig,
        output::{create_episode_progress, format_number, print_kv, print_section},
    },
    pipeline::{Simulation, SimulationSummary},
    ports::GridMap,
    types::Position,
};

#[derive(Parser, Debug)]
#[command(about = "Run navigation agents on a map")]
pub struct RunArgs {
    /// ASCII map (`#` wall, `.` open, `D` door, `E` exit, `S` start)
    #[arg(long, short = 'm')]
    pub map: Option<PathBuf>,

    /// JSON run configuration; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Q-table file to load and, when training, to save
    #[arg(long, short = 't')]
    pub table: Option<PathBuf>,

    /// Number of episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<u64>,

    /// Tick limit per episode
    #[arg(long)]
    pub max_ticks: Option<u64>,

    /// Explore and learn instead of following the table
    #[arg(long)]
    pub train: bool,

    /// Chebyshev radius of each scan
    #[arg(long)]
    pub explore_radius: Option<u32>,

    /// Ticks between table checkpoints
    #[arg(long)]
    pub checkpoint_interval: Option<u64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Merge the configuration file, if any, with the command-line flags.
    pub fn resolve(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("failed to load run config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(map) = &self.map {
            config.map = Some(map.clone());
        }
        if let Some(table) = &self.table {
            config.table = Some(table.clone());
        }
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(max_ticks) = self.max_ticks {
            config.max_ticks = max_ticks;
        }
        if self.train {
            config.train = true;
        }
        if let Some(radius) = self.explore_radius {
            config.explore_radius = radius;
        }
        if let Some(interval) = self.checkpoint_interval {
            config.checkpoint_interval = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct RunReport {
    map: PathBuf,
    train: bool,
    agents: usize,
    seed: Option<u64>,
    exited: usize,
    timed_out: usize,
    table_entries: usize,
    episodes: Vec<SimulationSummary>,
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.resolve()?;
    let Some(map_path) = config.map.clone() else {
        bail!("no map given; pass --map or set \"map\" in the run config");
    };

    let grid = GridWorld::from_file(&map_path)
        .with_context(|| format!("failed to load map {}", map_path.display()))?;
    let starts: Vec<Position> = grid
        .starts()
        .iter()
        .chain(config.starts.iter())
        .copied()
        .collect();
    if starts.is_empty() {
        bail!(
            "map {} has no start cells; mark them with 'S' or list them under \"starts\"",
            map_path.display()
        );
    }
    let grid: Arc<dyn GridMap> = Arc::new(grid);

    let mut builder = AppBuilder::new();
    if let Some(seed) = config.seed {
        builder = builder.with_default_seed(seed);
    }
    let app = builder.build();

    print_section("Grid Navigation");
    print_kv("Map", &map_path.display().to_string());
    print_kv("Grid", &format!("{}x{}", grid.width(), grid.height()));
    print_kv("Agents", &starts.len().to_string());
    print_kv("Mode", if config.train { "training" } else { "exploiting" });
    print_kv("Episodes", &config.episodes.to_string());
    print_kv("Max ticks", &config.max_ticks.to_string());

    if let Some(table) = &config.table {
        let report = app
            .load_table(table)
            .with_context(|| format!("failed to load table {}", table.display()))?;
        print_kv(
            "Loaded entries",
            &format!(
                "{} ({} duplicates, {} skipped)",
                format_number(report.loaded),
                report.duplicates,
                report.skipped
            ),
        );
    }

    let progress = if args.no_progress {
        None
    } else {
        Some(create_episode_progress(config.episodes)?)
    };

    let agent_configs: Vec<AgentConfig> = starts
        .iter()
        .map(|start| config.agent_config(*start))
        .collect();

    let mut episodes = Vec::new();
    let mut exited = 0;
    let mut timed_out = 0;
    for episode in 1..=config.episodes {
        let mut simulation = Simulation::new(&app, Arc::clone(&grid), &agent_configs, None)
            .with_context(|| format!("failed to place agents for episode {episode}"))?;
        let summary = simulation.run(config.max_ticks);
        simulation.clear();

        exited += summary.exited;
        timed_out += summary.remaining;
        if let Some(pb) = &progress {
            pb.set_position(episode);
            pb.set_message(format!("exited {exited}, timed out {timed_out}"));
        }
        episodes.push(summary);
    }

    if let Some(pb) = &progress {
        pb.finish_with_message("done");
    }

    if let Some(table) = config.table.as_ref().filter(|_| config.train) {
        app.save_table(table)
            .with_context(|| format!("failed to save table {}", table.display()))?;
    }

    let table_entries = app.table().len();
    print_section("Summary");
    print_kv("Exited", &format_number(exited));
    print_kv("Timed out", &format_number(timed_out));
    print_kv("Table entries", &format_number(table_entries));
    if let Some(fastest) = episodes
        .iter()
        .filter(|summary| summary.remaining == 0)
        .map(|summary| summary.ticks)
        .min()
    {
        print_kv("Fastest episode", &format!("{fastest} ticks"));
    }

    if let Some(path) = &args.summary {
        let report = RunReport {
            map: map_path,
            train: config.train,
            agents: starts.len(),
            seed: config.seed,
            exited,
            timed_out,
            table_entries,
            episodes,
        };
        let file = File::create(path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        to_writer_pretty(file, &report).context("failed to write summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
