//! Run or resume the coevolution.

use anyhow::{Context, Result};
use coevo::prelude::*;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::arm::{PlanarArm, PlanarGeometry};
use crate::config::Config;

pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub generations: Option<u32>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub checkpoint: Option<PathBuf>,
}

type Controller = Coevolution<PlanarArm, PlanarGeometry>;

pub fn run(args: RunArgs) -> Result<()> {
    let (mut config, source) = Config::load(args.config.as_deref())?;
    if let Some(n) = args.generations {
        config.evolution.n_gen = n;
    }
    if let Some(seed) = args.seed {
        config.evolution.seed = Some(seed);
    }
    match &source {
        Some(path) => println!("{} Using {}", "→".blue(), path.display()),
        None => println!("{} Using built-in defaults", "→".blue()),
    }

    let (kinematics, geometry) = collaborators(&config);
    let mut rng = seeded_rng(config.evolution.seed);
    let coevo = Coevolution::new(config.evolution.clone(), kinematics, geometry, config.task.tasks())
        .context("Invalid configuration")?;

    drive(coevo, &mut rng, &args)
}

pub fn resume(checkpoint_path: &Path, args: RunArgs) -> Result<()> {
    let (config, _) = Config::load(args.config.as_deref())?;
    let mut checkpoint = load_checkpoint(checkpoint_path)
        .with_context(|| format!("Failed to load checkpoint: {}", checkpoint_path.display()))?;
    if let Some(n) = args.generations {
        checkpoint.config.n_gen = n;
    }
    println!(
        "{} Resuming from generation {} of {}",
        "→".blue(),
        checkpoint.generation.to_string().cyan(),
        checkpoint.config.n_gen.to_string().cyan()
    );

    let (kinematics, geometry) = collaborators(&config);
    let mut rng = seeded_rng(args.seed.or(checkpoint.config.seed));
    let coevo = Coevolution::resume(checkpoint, kinematics, geometry).context("Invalid checkpoint")?;

    drive(coevo, &mut rng, &args)
}

fn collaborators(config: &Config) -> (PlanarArm, PlanarGeometry) {
    (
        PlanarArm::new(&config.arms),
        PlanarGeometry::new(config.evolution.fitness.clearance_radius),
    )
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn drive(mut coevo: Controller, rng: &mut StdRng, args: &RunArgs) -> Result<()> {
    let total = coevo.config().n_gen;
    println!(
        "{} Evolving {} generations ({} individuals per layer, {} layers)...",
        "→".blue(),
        total.to_string().cyan(),
        coevo.config().n_pop.to_string().cyan(),
        coevo.config().n_layers().to_string().cyan()
    );

    let pb = ProgressBar::new(u64::from(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} generations {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );
    pb.set_position(u64::from(coevo.generation()));

    let report = coevo.run_with(rng, |stats| {
        let fitness: Vec<String> = stats
            .robots
            .iter()
            .map(|s| s.best_fitness.map(|f| format!("{:.2}", f)).unwrap_or_else(|| "-".into()))
            .collect();
        pb.set_message(fitness.join(" / "));
        pb.inc(1);
    })?;
    pb.finish_with_message("done");

    print_summary(&report);

    if let Some(path) = &args.output {
        write_report(&report, path).with_context(|| format!("Failed to write report: {}", path.display()))?;
        println!("  {} Report written to {}", "✓".green(), path.display());
    }
    if let Some(path) = &args.checkpoint {
        save_checkpoint(&coevo.checkpoint(), path)
            .with_context(|| format!("Failed to save checkpoint: {}", path.display()))?;
        println!("  {} Checkpoint saved to {}", "✓".green(), path.display());
    }
    debug!("run finished after {} generations", report.generations);
    Ok(())
}

fn print_summary(report: &RunReport) {
    println!();
    println!("{} Evolution complete after {} generations", "✓".green().bold(), report.generations);
    for best in RobotId::ALL.iter().filter_map(|&robot| report.best_for(robot)) {
        let status = if best.is_collision_free() {
            "collision-free".green()
        } else {
            format!("{} colliding instants", best.collision).red()
        };
        println!(
            "  {}  fitness {}  length {}  age {}  {}",
            best.robot.to_string().bold(),
            format!("{:.3}", best.fitness).cyan(),
            format!("{:.3}", best.distance).yellow(),
            best.age,
            status
        );
    }
}
