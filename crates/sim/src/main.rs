//! Headless combat simulator.
//!
//! Loads content, spawns a scripted encounter and drives the engine at the
//! fixed 60 Hz rate, logging every event. Stands in for a host game loop.
mod config;
mod runner;

use anyhow::{Context, Result};
use combat_content::ContentFactory;
use combat_core::{CombatEngine, CombatEnv};

use config::SimConfig;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = SimConfig::from_env();
    let factory = ContentFactory::new(config.data_dir.clone());

    let registry = factory.load_tags().context("loading tag catalog")?;
    let skills = factory.load_skills().context("loading skills")?;
    let equipment = factory.load_equipment().context("loading equipment")?;
    let combat_config = factory.load_config().context("loading combat config")?;
    let scenario = factory
        .load_scenario(&config.scenario)
        .with_context(|| format!("loading scenario {}", config.scenario))?;

    let seed = config.seed.unwrap_or(scenario.seed);
    let seconds = config.seconds.unwrap_or(scenario.duration);
    tracing::info!(
        "scenario {}: {} combatants, {} scripted actions, seed {}, {:.1}s",
        scenario.name,
        scenario.combatants.len(),
        scenario.script.len(),
        seed,
        seconds
    );

    let engine = CombatEngine::new(registry, combat_config);
    let mut encounter = scenario.encounter(seed);
    let env = CombatEnv::empty().with_equipment(&equipment);

    let summary = runner::run(
        &engine,
        &mut encounter,
        env,
        &skills,
        &scenario,
        seconds,
        config.frame_dt,
    );

    for (id, current, maximum) in runner::standings(&encounter) {
        tracing::info!("{}: {}/{} health", id, current, maximum);
    }
    match summary.winner {
        Some(team) => tracing::info!("team {} wins after {:.2}s", team.0, summary.elapsed),
        None => tracing::info!("no winner after {:.2}s", summary.elapsed),
    }
    tracing::info!(
        "{} actions resolved, {} skipped, {} steps, {} events",
        summary.actions,
        summary.skipped,
        summary.steps,
        summary.events
    );

    Ok(())
}
