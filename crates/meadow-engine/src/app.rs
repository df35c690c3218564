//! Headless run loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use meadow_gameplay::{GameStats, PlayerController, Skirmish};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::input::{Script, ScriptedInput};
use crate::timing::FrameTiming;

/// Options for one run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Config file to load instead of `meadow.toml`
    pub config_path: Option<PathBuf>,
    /// Number of ticks to simulate
    pub ticks: u64,
    /// Override for the initial NPC count
    pub npcs: Option<u32>,
    /// Override for the RNG seed
    pub seed: Option<u64>,
    /// Player input script
    pub script: Script,
    /// Pace ticks against the wall clock
    pub realtime: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated seconds
    pub seconds: f64,
    /// NPC totals
    pub stats: GameStats,
    /// Player kills
    pub score: u32,
    /// NPCs alive at the end
    pub npcs_alive: usize,
}

/// Resolves the configuration for a run: file, then command-line overrides.
pub fn load_config(options: &RunOptions) -> EngineConfig {
    let mut config = match &options.config_path {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    if let Some(npcs) = options.npcs {
        config.skirmish.world.initial_npcs = npcs;
    }
    if options.seed.is_some() {
        config.skirmish.world.seed = options.seed;
    }
    config.validate();
    config
}

/// Runs the skirmish and returns its summary.
pub fn run(config: &EngineConfig, options: &RunOptions) -> Result<RunSummary> {
    let mut world =
        Skirmish::start(config.skirmish.clone()).context("failed to start skirmish")?;
    let mut pilot = ScriptedInput::new(options.script);
    let mut timing = FrameTiming::new(config.target_fps);
    let dt = timing.fixed_dt();

    info!(
        ticks = options.ticks,
        npcs = world.npc_count(),
        script = ?options.script,
        realtime = options.realtime,
        "run started"
    );

    timing.reset();
    let mut done = 0;
    while done < options.ticks {
        let steps = if options.realtime {
            let frame = timing.delta_time();
            u64::from(timing.accumulate(frame))
        } else {
            1
        };

        for _ in 0..steps.min(options.ticks - done) {
            step(&mut world, &mut pilot, config, dt)?;
            done += 1;
        }

        if options.realtime {
            timing.sleep_remainder();
        }
    }
    if options.realtime {
        debug!(fps = timing.current_fps(), "average frame rate");
    }

    let summary = RunSummary {
        ticks: world.tick_count(),
        seconds: world.now().as_secs_f64(),
        stats: *world.stats(),
        score: world
            .player_controller()
            .map_or(0, PlayerController::score),
        npcs_alive: world.npc_count(),
    };
    info!(
        ticks = summary.ticks,
        killed = summary.stats.killed,
        damage = summary.stats.damage,
        score = summary.score,
        "run finished"
    );
    Ok(summary)
}

fn step(
    world: &mut Skirmish,
    pilot: &mut ScriptedInput,
    config: &EngineConfig,
    dt: f32,
) -> Result<()> {
    let input = pilot.next(world);
    let report = world.tick(dt, &input);

    for id in &report.kills {
        debug!(%id, tick = report.tick, "npc killed");
    }

    if report.npcs_alive == 0 && config.respawn_batch > 0 {
        world
            .spawn_npcs(config.respawn_batch as usize)
            .context("failed to respawn npcs")?;
        info!(count = config.respawn_batch, tick = report.tick, "field cleared, respawning");
    }

    if config.report_interval > 0 && report.tick % config.report_interval == 0 {
        let stats = world.stats();
        info!(
            tick = report.tick,
            time = ?report.now,
            spawned = stats.spawned,
            killed = stats.killed,
            alive = report.npcs_alive,
            damage = stats.damage,
            "status"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn options(ticks: u64) -> RunOptions {
        RunOptions {
            config_path: None,
            ticks,
            npcs: Some(5),
            seed: Some(99),
            script: Script::Hunter,
            realtime: false,
        }
    }

    fn config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.skirmish.world.seed = Some(99);
        config.skirmish.world.initial_npcs = 5;
        config
    }

    #[test]
    fn test_overrides_apply_over_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("meadow.toml");
        let mut on_disk = EngineConfig::default();
        on_disk.target_fps = 30;
        on_disk.skirmish.world.initial_npcs = 2;
        on_disk.save_to(&path).expect("Failed to save config");

        let mut opts = options(1);
        opts.config_path = Some(path);
        let loaded = load_config(&opts);

        assert_eq!(loaded.target_fps, 30);
        assert_eq!(loaded.skirmish.world.initial_npcs, 5);
        assert_eq!(loaded.skirmish.world.seed, Some(99));
    }

    #[test]
    fn test_run_is_deterministic() {
        let a = run(&config(), &options(600)).expect("run succeeds");
        let b = run(&config(), &options(600)).expect("run succeeds");
        assert_eq!(a, b);
        assert_eq!(a.ticks, 600);
        assert!((a.seconds - 10.0).abs() < 0.01);
    }

    #[test]
    fn test_hunter_scores() {
        let summary = run(&config(), &options(60 * 120)).expect("run succeeds");
        assert_eq!(summary.stats.killed, summary.score);
        assert!(summary.score > 0);
        assert!(summary.stats.damage > 0);
    }

    #[test]
    fn test_cleared_field_respawns() {
        let mut config = config();
        config.skirmish.world.width = 600.0;
        config.skirmish.world.height = 600.0;
        config.skirmish.world.initial_npcs = 1;
        config.respawn_batch = 3;

        let summary = run(&config, &options(60 * 30)).expect("run succeeds");
        assert!(summary.stats.killed >= 1);
        assert!(summary.stats.spawned > 1);
        assert!(summary.npcs_alive > 0);
    }

    #[test]
    fn test_invalid_config_fails() {
        let mut config = config();
        config.skirmish.npc.close_range = 1000.0;
        assert!(run(&config, &options(1)).is_err());
    }
}
