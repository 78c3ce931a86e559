//! Star Dodger entry point
//!
//! Headless runner: drives a session at a simulated 60 Hz, optionally with
//! the demo autopilot at the controls, and reports how the run went.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use glam::Vec2;

use star_dodger::autopilot::Autopilot;
use star_dodger::consts::*;
use star_dodger::session::Session;
use star_dodger::settings::Settings;
use star_dodger::sim::{GameEvent, GamePhase};

#[derive(Parser, Debug)]
#[command(name = "star-dodger")]
#[command(about = "Headless Star Dodger simulation runner")]
struct Cli {
    /// Spawner seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Frames to simulate at 60 Hz
    #[arg(long, default_value_t = 3_600)]
    frames: u32,
    /// Playfield width in pixels
    #[arg(long, default_value_t = DEFAULT_FIELD_WIDTH)]
    width: f32,
    /// Playfield height in pixels
    #[arg(long, default_value_t = DEFAULT_FIELD_HEIGHT)]
    height: f32,
    /// Settings file
    #[arg(long, default_value = Settings::STORAGE_KEY)]
    settings: PathBuf,
    /// Joystick sensitivity in (0, 2]; saved to the settings file
    #[arg(long)]
    sensitivity: Option<f32>,
    /// Leave the controls idle instead of running the demo autopilot
    #[arg(long, default_value_t = false)]
    no_autopilot: bool,
    /// Print the final snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u32,
    runs: u32,
    best_score: u64,
    best_level: u32,
    levels_completed: u32,
    bosses_seen: u32,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Star Dodger (headless) starting...");

    if cli.frames == 0 {
        return Err(anyhow!("--frames must be > 0"));
    }
    if !(cli.width.is_finite() && cli.height.is_finite() && cli.width > 0.0 && cli.height > 0.0) {
        return Err(anyhow!("playfield must be positive, got {}x{}", cli.width, cli.height));
    }

    let mut settings = Settings::load_from(&cli.settings);
    if let Some(sensitivity) = cli.sensitivity {
        if !settings.set_sensitivity(sensitivity) {
            return Err(anyhow!("--sensitivity must be in (0, 2], got {sensitivity}"));
        }
        settings
            .save_to(&cli.settings)
            .with_context(|| format!("failed to write {}", cli.settings.display()))?;
    }

    let mut session = Session::new(cli.seed, Vec2::new(cli.width, cli.height), settings);
    let mut autopilot = (!cli.no_autopilot).then(Autopilot::new);
    let summary = run(&mut session, autopilot.as_mut(), cli.frames);

    if cli.json {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("failed to serialize snapshot")?;
        println!("{json}");
    } else {
        print_summary(&summary, &session);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}

fn run(session: &mut Session, mut autopilot: Option<&mut Autopilot>, frames: u32) -> RunSummary {
    let mut summary = RunSummary::default();
    let mut last_phase = session.phase();
    let frame_ms = f64::from(NOMINAL_FRAME_DT) * 1000.0;

    // Without an autopilot the runner still presses start once
    if autopilot.is_none() {
        session.start();
    }

    for frame_index in 0..frames {
        if let Some(pilot) = autopilot.as_deref_mut() {
            let intent = pilot.intents(&session.snapshot());
            if intent.start {
                session.start();
            }
            if intent.next_level {
                session.advance_to_next_level();
            }
            match intent.movement {
                Some(vector) => session.set_movement_vector(vector),
                None => session.clear_movement_vector(),
            }
            session.set_firing(intent.firing);
        }

        let frame = session.frame(f64::from(frame_index) * frame_ms);
        summary.frames += 1;

        for event in &frame.events {
            match event {
                GameEvent::BossSpawned { .. } => summary.bosses_seen += 1,
                GameEvent::LevelCompleted { level } => {
                    summary.levels_completed += 1;
                    log::info!("Level {} cleared at frame {}", level, frame_index);
                }
                GameEvent::GameOver { reason } => {
                    log::info!("Run ended ({:?}) at frame {}", reason, frame_index);
                }
                _ => {}
            }
        }

        let snapshot = &frame.snapshot;
        summary.best_score = summary.best_score.max(snapshot.score);
        summary.best_level = summary.best_level.max(snapshot.level);
        if snapshot.phase != last_phase {
            log::debug!("Phase {:?} -> {:?}", last_phase, snapshot.phase);
            if snapshot.phase == GamePhase::Playing && last_phase != GamePhase::Paused {
                summary.runs += u32::from(snapshot.level == 1);
            }
            last_phase = snapshot.phase;
        }
    }

    summary
}

fn print_summary(summary: &RunSummary, session: &Session) {
    let snapshot = session.snapshot();
    println!("Frames simulated:  {}", summary.frames);
    println!("Runs started:      {}", summary.runs);
    println!("Best score:        {}", summary.best_score);
    println!("Best level:        {}", summary.best_level);
    println!("Levels completed:  {}", summary.levels_completed);
    println!("Bosses seen:       {}", summary.bosses_seen);
    println!(
        "Final state:       {:?} (level {}, score {}, {:.1}s left)",
        snapshot.phase, snapshot.level, snapshot.score, snapshot.time_remaining
    );
    if snapshot.phase == GamePhase::GameOver {
        println!("Game over reason:  {:?}", snapshot.game_over_reason);
    }
}
