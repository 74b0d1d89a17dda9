/// Headless driver: plays the campaign with AI-controlled players.
///
/// ## Loop (one iteration per simulated tick):
///   1. Autopilot every live player with the configured profile
///   2. `session.tick(now)`, events logged at debug
///   3. Completed level → advance; won / game over → stop
///
/// The final session snapshot is printed as JSON on stdout.
/// `RUST_LOG` controls verbosity (default `info`).

use icebreak::config::{GameConfig, SessionConfig};
use icebreak::error::SessionError;
use icebreak::sim::{GameEvent, GameSession};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    match run(&config) {
        Ok(summary) => println!("{summary}"),
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    }
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Won,
    GameOver,
    OutOfTicks,
}

fn run(config: &GameConfig) -> Result<String, SessionError> {
    let mut session = GameSession::from_config(config, 0)?;
    let (outcome, now) = play(&mut session, &config.session)?;

    log::info!(
        "{:?} at level {} after {} ms, score {}",
        outcome,
        session.level_index(),
        now,
        session.combined_score()
    );
    match session.snapshot() {
        Ok(snap) => snap.to_json(),
        // no active level once the campaign is won
        Err(SessionError::NoActiveLevel) => {
            Ok(serde_json::json!({
                "won": true,
                "total_score": session.total_score(),
                "level_scores": session.level_scores(),
            }).to_string())
        }
        Err(e) => Err(e),
    }
}

fn play(session: &mut GameSession, cfg: &SessionConfig) -> Result<(Outcome, u64), SessionError> {
    let mut now = 0;
    for _ in 0..cfg.max_ticks {
        now += cfg.tick_ms;

        for idx in 0..session.player_count() {
            session.autopilot(idx, cfg.player_profile);
        }
        for event in session.tick(now) {
            log_event(&event);
        }

        let level = session.level_mut()?;
        if level.is_game_over() {
            return Ok((Outcome::GameOver, now));
        }
        if level.is_completed() {
            session.advance_level(now)?;
            if session.is_won() {
                return Ok((Outcome::Won, now));
            }
        }
    }
    Ok((Outcome::OutOfTicks, now))
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::LevelCompleted { score } => log::info!("level completed, score {score}"),
        GameEvent::PlayerKilled { player, location, cause } => {
            log::info!("player {} killed at {} ({:?})", player + 1, location, cause)
        }
        GameEvent::WaveStarted { wave, fruits } => log::info!("wave {wave}: {fruits} fruits"),
        other => log::debug!("{other:?}"),
    }
}
