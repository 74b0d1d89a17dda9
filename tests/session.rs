//! Campaign sessions: determinism, progression and snapshots.

use icebreak::config::{GameConfig, Timing};
use icebreak::domain::ai::PlayerProfile;
use icebreak::error::{BuildError, SessionError};
use icebreak::sim::campaign::{self, LEVEL_COUNT};
use icebreak::sim::{GameSession, SessionSnapshot};

#[test]
fn campaign_levels_are_reproducible_per_seed() {
    for level in 1..=LEVEL_COUNT {
        let a = campaign::configure(level, 2, 1234).unwrap();
        let b = campaign::configure(level, 2, 1234).unwrap();
        assert_eq!(a.ice_cells(), b.ice_cells());
        assert_eq!(a.fruits(), b.fruits());
        assert_eq!(a.enemies(), b.enemies());
        assert_eq!(a.hot_tiles(), b.hot_tiles());
    }
    assert_eq!(
        campaign::configure(LEVEL_COUNT + 1, 1, 0).err(),
        Some(BuildError::UnknownLevel { level: LEVEL_COUNT + 1, max: LEVEL_COUNT })
    );
}

#[test]
fn identical_sessions_play_identically() {
    let run = || {
        let mut s = GameSession::new(1, 21, 0).unwrap();
        let mut now = 0;
        for _ in 0..200 {
            now += 150;
            s.autopilot(0, PlayerProfile::Expert);
            s.tick(now);
            if s.level().map_or(true, |l| l.is_terminal()) {
                break;
            }
        }
        s.snapshot().unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn snapshot_survives_json_and_restores_into_a_fresh_session() {
    let mut s = GameSession::with_timing(2, 8, Timing::default(), 2, 0).unwrap();
    let mut now = 0;
    for _ in 0..20 {
        now += 150;
        s.autopilot(0, PlayerProfile::Hungry);
        s.autopilot(1, PlayerProfile::Fearful);
        s.tick(now);
    }
    let snap = s.snapshot().unwrap();
    let text = snap.to_json().unwrap();

    let mut fresh = GameSession::new(1, 0, 0).unwrap();
    fresh.restore(&SessionSnapshot::from_json(&text).unwrap(), 100_000).unwrap();

    assert_eq!(fresh.level_index(), 2);
    assert_eq!(fresh.player_count(), 2);
    assert_eq!(fresh.combined_score(), s.combined_score());

    let back = fresh.snapshot().unwrap();
    assert_eq!(back.remaining_ms, snap.remaining_ms);
    assert_eq!(back, snap);
}

#[test]
fn session_reports_missing_level_after_winning() {
    let mut s = GameSession::with_timing(1, 3, Timing::default(), LEVEL_COUNT, 0).unwrap();
    assert_eq!(s.level_count(), LEVEL_COUNT);
    assert!(!s.advance_level(0).unwrap());
    assert!(!s.is_won());

    s.reset_game(10).unwrap();
    assert_eq!(s.level_index(), LEVEL_COUNT);
    assert_eq!(s.total_score(), 0);
}

#[test]
fn config_driven_session_uses_config_values() {
    let config = GameConfig::from_toml_str(
        "[timing]\ntime_limit_secs = 45\n[session]\nplayers = 2\nstart_level = 3\nseed = 5\nenemy_profile = \"chase\"\n",
    )
    .unwrap();
    let s = GameSession::from_config(&config, 0).unwrap();
    assert_eq!(s.level_index(), 3);
    assert_eq!(s.player_count(), 2);
    assert_eq!(s.level().unwrap().remaining_seconds(), 45);

    let bad = GameConfig::from_toml_str("[session]\nstart_level = 9\n").unwrap();
    assert!(matches!(
        GameSession::from_config(&bad, 0),
        Err(SessionError::Build(BuildError::UnknownLevel { level: 9, .. }))
    ));
}
