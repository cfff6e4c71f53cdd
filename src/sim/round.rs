//! Fixed-rate round driver
//!
//! `tick` is the only per-tick entry point. It is pure given the state, the
//! clock reading and the connected player list, so replicas fed the same
//! inputs stay in lockstep.

use super::events::GameEvent;
use super::generate::start_game;
use super::physics;
use super::state::{GameState, PlayerId};

/// Host inputs for a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickInput<'a> {
    /// Monotonic session clock in milliseconds
    pub now_ms: u64,
    /// Every player currently connected, joined or not
    pub connected: &'a [PlayerId],
}

/// Whether the current round has ended: everyone dead or out of time
pub fn game_over(state: &GameState, now_ms: u64) -> bool {
    let Some(start_at) = state.start_at else {
        return false;
    };
    state.jumpers.iter().all(|j| j.dead)
        || now_ms.saturating_sub(start_at) >= state.rules.round_time_ms
}

/// Advance the game state by one tick and return this tick's events
pub fn tick<'s>(state: &'s mut GameState, input: &TickInput<'_>) -> &'s [GameEvent] {
    let mut events = Vec::new();
    let now = input.now_ms;

    if state.game_restart_time.is_some_and(|restart| now > restart) {
        start_game(state);
        state.events = events;
        return &state.events;
    }

    if !state.jumping {
        match state.start_at {
            None => {
                if !state.jumpers.is_empty() && state.jumpers.len() == input.connected.len() {
                    state.start_at = Some(now + state.rules.countdown_ms);
                    log::info!(
                        "Round {}: {} players ready, starting in {}ms",
                        state.round,
                        state.jumpers.len(),
                        state.rules.countdown_ms
                    );
                    events.push(GameEvent::RoundStart);
                }
            }
            Some(start_at) if now > start_at => {
                state.jumping = true;
                log::info!("Round {}: go!", state.round);
                events.extend(
                    input
                        .connected
                        .iter()
                        .map(|player| GameEvent::Bounce { player: player.clone() }),
                );
            }
            Some(_) => {}
        }
    }

    if state.jumping {
        if state.game_restart_time.is_none() && game_over(state, now) {
            finish_round(state, now, &mut events);
        }
        physics::step(state, now, &mut events);
    }

    state.events = events;
    &state.events
}

/// Credit the round winner and schedule the next round
fn finish_round(state: &mut GameState, now_ms: u64, events: &mut Vec<GameEvent>) {
    state.game_restart_time = Some(now_ms + state.rules.restart_delay_ms);

    let winner = state.leader().map(|j| j.id.clone());
    if let Some(id) = &winner {
        *state.scores.entry(id.clone()).or_insert(0) += 1;
        log::info!(
            "Round {}: {} wins ({} total)",
            state.round,
            id,
            state.scores.get(id).copied().unwrap_or_default()
        );
    } else {
        log::info!("Round {}: over with no players left", state.round);
    }
    events.push(GameEvent::Win { winner });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Rules;
    use crate::sim::actions::{disconnect, join};
    use crate::sim::state::RoundPhase;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn run(state: &mut GameState, now_ms: u64, connected: &[PlayerId]) -> Vec<GameEvent> {
        tick(state, &TickInput { now_ms, connected }).to_vec()
    }

    /// Session with every player joined and the round running at `t = 3001`
    fn active_round(names: &[&str]) -> (GameState, Vec<PlayerId>) {
        let mut state = GameState::new(77);
        let connected = ids(names);
        for id in &connected {
            join(&mut state, id.clone(), 0, connected.len()).expect("join");
        }
        run(&mut state, 0, &connected);
        run(&mut state, 3001, &connected);
        assert_eq!(state.phase(), RoundPhase::Active);
        (state, connected)
    }

    #[test]
    fn test_lobby_waits_for_everyone() {
        let mut state = GameState::new(1);
        let connected = ids(&["a", "b"]);
        join(&mut state, "a".into(), 0, 2).expect("join");

        assert!(run(&mut state, 0, &connected).is_empty());
        assert_eq!(state.phase(), RoundPhase::Lobby);

        join(&mut state, "b".into(), 1, 2).expect("join");
        assert_eq!(run(&mut state, 100, &connected), vec![GameEvent::RoundStart]);
        assert_eq!(state.start_at, Some(3100));
        assert_eq!(state.phase(), RoundPhase::Countdown);
    }

    #[test]
    fn test_empty_lobby_never_arms() {
        let mut state = GameState::new(1);
        assert!(run(&mut state, 0, &[]).is_empty());
        assert_eq!(state.phase(), RoundPhase::Lobby);
    }

    #[test]
    fn test_countdown_releases_everyone_connected() {
        let mut state = GameState::new(1);
        let connected = ids(&["a"]);
        join(&mut state, "a".into(), 0, 1).expect("join");
        run(&mut state, 0, &connected);

        assert!(run(&mut state, 3000, &connected).is_empty());
        assert!(!state.jumping);

        // A newcomer connected during the countdown still gets the cue
        let connected = ids(&["a", "late"]);
        let events = run(&mut state, 3001, &connected);
        assert!(state.jumping);
        assert!(events.contains(&GameEvent::Bounce { player: "a".into() }));
        assert!(events.contains(&GameEvent::Bounce { player: "late".into() }));
    }

    #[test]
    fn test_all_dead_ends_round_next_tick() {
        let (mut state, connected) = active_round(&["a", "b"]);
        state.jumpers[0].highest = 1.5;
        state.jumpers[1].highest = 2.5;
        for j in &mut state.jumpers {
            j.dead = true;
        }

        let events = run(&mut state, 3034, &connected);
        let wins: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Win { .. }))
            .collect();
        assert_eq!(wins, vec![&GameEvent::Win { winner: Some("b".into()) }]);
        assert_eq!(state.scores.get(&"b".into()), Some(&1));
        assert_eq!(state.scores.get(&"a".into()), None);
        assert_eq!(state.game_restart_time, Some(3034 + 3000));

        // Only one win per round
        let events = run(&mut state, 3067, &connected);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Win { .. })));
        assert_eq!(state.scores.get(&"b".into()), Some(&1));
    }

    #[test]
    fn test_tie_goes_to_first_joined() {
        let (mut state, connected) = active_round(&["a", "b"]);
        for j in &mut state.jumpers {
            j.highest = 3.0;
            j.dead = true;
        }
        run(&mut state, 3034, &connected);
        assert_eq!(state.scores.get(&"a".into()), Some(&1));
    }

    #[test]
    fn test_round_times_out() {
        let (mut state, connected) = active_round(&["a"]);
        let start_at = state.start_at.unwrap_or_default();
        let end = start_at + state.rules.round_time_ms;

        assert!(!game_over(&state, end - 1));
        assert!(game_over(&state, end));

        let events = run(&mut state, end, &connected);
        assert!(events.contains(&GameEvent::Win { winner: Some("a".into()) }));
        assert_eq!(state.phase(), RoundPhase::RoundOver);
    }

    #[test]
    fn test_restart_generates_fresh_round() {
        let (mut state, connected) = active_round(&["a"]);
        state.jumpers[0].dead = true;
        run(&mut state, 4000, &connected);
        let restart = state.game_restart_time.unwrap_or_default();

        run(&mut state, restart, &connected);
        assert_eq!(state.phase(), RoundPhase::RoundOver);

        let events = run(&mut state, restart + 1, &connected);
        assert!(events.is_empty());
        assert_eq!(state.phase(), RoundPhase::Lobby);
        assert_eq!(state.round, 2);
        assert!(state.jumpers.is_empty());
        assert_eq!(state.scores.get(&"a".into()), Some(&1));
    }

    #[test]
    fn test_disconnect_mid_round_recomputes_game_over() {
        let (mut state, connected) = active_round(&["a", "b"]);
        state.jumpers[1].dead = true;
        disconnect(&mut state, &"a".into());

        let connected: Vec<_> = connected.into_iter().filter(|p| p.as_str() != "a").collect();
        let events = run(&mut state, 3034, &connected);
        assert!(events.contains(&GameEvent::Win { winner: Some("b".into()) }));
    }

    #[test]
    fn test_everyone_leaving_ends_round_without_winner() {
        let (mut state, _) = active_round(&["a"]);
        disconnect(&mut state, &"a".into());
        let events = run(&mut state, 3034, &[]);
        assert_eq!(events, vec![GameEvent::Win { winner: None }]);
        assert!(state.scores.is_empty());
    }

    #[test]
    fn test_events_replaced_each_tick() {
        let (mut state, connected) = active_round(&["a"]);
        assert!(!state.events.is_empty());
        state.jumpers[0].vy = 0.02;
        run(&mut state, 3034, &connected);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_dead_stays_dead_until_restart() {
        let (mut state, connected) = active_round(&["a", "b"]);
        state.jumpers[0].dead = true;
        for t in 0..120u64 {
            run(&mut state, 3034 + t * 33, &connected);
            assert!(state.jumpers[0].dead);
        }
    }

    #[test]
    fn test_spawned_jumpers_start_on_row_zero() {
        let (state, _) = active_round(&["a", "b", "c", "d"]);
        for j in &state.jumpers {
            assert!(!j.dead);
            assert!(j.y >= 0.0 && j.y <= ROW_HEIGHT + DEFAULT_JUMP_POWER);
        }
    }

    #[test]
    fn test_custom_round_time() {
        let rules = Rules {
            round_time_ms: 10_000,
            ..Rules::default()
        };
        let mut state = GameState::with_rules(3, rules);
        state.start_at = Some(0);
        state.jumpers.push(crate::sim::state::Jumper::spawn("a".into(), 0, 0.5));
        assert!(!game_over(&state, 9_999));
        assert!(game_over(&state, 10_000));
    }

    /// Play `controls` (one entry per tick, per player) through a fresh session
    fn replay(seed: u64, controls: &[(bool, bool)]) -> Vec<String> {
        let mut state = GameState::new(seed);
        let connected = ids(&["a", "b"]);
        for id in &connected {
            join(&mut state, id.clone(), 0, connected.len()).expect("join");
        }
        let mut frames = Vec::new();
        for (t, &(left, right)) in controls.iter().enumerate() {
            let held = crate::sim::Controls { left, right };
            let _ = crate::sim::controls(&mut state, &connected[t % 2], held);
            run(&mut state, 2900 + t as u64 * 33, &connected);
            frames.push(serde_json::to_string(&state).expect("serialize state"));
        }
        frames
    }

    #[test]
    fn test_identical_inputs_give_identical_states() {
        let controls: Vec<(bool, bool)> = (0..400).map(|t| (t % 7 == 0, t % 3 == 0)).collect();
        assert_eq!(replay(555, &controls), replay(555, &controls));
    }

    proptest::proptest! {
        #[test]
        fn prop_heights_monotonic_and_death_terminal(
            seed in proptest::prelude::any::<u64>(),
            controls in proptest::collection::vec((proptest::bool::ANY, proptest::bool::ANY), 1..300),
        ) {
            let mut state = GameState::new(seed);
            let connected = ids(&["a", "b"]);
            for id in &connected {
                join(&mut state, id.clone(), 0, connected.len()).expect("join");
            }
            run(&mut state, 0, &connected);

            let mut prev: Vec<(f32, bool)> = state.jumpers.iter().map(|j| (j.highest, j.dead)).collect();
            let mut prev_best = state.best.clone();
            for (t, &(left, right)) in controls.iter().enumerate() {
                let held = crate::sim::Controls { left, right };
                let _ = crate::sim::controls(&mut state, &connected[t % 2], held);
                run(&mut state, 3001 + t as u64 * 33, &connected);

                for (j, (highest, dead)) in state.jumpers.iter().zip(&prev) {
                    proptest::prop_assert!(j.highest >= *highest);
                    proptest::prop_assert!(j.dead || !*dead);
                }
                for (id, best) in &prev_best {
                    proptest::prop_assert!(state.best.get(id).copied().unwrap_or(f32::MIN) >= *best);
                }
                prev = state.jumpers.iter().map(|j| (j.highest, j.dead)).collect();
                prev_best = state.best.clone();
            }
        }
    }
}
