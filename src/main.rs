//! Sky Hop headless runner
//!
//! Plays a session of autopilot jumpers on a manual clock and prints the
//! final standings as JSON. Usage: `sky-hop [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use sky_hop::consts::MAX_JUMPER_TYPE;
    use sky_hop::host::{Action, Clock, ManualClock, Session};
    use sky_hop::sim::{GameEvent, PlayerId, RoundPhase, autopilot};
    use sky_hop::{Settings, standings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(&PathBuf::from(path)),
        None => Settings::default(),
    };
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!(
        "Sky Hop starting: seed={seed}, bots={}, rounds={}, {} Hz",
        settings.bots,
        settings.rounds,
        settings.tick_rate
    );

    let bot_count = settings.bots.min(settings.rules.max_players);
    if bot_count == 0 {
        log::warn!("No bots configured, nothing to play");
        return;
    }

    let mut session = Session::new(seed, settings.rules.clone());
    let bots: Vec<PlayerId> = (0..bot_count)
        .map(|i| PlayerId::from(format!("bot-{i}")))
        .collect();
    for bot in &bots {
        session.player_joined(bot.clone());
    }

    let mut clock = ManualClock::new(0);
    let interval = settings.tick_interval_ms();
    let mut rounds_done = 0;

    while rounds_done < settings.rounds {
        let state = session.state();
        let actions: Vec<Action> = if state.phase() == RoundPhase::Lobby {
            bots.iter()
                .enumerate()
                .filter(|(_, bot)| state.jumper(bot).is_none())
                .map(|(i, bot)| Action::Join {
                    player: bot.clone(),
                    kind: (i % (usize::from(MAX_JUMPER_TYPE) + 1)) as u8,
                })
                .collect()
        } else {
            state
                .jumpers
                .iter()
                .map(|jumper| Action::Controls {
                    player: jumper.id.clone(),
                    controls: autopilot::steer(state, jumper),
                })
                .collect()
        };
        for action in actions {
            session.submit(action);
        }

        for event in session.step_with(&clock) {
            match event {
                GameEvent::Die { player } => log::info!("{player} is out"),
                GameEvent::Win { winner } => {
                    rounds_done += 1;
                    match winner {
                        Some(player) => log::info!("{player} takes round {rounds_done}"),
                        None => log::info!("Round {rounds_done} had no winner"),
                    }
                }
                _ => {}
            }
        }
        clock.advance(interval);
    }

    log::info!("Session finished after {}s of game time", clock.now_ms() / 1000);
    match serde_json::to_string_pretty(&standings(session.state())) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to encode standings: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds are driven through `host::web`
}
