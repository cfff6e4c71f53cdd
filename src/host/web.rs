//! Browser host bindings
//!
//! The JavaScript host owns the clock and the transport; it forwards player
//! notifications and actions here and reads back JSON snapshots.

use wasm_bindgen::prelude::*;

use super::{Action, Session};
use crate::settings::Rules;
use crate::sim::{Controls, PlayerId};
use crate::snapshot;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Ignore double init when several sessions share a page
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebSession {
    inner: Session,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: Session::new(seed, Rules::default()),
        }
    }

    /// Resume from a snapshot produced by [`WebSession::snapshot`]
    pub fn restore(json: &str, connected: Vec<String>) -> Result<WebSession, JsError> {
        let state = snapshot::decode(json)?;
        let connected = connected.into_iter().map(PlayerId::from).collect();
        Ok(Self {
            inner: Session::from_state(state, connected),
        })
    }

    #[wasm_bindgen(js_name = playerJoined)]
    pub fn player_joined(&mut self, player: String) {
        self.inner.player_joined(player.into());
    }

    #[wasm_bindgen(js_name = playerLeft)]
    pub fn player_left(&mut self, player: String) {
        self.inner.player_left(&player.into());
    }

    pub fn join(&mut self, player: String, kind: u8) {
        self.inner.submit(Action::Join {
            player: player.into(),
            kind,
        });
    }

    pub fn controls(&mut self, player: String, left: bool, right: bool) {
        self.inner.submit(Action::Controls {
            player: player.into(),
            controls: Controls { left, right },
        });
    }

    /// Advance one tick and return the resulting snapshot
    pub fn step(&mut self, now_ms: f64) -> Result<String, JsError> {
        self.inner.step(now_ms.max(0.0) as u64);
        self.snapshot()
    }

    pub fn snapshot(&self) -> Result<String, JsError> {
        Ok(snapshot::encode(self.inner.state())?)
    }

    #[wasm_bindgen(js_name = gameOver)]
    pub fn game_over(&self, now_ms: f64) -> bool {
        crate::sim::game_over(self.inner.state(), now_ms.max(0.0) as u64)
    }
}
