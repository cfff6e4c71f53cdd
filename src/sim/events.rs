//! Per-tick event log
//!
//! Presentation layers read these as "what happened this tick" cues for
//! sounds and effects. They are never an authoritative history.

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Countdown armed
    RoundStart,
    /// Normal landing, or the everyone-jumps cue when a round goes live
    Bounce { player: PlayerId },
    /// Landing on a spring platform
    Spring { player: PlayerId },
    Die { player: PlayerId },
    /// Round decided (`None` when nobody was left to credit)
    Win { winner: Option<PlayerId> },
}

impl GameEvent {
    /// Player this event is about, if any
    pub fn player(&self) -> Option<&PlayerId> {
        match self {
            GameEvent::Bounce { player } | GameEvent::Spring { player } | GameEvent::Die { player } => {
                Some(player)
            }
            GameEvent::Win { winner } => winner.as_ref(),
            GameEvent::RoundStart => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_per_variant() {
        let a = PlayerId::from("a");
        assert_eq!(GameEvent::Bounce { player: a.clone() }.player(), Some(&a));
        assert_eq!(GameEvent::Spring { player: a.clone() }.player(), Some(&a));
        assert_eq!(GameEvent::Die { player: a.clone() }.player(), Some(&a));
        assert_eq!(GameEvent::Win { winner: Some(a.clone()) }.player(), Some(&a));
        assert_eq!(GameEvent::Win { winner: None }.player(), None);
        assert_eq!(GameEvent::RoundStart.player(), None);
    }

    #[test]
    fn test_tagged_wire_form() {
        let json = serde_json::to_string(&GameEvent::Die { player: "a".into() }).expect("encode");
        assert_eq!(json, r#"{"type":"die","player":"a"}"#);
    }
}
