use serde::{Deserialize, Serialize};

use crate::models::{CellView, Outcome, Pos};

/// A player command as forwarded by the chat dispatcher.
///
/// Coordinates are 0-based here; the dispatcher converts chat input with
/// [`Pos::from_one_based`] before building an `Action`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum Action {
    #[serde(rename = "click")]
    Click { pos: Pos },
    #[serde(rename = "flag")]
    Flag { pos: Pos },
    #[serde(rename = "maybe")]
    Maybe { pos: Pos },
}

/// Serializable full-board view for diagnostics and adapter-side state.
///
/// `cells` is indexed `[y][x]`. Mines stay `Hidden` while the game is in
/// progress; only a detonated cell shows up as `Mine`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub mines: usize,
    pub outcome: Outcome,
    pub cells: Vec<Vec<CellView>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_round_trips_through_json() {
        let action = Action::Click {
            pos: Pos::new(4, 7),
        };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"action":"click","pos":{"x":4,"y":7}}"#);
        assert_eq!(serde_json::from_str::<Action>(&json).unwrap(), action);
    }

    #[test]
    fn flag_and_maybe_use_distinct_tags() {
        let pos = Pos::new(0, 0);
        let flag = serde_json::to_string(&Action::Flag { pos }).unwrap();
        let maybe = serde_json::to_string(&Action::Maybe { pos }).unwrap();
        assert!(flag.contains(r#""action":"flag""#));
        assert!(maybe.contains(r#""action":"maybe""#));
    }
}
