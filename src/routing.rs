// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Routing Conventions
//!
//! Well-known exchange names, routing-key conventions, and the message types
//! shared between game peers. The exchanges are provisioned on the broker
//! ahead of time; this framework only references them by name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic exchange carrying most game traffic (moves, war, logs)
pub const EXCHANGE_PERIL_TOPIC: &str = "peril_topic";
/// Direct exchange carrying the pause/resume broadcast
pub const EXCHANGE_PERIL_DIRECT: &str = "peril_direct";
/// Dead-letter exchange receiving every discarded message
pub const EXCHANGE_PERIL_DLX: &str = "peril_dlx";

/// Routing-key prefix for army-move orders
pub const ARMY_MOVES_PREFIX: &str = "army_moves";
/// Routing-key prefix for war recognitions
pub const WAR_RECOGNITIONS_PREFIX: &str = "war";
/// Routing key for the pause/resume broadcast
pub const PAUSE_KEY: &str = "pause";
/// Routing-key prefix for game-log entries
pub const GAME_LOG_SLUG: &str = "game_logs";

/// Builds the `<prefix>.<username>` key used for per-player traffic.
pub fn per_user_key(prefix: &str, username: &str) -> String {
    format!("{}.{}", prefix, username)
}

/// Builds the `<prefix>.*` binding key matching any single-segment suffix.
pub fn any_user_key(prefix: &str) -> String {
    format!("{}.*", prefix)
}

/// Reports whether a topic binding `pattern` matches `key`.
///
/// Standard topic-exchange semantics: keys are dot-segmented, `*` matches
/// exactly one segment, `#` matches zero or more segments. This mirrors the
/// matching the broker performs, so binding conventions can be checked
/// without a broker round-trip.
pub fn binds(pattern: &str, key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = key.split('.').collect();
    segments_match(&pattern, &key)
}

fn segments_match(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.first() {
        None => key.is_empty(),
        Some(&"#") => {
            if segments_match(&pattern[1..], key) {
                return true;
            }
            !key.is_empty() && segments_match(pattern, &key[1..])
        }
        Some(&"*") => !key.is_empty() && segments_match(&pattern[1..], &key[1..]),
        Some(segment) => {
            key.first() == Some(segment) && segments_match(&pattern[1..], &key[1..])
        }
    }
}

/// Pause/resume broadcast published on the direct exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayingState {
    pub is_paused: bool,
}

/// One game-log entry, archived by the server under `game_logs.<username>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    pub current_time: DateTime<Utc>,
    pub username: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_user_keys() {
        assert_eq!(per_user_key(ARMY_MOVES_PREFIX, "alice"), "army_moves.alice");
        assert_eq!(any_user_key(WAR_RECOGNITIONS_PREFIX), "war.*");
    }

    #[test]
    fn star_matches_exactly_one_segment() {
        assert!(binds("army_moves.*", "army_moves.alice"));
        assert!(binds("army_moves.*", "army_moves.bob"));
        assert!(!binds("army_moves.*", "army_moves.alice.extra"));
        assert!(!binds("army_moves.*", "army_moves"));
        assert!(!binds("army_moves.*", "war.alice"));
    }

    #[test]
    fn hash_matches_zero_or_more_segments() {
        assert!(binds("game_logs.#", "game_logs"));
        assert!(binds("game_logs.#", "game_logs.alice"));
        assert!(binds("game_logs.#", "game_logs.alice.session.1"));
        assert!(!binds("game_logs.#", "army_moves.alice"));
    }

    #[test]
    fn literal_patterns_need_exact_match() {
        assert!(binds("pause", "pause"));
        assert!(!binds("pause", "pause.alice"));
        assert!(!binds("pause.alice", "pause"));
    }
}
