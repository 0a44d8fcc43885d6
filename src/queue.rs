// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Queue Kinds
//!
//! The two queue lifetimes this framework declares. Durable queues survive
//! broker restarts and are shared between consumers (war recognition
//! aggregation, the game-log archive). Transient queues are exclusive to the
//! declaring connection and auto-delete once their last consumer disconnects
//! (per-player pause and move inboxes).

use lapin::options::QueueDeclareOptions;

/// Lifetime of a declared queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// Survives broker restart; never auto-deleted, never exclusive.
    Durable,
    /// Exclusive to the declaring connection, auto-deleted when its last
    /// consumer disconnects.
    Transient,
}

impl QueueKind {
    /// Maps the kind to the broker declaration options.
    pub fn declare_options(self) -> QueueDeclareOptions {
        match self {
            QueueKind::Durable => QueueDeclareOptions {
                passive: false,
                durable: true,
                exclusive: false,
                auto_delete: false,
                nowait: false,
            },
            QueueKind::Transient => QueueDeclareOptions {
                passive: false,
                durable: false,
                exclusive: true,
                auto_delete: true,
                nowait: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durable_queues_are_shared_and_kept() {
        let opts = QueueKind::Durable.declare_options();
        assert!(opts.durable);
        assert!(!opts.exclusive);
        assert!(!opts.auto_delete);
    }

    #[test]
    fn transient_queues_are_exclusive_and_auto_deleted() {
        let opts = QueueKind::Transient.declare_options();
        assert!(!opts.durable);
        assert!(opts.exclusive);
        assert!(opts.auto_delete);
    }
}
