// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Handler Contract
//!
//! The contract between this framework and the domain logic consuming
//! messages. A handler receives one decoded value and returns an
//! [`AckDecision`], the only vocabulary for deciding a delivery's fate.
//! Handlers needing follow-up publishes (a war handler emitting a
//! recognition message, a log handler archiving an entry) hold their own
//! [`crate::publisher::Publisher`] and publish before returning; a failed
//! side effect is typically mapped to [`AckDecision::RequeueOnFailure`] so
//! the triggering delivery is retried.

use async_trait::async_trait;

/// Disposition of one delivery, produced by the handler and consumed exactly
/// once by the subscription engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckDecision {
    /// Acknowledge the delivery; the message is permanently removed.
    Accept,
    /// Negative-acknowledge with requeue; the broker redelivers the message.
    RequeueOnFailure,
    /// Negative-acknowledge without requeue; the broker routes the message
    /// to the dead-letter exchange.
    DiscardPermanently,
}

/// A typed message handler.
///
/// Implementations must not block indefinitely: a handler runs synchronously
/// inside its subscription's worker, and its latency consumes that
/// subscription's prefetch budget.
#[async_trait]
pub trait ConsumerHandler<T>: Send + Sync {
    async fn handle(&self, message: T) -> AckDecision;
}

/// Adapter turning a plain decision function into a [`ConsumerHandler`].
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<T, F> ConsumerHandler<T> for FnHandler<F>
where
    T: Send + 'static,
    F: Fn(T) -> AckDecision + Send + Sync,
{
    async fn handle(&self, message: T) -> AckDecision {
        (self.0)(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PlayingState;

    #[tokio::test]
    async fn decision_functions_are_handlers() {
        let handler = FnHandler(|state: PlayingState| {
            if state.is_paused {
                AckDecision::Accept
            } else {
                AckDecision::DiscardPermanently
            }
        });

        let accepted = handler.handle(PlayingState { is_paused: true }).await;
        assert_eq!(accepted, AckDecision::Accept);

        let discarded = handler.handle(PlayingState { is_paused: false }).await;
        assert_eq!(discarded, AckDecision::DiscardPermanently);
    }
}
