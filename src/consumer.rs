// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Delivery Processing
//!
//! The per-delivery step of a subscription: decode the payload, dispatch to
//! the handler, and settle the delivery exactly once. A payload that fails to
//! decode is discarded (negative-acknowledged without requeue) so it reaches
//! the dead-letter exchange instead of sitting unacknowledged against the
//! prefetch limit.

use crate::{
    codec::Codec,
    errors::AmqpError,
    handler::{AckDecision, ConsumerHandler},
};
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicNackOptions},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

/// Broker-level settlement of one delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    Ack,
    Nack { requeue: bool },
}

/// Maps a handler decision to its broker settlement.
pub(crate) fn disposition(decision: AckDecision) -> Disposition {
    match decision {
        AckDecision::Accept => Disposition::Ack,
        AckDecision::RequeueOnFailure => Disposition::Nack { requeue: true },
        AckDecision::DiscardPermanently => Disposition::Nack { requeue: false },
    }
}

/// Decodes a payload and dispatches it, resolving to the delivery's
/// settlement. Broker-free so the decode and dispatch rules stay testable.
pub(crate) async fn resolve<T, C, H>(codec: &C, payload: &[u8], handler: &H) -> Disposition
where
    T: DeserializeOwned + Send + 'static,
    C: Codec,
    H: ConsumerHandler<T>,
{
    match codec.decode::<T>(payload) {
        Ok(value) => {
            let decision = handler.handle(value).await;
            debug!(decision = ?decision, "delivery handled");
            disposition(decision)
        }
        Err(err) => {
            warn!(
                error = err.to_string(),
                "failed to decode delivery, discarding"
            );
            Disposition::Nack { requeue: false }
        }
    }
}

/// Processes one delivery end to end and settles it with the broker.
pub(crate) async fn consume<T, C, H>(
    delivery: &Delivery,
    codec: &C,
    handler: &H,
) -> Result<(), AmqpError>
where
    T: DeserializeOwned + Send + 'static,
    C: Codec,
    H: ConsumerHandler<T>,
{
    match resolve(codec, &delivery.data, handler).await {
        Disposition::Ack => {
            if let Err(err) = delivery.ack(BasicAckOptions { multiple: false }).await {
                error!(error = err.to_string(), "error to ack delivery");
                return Err(AmqpError::AckDeliveryError);
            }
            Ok(())
        }
        Disposition::Nack { requeue } => {
            if let Err(err) = delivery
                .nack(BasicNackOptions {
                    multiple: false,
                    requeue,
                })
                .await
            {
                error!(error = err.to_string(), "error to nack delivery");
                return Err(AmqpError::NackDeliveryError);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::handler::FnHandler;
    use crate::routing::PlayingState;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::eq;

    mock! {
        Handler {}

        #[async_trait]
        impl ConsumerHandler<PlayingState> for Handler {
            async fn handle(&self, message: PlayingState) -> AckDecision;
        }
    }

    #[test]
    fn decisions_map_to_exactly_one_settlement() {
        assert_eq!(disposition(AckDecision::Accept), Disposition::Ack);
        assert_eq!(
            disposition(AckDecision::RequeueOnFailure),
            Disposition::Nack { requeue: true }
        );
        assert_eq!(
            disposition(AckDecision::DiscardPermanently),
            Disposition::Nack { requeue: false }
        );
    }

    #[tokio::test]
    async fn decoded_delivery_reaches_the_handler_once() {
        let mut handler = MockHandler::new();
        handler
            .expect_handle()
            .with(eq(PlayingState { is_paused: true }))
            .times(1)
            .returning(|_| AckDecision::Accept);

        let payload = JsonCodec.encode(&PlayingState { is_paused: true }).unwrap();
        let settled = resolve(&JsonCodec, &payload, &handler).await;
        assert_eq!(settled, Disposition::Ack);
    }

    #[tokio::test]
    async fn handler_decision_drives_the_settlement() {
        let requeue = FnHandler(|_: PlayingState| AckDecision::RequeueOnFailure);
        let payload = JsonCodec.encode(&PlayingState { is_paused: false }).unwrap();
        assert_eq!(
            resolve(&JsonCodec, &payload, &requeue).await,
            Disposition::Nack { requeue: true }
        );

        let discard = FnHandler(|_: PlayingState| AckDecision::DiscardPermanently);
        assert_eq!(
            resolve(&JsonCodec, &payload, &discard).await,
            Disposition::Nack { requeue: false }
        );
    }

    #[tokio::test]
    async fn undecodable_delivery_is_discarded_without_dispatch() {
        let mut handler = MockHandler::new();
        handler.expect_handle().times(0);

        let settled = resolve(&JsonCodec, b"not json", &handler).await;
        assert_eq!(settled, Disposition::Nack { requeue: false });
    }
}
