// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Message Publisher
//!
//! Publishes typed values to an exchange under a routing key. The value is
//! encoded with the chosen codec and tagged with its content type. Publishes
//! are non-mandatory and non-immediate: an unroutable message is dropped by
//! the broker, which is acceptable because subscribers pre-provision their
//! bindings before traffic flows.

use crate::{codec::Codec, errors::AmqpError};
use lapin::{options::BasicPublishOptions, types::ShortString, BasicProperties, Channel};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

/// Publishes typed messages on one broker channel.
///
/// A channel handle has a single logical writer: the broker multiplexes
/// frames per channel, so concurrent publishes on one handle require
/// external serialization. Producers that publish concurrently should each
/// obtain their own channel.
pub struct Publisher {
    channel: Arc<Channel>,
}

impl Publisher {
    pub fn new(channel: Arc<Channel>) -> Arc<Publisher> {
        Arc::new(Publisher { channel })
    }

    /// Encodes `value` with `codec` and publishes it to `exchange` under
    /// `routing_key`.
    ///
    /// Returns an error if encoding fails or the broker rejects the publish.
    /// There is no implicit retry: a publish failing on a closed channel
    /// requires the caller to re-establish the channel first.
    pub async fn publish<C, T>(
        &self,
        exchange: &str,
        routing_key: &str,
        codec: &C,
        value: &T,
    ) -> Result<(), AmqpError>
    where
        C: Codec,
        T: Serialize,
    {
        let payload = codec.encode(value)?;

        match self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions {
                    mandatory: false,
                    immediate: false,
                },
                &payload,
                BasicProperties::default()
                    .with_content_type(ShortString::from(codec.content_type()))
                    .with_message_id(ShortString::from(Uuid::new_v4().to_string())),
            )
            .await
        {
            Err(err) => {
                error!(error = err.to_string(), "error publishing message");
                Err(AmqpError::PublishingError)
            }
            _ => Ok(()),
        }
    }
}
