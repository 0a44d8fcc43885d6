// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Topology Management
//!
//! Declares queues and binds them to their exchange. Every queue declared
//! here carries the same dead-letter-exchange argument, so a discarded
//! message is always rerouted to [`crate::routing::EXCHANGE_PERIL_DLX`]
//! instead of being dropped by the broker.

use crate::{errors::AmqpError, queue::QueueKind, routing::EXCHANGE_PERIL_DLX};
use lapin::{
    options::QueueBindOptions,
    types::{AMQPValue, FieldTable, LongString, ShortString},
    Channel, Connection, Queue,
};
use std::collections::BTreeMap;
use tracing::{debug, error};

/// Header field naming the dead-letter exchange of a queue
pub const AMQP_HEADERS_DEAD_LETTER_EXCHANGE: &str = "x-dead-letter-exchange";

/// Opens a channel, declares `queue_name`, and binds it to `exchange` under
/// `routing_key`.
///
/// Declaration is idempotent: redeclaring an identical queue is a no-op,
/// while redeclaring with conflicting durability or exclusivity fails with a
/// broker precondition error surfaced as [`AmqpError::DeclareQueueError`].
/// Anonymous queues are supported by passing an empty `queue_name`; the
/// realized name is read from the returned [`Queue`].
///
/// The caller owns the returned channel and must release it on shutdown. If
/// any step fails the channel is dropped and must not be reused.
///
/// # Parameters
/// * `conn` - The shared broker connection
/// * `exchange` - Name of a pre-provisioned exchange
/// * `queue_name` - Queue to declare, or empty for a broker-generated name
/// * `routing_key` - Binding key (topic exchanges accept `*`/`#` patterns)
/// * `kind` - Queue lifetime, [`QueueKind::Durable`] or [`QueueKind::Transient`]
///
/// # Returns
/// The dedicated channel and the realized queue, or an error naming the
/// failing step.
pub async fn declare_and_bind(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    kind: QueueKind,
) -> Result<(Channel, Queue), AmqpError> {
    let channel = match conn.create_channel().await {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            Err(AmqpError::ChannelError)
        }
    }?;

    let mut queue_args = BTreeMap::new();
    queue_args.insert(
        ShortString::from(AMQP_HEADERS_DEAD_LETTER_EXCHANGE),
        AMQPValue::LongString(LongString::from(EXCHANGE_PERIL_DLX)),
    );

    let queue = match channel
        .queue_declare(
            queue_name,
            kind.declare_options(),
            FieldTable::from(queue_args),
        )
        .await
    {
        Ok(q) => Ok(q),
        Err(err) => {
            error!(
                error = err.to_string(),
                queue = queue_name,
                "error to declare the queue"
            );
            Err(AmqpError::DeclareQueueError(queue_name.to_owned()))
        }
    }?;

    match channel
        .queue_bind(
            queue.name().as_str(),
            exchange,
            routing_key,
            QueueBindOptions::default(),
            FieldTable::default(),
        )
        .await
    {
        Ok(_) => {
            debug!(
                queue = queue.name().as_str(),
                exchange = exchange,
                routing_key = routing_key,
                "queue declared and bound"
            );
            Ok((channel, queue))
        }
        Err(err) => {
            error!(error = err.to_string(), "error to bind queue to exchange");
            Err(AmqpError::BindQueueError(
                queue.name().as_str().to_owned(),
                exchange.to_owned(),
            ))
        }
    }
}
