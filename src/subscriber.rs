// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Subscription Engine
//!
//! Opens a bounded-prefetch consumption stream on a declared queue and runs
//! one detached worker per subscription. The worker decodes each delivery,
//! dispatches it to the registered handler, and settles it according to the
//! handler's [`crate::handler::AckDecision`]. Workers run independently of
//! each other and of the publish path; their only suspension point is the
//! delivery stream itself.

use crate::{
    codec::Codec, consumer, errors::AmqpError, handler::ConsumerHandler, queue::QueueKind,
    topology,
};
use futures_util::StreamExt;
use lapin::{
    options::{BasicConsumeOptions, BasicQosOptions},
    protocol::constants::REPLY_SUCCESS,
    types::FieldTable,
    Connection,
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Maximum unacknowledged deliveries outstanding per subscription channel.
/// The broker stops pushing once this many deliveries are unsettled, which
/// bounds in-process buffering when a handler is slow.
pub const PREFETCH_COUNT: u16 = 10;

/// Declares and binds the queue, then starts consuming it.
///
/// Returns as soon as the consumer is registered; deliveries are processed by
/// a detached worker for the lifetime of the channel. Setup failures
/// (channel, declare, bind, QoS, consumer registration) are returned
/// synchronously and leave no registration active. Once running, decode and
/// handler outcomes are local to one delivery and never terminate the
/// worker; only the stream closing (channel closed or connection lost) ends
/// it, at which point the channel is released.
///
/// # Parameters
/// * `conn` - The shared broker connection
/// * `exchange` - Name of a pre-provisioned exchange
/// * `queue_name` - Queue to declare, or empty for a broker-generated name
/// * `routing_key` - Binding key (topic exchanges accept `*`/`#` patterns)
/// * `kind` - Queue lifetime, durable or transient
/// * `codec` - Wire codec used to decode every delivery on this queue
/// * `handler` - Decision function invoked once per decoded delivery
pub async fn subscribe<T, C, H>(
    conn: &Connection,
    exchange: &str,
    queue_name: &str,
    routing_key: &str,
    kind: QueueKind,
    codec: C,
    handler: H,
) -> Result<(), AmqpError>
where
    T: DeserializeOwned + Send + 'static,
    C: Codec + Send + Sync + 'static,
    H: ConsumerHandler<T> + 'static,
{
    let (channel, queue) =
        topology::declare_and_bind(conn, exchange, queue_name, routing_key, kind).await?;
    let queue_name = queue.name().as_str().to_owned();

    if let Err(err) = channel
        .basic_qos(PREFETCH_COUNT, BasicQosOptions::default())
        .await
    {
        error!(error = err.to_string(), "error to configure qos");
        return Err(AmqpError::QosDeclarationError(queue_name));
    }

    let mut stream = match channel
        .basic_consume(
            &queue_name,
            "",
            BasicConsumeOptions {
                no_local: false,
                no_ack: false,
                exclusive: false,
                nowait: false,
            },
            FieldTable::default(),
        )
        .await
    {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(error = err.to_string(), "error to create the consumer");
            Err(AmqpError::ConsumerDeclarationError(queue_name.clone()))
        }
    }?;

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(delivery) => {
                    if let Err(err) = consumer::consume(&delivery, &codec, &handler).await {
                        error!(
                            error = err.to_string(),
                            queue = %queue_name,
                            "error to settle delivery"
                        );
                    }
                }
                Err(err) => {
                    error!(
                        error = err.to_string(),
                        queue = %queue_name,
                        "error receiving delivery"
                    );
                }
            }
        }

        debug!(queue = %queue_name, "delivery stream closed, releasing channel");
        if let Err(err) = channel.close(REPLY_SUCCESS, "subscription closed").await {
            error!(error = err.to_string(), "error to close the channel");
        }
    });

    Ok(())
}
