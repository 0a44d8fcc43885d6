// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Connection and Channel Bootstrap
//!
//! This module establishes the shared broker connection and opens the initial
//! channel used for publishing. The connection is shared process-wide; every
//! subscription obtains its own channel from it via the topology module, and
//! channels are the unit of isolation (a channel handle must have a single
//! logical writer). On shutdown, close channels before the connection so the
//! broker can return unacknowledged deliveries to their queues.

use crate::{config::AmqpConfig, errors::AmqpError};
use lapin::{types::LongString, Channel, Connection, ConnectionProperties};
use std::sync::Arc;
use tracing::{debug, error};

/// Dials the broker and opens a publish channel.
///
/// A single dial attempt is made; connection failures are not retried here.
/// Both the connection and channel are wrapped in `Arc` for sharing: the
/// connection is handed to each subscription so it can open its own channel,
/// the returned channel belongs to the publishing path.
///
/// # Parameters
/// * `cfg` - Broker endpoint configuration
///
/// # Returns
/// The connection and the publish channel on success, or an error naming the
/// step that failed.
pub async fn new_amqp_channel(
    cfg: &AmqpConfig,
) -> Result<(Arc<Connection>, Arc<Channel>), AmqpError> {
    debug!("creating amqp connection...");
    let options = ConnectionProperties::default()
        .with_connection_name(LongString::from(cfg.connection_name.clone()));

    let conn = match Connection::connect(&cfg.uri(), options).await {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(error = err.to_string(), "failure to connect");
            Err(AmqpError::ConnectionError)
        }
    }?;
    debug!("amqp connected");

    debug!("creating amqp channel...");
    match conn.create_channel().await {
        Ok(c) => {
            debug!("channel created");
            Ok((Arc::new(conn), Arc::new(c)))
        }
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            Err(AmqpError::ChannelError)
        }
    }
}
