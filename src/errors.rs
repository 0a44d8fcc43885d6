// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Error Types
//!
//! This module provides the error types for broker operations. The `AmqpError`
//! enum represents all failure scenarios across connection, channel, queue,
//! subscription, and message handling operations.

use thiserror::Error;

/// Represents errors that can occur during AMQP/RabbitMQ operations.
///
/// Each variant identifies which operation failed, so a caller of a multi-step
/// operation (such as declare-and-bind) can tell the failing step apart from
/// the error alone.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// Error establishing a connection to the broker
    #[error("failure to connect")]
    ConnectionError,

    /// Error creating a channel from an established connection
    #[error("failure to create a channel")]
    ChannelError,

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`")]
    DeclareQueueError(String),

    /// Error binding a queue to an exchange
    #[error("failure to bind queue `{0}` to exchange `{1}`")]
    BindQueueError(String, String),

    /// Error configuring the channel prefetch limit
    #[error("failure to configure qos on queue `{0}`")]
    QosDeclarationError(String),

    /// Error registering a consumer on a queue
    #[error("failure to declare consumer for queue `{0}`")]
    ConsumerDeclarationError(String),

    /// Error encoding a value into a wire payload
    #[error("failure to encode payload: {0}")]
    EncodePayloadError(String),

    /// Error decoding a wire payload into a value
    #[error("failure to decode payload: {0}")]
    DecodePayloadError(String),

    /// Error publishing a message
    #[error("failure to publish")]
    PublishingError,

    /// Error acknowledging a delivery
    #[error("failure to ack delivery")]
    AckDeliveryError,

    /// Error negative-acknowledging a delivery
    #[error("failure to nack delivery")]
    NackDeliveryError,
}
