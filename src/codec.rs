// Copyright (c) 2025, The Perilmq Authors
// MIT License
// All rights reserved.

//! # Wire Codecs
//!
//! Pluggable serialization strategies for message payloads. [`JsonCodec`] is
//! the human-readable encoding used for interactive traffic (moves, war
//! recognitions, pause state); [`BincodeCodec`] is the compact binary
//! encoding used for log and telemetry traffic. The codec's content type is
//! stamped on every published message.

use crate::errors::AmqpError;
use serde::{de::DeserializeOwned, Serialize};

/// Content type tag for JSON payloads
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type tag for bincode payloads
pub const BINCODE_CONTENT_TYPE: &str = "application/bincode";

/// A serialization strategy converting application values to and from wire
/// payloads.
pub trait Codec {
    /// Content type tag published alongside payloads of this codec.
    fn content_type(&self) -> &'static str;

    /// Encodes a value into a wire payload.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, AmqpError>;

    /// Decodes a wire payload into a value.
    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, AmqpError>;
}

/// Human-readable JSON encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, AmqpError> {
        serde_json::to_vec(value).map_err(|err| AmqpError::EncodePayloadError(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, AmqpError> {
        serde_json::from_slice(payload)
            .map_err(|err| AmqpError::DecodePayloadError(err.to_string()))
    }
}

/// Compact binary encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn content_type(&self) -> &'static str {
        BINCODE_CONTENT_TYPE
    }

    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, AmqpError> {
        bincode::serialize(value).map_err(|err| AmqpError::EncodePayloadError(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T, AmqpError> {
        bincode::deserialize(payload)
            .map_err(|err| AmqpError::DecodePayloadError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{GameLog, PlayingState};
    use chrono::{TimeZone, Utc};

    fn sample_log() -> GameLog {
        GameLog {
            current_time: Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap(),
            username: "alice".to_owned(),
            message: "alice won a war against bob".to_owned(),
        }
    }

    #[test]
    fn json_round_trip() {
        let codec = JsonCodec;
        let state = PlayingState { is_paused: true };
        let payload = codec.encode(&state).unwrap();
        assert_eq!(codec.decode::<PlayingState>(&payload).unwrap(), state);
    }

    #[test]
    fn bincode_round_trip() {
        let codec = BincodeCodec;
        let log = sample_log();
        let payload = codec.encode(&log).unwrap();
        assert_eq!(codec.decode::<GameLog>(&payload).unwrap(), log);
    }

    #[test]
    fn json_payloads_are_human_readable() {
        let payload = JsonCodec.encode(&PlayingState { is_paused: false }).unwrap();
        assert_eq!(payload, br#"{"is_paused":false}"#);
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let err = JsonCodec.decode::<PlayingState>(b"not json").unwrap_err();
        assert!(matches!(err, AmqpError::DecodePayloadError(_)));

        let err = BincodeCodec.decode::<GameLog>(&[0xff]).unwrap_err();
        assert!(matches!(err, AmqpError::DecodePayloadError(_)));
    }

    #[test]
    fn codecs_are_not_interchangeable() {
        let payload = BincodeCodec.encode(&sample_log()).unwrap();
        assert!(JsonCodec.decode::<GameLog>(&payload).is_err());
    }
}
