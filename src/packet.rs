//! Packet Types
//!
//! Data structures only - the packet record the host hands in per unit
//! of traffic, plus the signature header triple attached to self-signed
//! offensive traffic. The wire encoding of the headers (HTTP headers,
//! protocol extension fields) is the host's concern; serializing
//! `SignatureHeaders` yields exactly the X-GLADIATOR-* header map the
//! offensive subsystem attaches to its packets.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Traffic direction, advisory metadata recorded by the capture layer.
///
/// The filter never looks at it - classification is purely
/// cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Signature headers attached to self-generated offensive traffic.
///
/// `timestamp` is the signer-local emission time in unix seconds and is
/// advisory only: nothing validates it, so a captured self-signed packet
/// replayed later still filters out as self-traffic. Replay rejection is
/// deliberately not part of this scheme and no tolerance window is
/// defined for one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureHeaders {
    /// Hex HMAC-SHA256 digest over payload || node id
    #[serde(rename = "X-GLADIATOR-SIG")]
    pub signature: String,

    /// The signer's node UUID
    #[serde(rename = "X-GLADIATOR-UUID")]
    pub node_id: Uuid,

    /// Signer-local emission time (unix seconds, advisory)
    #[serde(rename = "X-GLADIATOR-TS")]
    pub timestamp: i64,
}

/// One unit of traffic: raw payload plus optional signature headers.
///
/// Ephemeral - created per packet by the capture layer and discarded
/// after filtering and scoring. A packet without headers makes no claim
/// to be self-traffic and is always external.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    /// Raw payload bytes
    pub payload: Vec<u8>,

    /// Signature header triple, when the packet claims to be self-traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<SignatureHeaders>,

    /// Advisory traffic direction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl Packet {
    /// External packet: payload only, no signature claim.
    pub fn external(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            payload: payload.into(),
            headers: None,
            direction: None,
        }
    }

    /// Packet carrying signature headers, normally fresh from
    /// `SignatureEngine::sign`.
    pub fn signed(payload: impl Into<Vec<u8>>, headers: SignatureHeaders) -> Self {
        Self {
            payload: payload.into(),
            headers: Some(headers),
            direction: None,
        }
    }

    /// Attach the advisory traffic direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}
