//! Self-Signature Engine
//!
//! Cryptographically signs all offensive traffic leaving this node so
//! the defensive subsystem can recognize it and drop it before threat
//! scoring. Without the signature the node would detect its own attacks
//! as hostile traffic and escalate against itself.
//!
//! Standard: HMAC-SHA256 over payload || node UUID, hex digest.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use uuid::Uuid;

use crate::identity::NodeIdentity;
use crate::packet::SignatureHeaders;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 digest over payload || node id.
///
/// Shared with the traffic filter so both sides compute signatures the
/// same way.
pub(crate) fn compute_signature(key: &[u8], payload: &[u8], node_id: &Uuid) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(payload);
    mac.update(node_id.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time string comparison to prevent timing attacks.
///
/// Length is public (signatures are fixed-size hex), so a length
/// mismatch may return early.
pub(crate) fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

// ============================================================================
// SIGNATURE ENGINE
// ============================================================================

/// Signs outbound payloads and verifies claimed authorship for this node.
///
/// Sign and verify share no mutable state beyond atomic counters, so an
/// engine may be called from multiple threads.
pub struct SignatureEngine {
    identity: NodeIdentity,
    packets_signed: AtomicU64,
    signatures_generated: AtomicU64,
}

/// Read-only counter snapshot for telemetry export.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureStats {
    pub node_id: Uuid,
    pub packets_signed: u64,
    pub signatures_generated: u64,
    pub key_length: usize,
}

impl SignatureEngine {
    /// Build an engine around a provisioned identity.
    pub fn new(identity: NodeIdentity) -> Self {
        log::info!("Signature engine ready: node={}", identity.node_id());
        Self {
            identity,
            packets_signed: AtomicU64::new(0),
            signatures_generated: AtomicU64::new(0),
        }
    }

    /// This node's UUID.
    pub fn node_id(&self) -> Uuid {
        self.identity.node_id()
    }

    /// Sign an outbound payload.
    ///
    /// Returns the header triple the offensive subsystem attaches to
    /// the packet. Never fails: HMAC-SHA256 accepts keys of any length.
    pub fn sign(&self, payload: &[u8]) -> SignatureHeaders {
        let signature = compute_signature(
            self.identity.signing_key(),
            payload,
            &self.identity.node_id(),
        );

        self.packets_signed.fetch_add(1, Ordering::Relaxed);
        self.signatures_generated.fetch_add(1, Ordering::Relaxed);

        SignatureHeaders {
            signature,
            node_id: self.identity.node_id(),
            timestamp: Utc::now().timestamp(),
        }
    }

    /// Check whether this node produced `claimed_signature` for `payload`.
    ///
    /// Total: malformed input is a `false`, never an error or a panic.
    /// The digest comparison is constant-time.
    pub fn verify(&self, payload: &[u8], claimed_signature: &str, claimed_node_id: &Uuid) -> bool {
        // This engine can only vouch for its own node; a mismatched id
        // would fail the HMAC check anyway, this just skips the work.
        if *claimed_node_id != self.identity.node_id() {
            return false;
        }

        let expected = compute_signature(self.identity.signing_key(), payload, claimed_node_id);
        constant_time_eq(&expected, claimed_signature)
    }

    /// Counter snapshot; never mutates state.
    pub fn statistics(&self) -> SignatureStats {
        SignatureStats {
            node_id: self.identity.node_id(),
            packets_signed: self.packets_signed.load(Ordering::Relaxed),
            signatures_generated: self.signatures_generated.load(Ordering::Relaxed),
            key_length: self.identity.key_length(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
