//! Whitelist Traffic Filter
//!
//! Partitions the incoming packet stream into self-generated traffic
//! (dropped before any threat scoring) and external traffic (forwarded
//! to analysis). This runs BEFORE threat detection: a missed filter here
//! feeds the node's own attacks straight into the gate controller.
//!
//! Classification rules:
//! - no signature headers    -> external (makes no claim to be self-traffic)
//! - foreign or spoofed UUID -> external (analyze as a possible threat)
//! - forged signature        -> external, counted as a spoofing attempt
//! - valid self-signature    -> self, excluded from analysis

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use uuid::Uuid;

use crate::identity::NodeIdentity;
use crate::packet::Packet;
use crate::signature::{compute_signature, constant_time_eq};

/// Splits traffic into "self, exclude from analysis" and "external,
/// analyze".
///
/// Counters are atomic, so one filter may serve several ingestion
/// threads.
pub struct TrafficFilter {
    identity: NodeIdentity,
    total_packets: AtomicU64,
    self_filtered: AtomicU64,
    external_analyzed: AtomicU64,
    invalid_signatures: AtomicU64,
}

/// Filter statistics for monitoring.
///
/// `self_filtered + external_analyzed == total_packets` always holds:
/// packets with forged signatures count under `external_analyzed`, since
/// they are forwarded for analysis rather than dropped.
#[derive(Debug, Clone, Serialize)]
pub struct FilterStats {
    pub total_packets: u64,
    pub self_filtered: u64,
    pub external_analyzed: u64,
    pub invalid_signatures: u64,
    pub filter_rate: f64,
    pub external_rate: f64,
}

impl TrafficFilter {
    /// Build a filter around the node identity.
    ///
    /// The identity must be the exact one used by the offensive
    /// subsystem's signature engine on this node. Nothing in-band can
    /// check that - it is a deployment contract.
    pub fn new(identity: NodeIdentity) -> Self {
        Self {
            identity,
            total_packets: AtomicU64::new(0),
            self_filtered: AtomicU64::new(0),
            external_analyzed: AtomicU64::new(0),
            invalid_signatures: AtomicU64::new(0),
        }
    }

    /// This filter's node UUID.
    pub fn node_id(&self) -> Uuid {
        self.identity.node_id()
    }

    /// True when the packet is this node's own validly signed traffic.
    ///
    /// A packet dressed up as self-traffic with a forged signature is a
    /// spoofing attempt: counted under `invalid_signatures` and routed
    /// to analysis, never silently dropped.
    pub fn is_self_generated(&self, packet: &Packet) -> bool {
        let headers = match &packet.headers {
            Some(headers) => headers,
            // No signature claim, plain external traffic
            None => return false,
        };

        // Another node's traffic is still external, even if genuinely
        // signed by that node
        if headers.node_id != self.identity.node_id() {
            return false;
        }

        let expected = compute_signature(
            self.identity.signing_key(),
            &packet.payload,
            &headers.node_id,
        );

        if constant_time_eq(&expected, &headers.signature) {
            true
        } else {
            // Our UUID with a signature we never made: someone is
            // dressing traffic up as ours to hide from analysis
            self.invalid_signatures.fetch_add(1, Ordering::Relaxed);
            log::warn!(
                "invalid self-signature on packet ({} bytes), routing to analysis",
                packet.payload.len()
            );
            false
        }
    }

    /// Drop self-traffic, pass external traffic to threat analysis.
    pub fn process_packet(&self, packet: Packet) -> Option<Packet> {
        self.total_packets.fetch_add(1, Ordering::Relaxed);

        if self.is_self_generated(&packet) {
            self.self_filtered.fetch_add(1, Ordering::Relaxed);
            log::trace!("self-traffic filtered ({} bytes)", packet.payload.len());
            return None;
        }

        self.external_analyzed.fetch_add(1, Ordering::Relaxed);
        Some(packet)
    }

    /// Derived statistics snapshot; no side effects.
    pub fn statistics(&self) -> FilterStats {
        let total_packets = self.total_packets.load(Ordering::Relaxed);
        let self_filtered = self.self_filtered.load(Ordering::Relaxed);
        let external_analyzed = self.external_analyzed.load(Ordering::Relaxed);

        let (filter_rate, external_rate) = if total_packets > 0 {
            (
                self_filtered as f64 / total_packets as f64,
                external_analyzed as f64 / total_packets as f64,
            )
        } else {
            (0.0, 0.0)
        };

        FilterStats {
            total_packets,
            self_filtered,
            external_analyzed,
            invalid_signatures: self.invalid_signatures.load(Ordering::Relaxed),
            filter_rate,
            external_rate,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
