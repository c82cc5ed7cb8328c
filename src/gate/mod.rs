//! Isolated Gate Controller
//!
//! PID control of gate intensity driven by EXTERNAL threats only.
//! Incoming packets pass through the whitelist filter before scoring,
//! so the node's own offensive traffic never moves the gate. That
//! one-way flow is what breaks the feedback loop: offensive traffic ->
//! self-detection -> higher gate -> escalation -> more detection ->
//! runaway.
//!
//! The controller is single-owner state. One task or thread calls
//! `update_gate` once per monitoring tick; merge multiple ingestion
//! paths into one sequence first, or give each path its own controller.

mod tiers;

#[cfg(test)]
mod tests;

pub use tiers::{Tier, TierParams};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{DEFAULT_TARGET_THRESHOLD, MAX_THREAT_SCORE, PACKET_THREAT_WEIGHT};
use crate::filter::{FilterStats, TrafficFilter};
use crate::identity::NodeIdentity;
use crate::packet::Packet;

/// PID gate controller over the external-only threat signal.
///
/// State starts at `current_gate = 0, integral = 0`, is mutated only by
/// the update step, and is never reset or shared across controllers.
pub struct GateController {
    tier: Tier,
    params: TierParams,
    filter: TrafficFilter,

    // PID state
    integral: f64,
    last_error: f64,
    last_update: DateTime<Utc>,
    current_gate: f64,

    // Running statistics
    updates: u64,
    gate_increases: u64,
    gate_decreases: u64,
    max_gate_reached: f64,
}

/// Controller snapshot for telemetry export.
///
/// Embeds the filter's statistics for end-to-end observability of one
/// control path.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStats {
    pub tier: Tier,
    pub current_gate: f64,
    pub max_gate: f64,
    pub updates: u64,
    pub gate_increases: u64,
    pub gate_decreases: u64,
    pub max_gate_reached: f64,
    pub filter_stats: FilterStats,
}

impl GateController {
    /// Build a controller for `tier` around the node identity shared
    /// with the offensive subsystem's signature engine.
    pub fn new(tier: Tier, identity: NodeIdentity) -> Self {
        let params = tier.params();
        log::info!(
            "Gate controller initialized: tier={} max_gate={} node={}",
            tier,
            params.max_gate,
            identity.node_id()
        );

        Self {
            tier,
            params,
            filter: TrafficFilter::new(identity),
            integral: 0.0,
            last_error: 0.0,
            last_update: Utc::now(),
            current_gate: 0.0,
            updates: 0,
            gate_increases: 0,
            gate_decreases: 0,
            max_gate_reached: 0.0,
        }
    }

    /// Threat score over the EXTERNAL packets in `packets`.
    ///
    /// Self-signed traffic is filtered out before scoring, so outgoing
    /// attacks contribute nothing. The heuristic itself is deliberately
    /// simple - a fixed contribution per surviving packet, capped at
    /// 10.0 - and reads no PID state.
    pub fn calculate_threat_score(&self, packets: &[Packet]) -> f64 {
        let external = packets
            .iter()
            .filter(|packet| self.filter.process_packet((*packet).clone()).is_some())
            .count();

        (external as f64 * PACKET_THREAT_WEIGHT).min(MAX_THREAT_SCORE)
    }

    /// One PID update with the default target threshold.
    pub fn update_gate(&mut self, packets: &[Packet]) -> f64 {
        self.update_gate_with_threshold(packets, DEFAULT_TARGET_THRESHOLD)
    }

    /// One PID update against an explicit target threshold.
    pub fn update_gate_with_threshold(&mut self, packets: &[Packet], target_threshold: f64) -> f64 {
        self.update_gate_at(packets, target_threshold, Utc::now())
    }

    /// Clock-injected update step shared by the public entry points.
    fn update_gate_at(
        &mut self,
        packets: &[Packet],
        target_threshold: f64,
        now: DateTime<Utc>,
    ) -> f64 {
        let dt = (now - self.last_update)
            .num_microseconds()
            .map(|us| us as f64 / 1_000_000.0)
            .unwrap_or(0.0);

        let measured_threat = self.calculate_threat_score(packets);
        let error = measured_threat - target_threshold;

        let p = self.params.kp * error;

        self.integral += error * dt;
        let i = self.params.ki * self.integral;

        // Clock skew or back-to-back ticks: derivative is 0, not a
        // division by zero
        let derivative = if dt > 0.0 {
            (error - self.last_error) / dt
        } else {
            0.0
        };
        let d = self.params.kd * derivative;

        let new_gate = (self.current_gate + p + i + d).clamp(0.0, self.params.max_gate);

        if new_gate > self.current_gate {
            self.gate_increases += 1;
        } else if new_gate < self.current_gate {
            self.gate_decreases += 1;
        }
        if new_gate >= self.params.max_gate && self.current_gate < self.params.max_gate {
            log::warn!("gate saturated: tier={} gate={:.4}", self.tier, new_gate);
        }
        self.max_gate_reached = self.max_gate_reached.max(new_gate);
        self.updates += 1;

        self.current_gate = new_gate;
        self.last_error = error;
        self.last_update = now;

        log::debug!(
            "gate update: threat={:.2} error={:.2} P={:.4} I={:.4} D={:.4} gate={:.4}",
            measured_threat,
            error,
            p,
            i,
            d,
            new_gate
        );

        new_gate
    }

    /// Current gate intensity, always within `[0, max_gate]`.
    pub fn current_gate(&self) -> f64 {
        self.current_gate
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Gate intensity ceiling for this controller's tier.
    pub fn max_gate(&self) -> f64 {
        self.params.max_gate
    }

    /// The whitelist filter feeding this controller.
    pub fn filter(&self) -> &TrafficFilter {
        &self.filter
    }

    /// Controller statistics with the filter's embedded.
    pub fn statistics(&self) -> ControllerStats {
        ControllerStats {
            tier: self.tier,
            current_gate: self.current_gate,
            max_gate: self.params.max_gate,
            updates: self.updates,
            gate_increases: self.gate_increases,
            gate_decreases: self.gate_decreases,
            max_gate_reached: self.max_gate_reached,
            filter_stats: self.filter.statistics(),
        }
    }
}
