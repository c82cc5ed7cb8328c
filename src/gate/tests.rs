//! Feedback-loop prevention scenarios.
//!
//! The failure mode this crate exists to prevent: the node detecting
//! its own offensive traffic, raising the gate, and escalating against
//! itself. These tests drive the full path - signing, filtering,
//! scoring, PID update - with a deterministic clock.

use chrono::Duration;
use uuid::Uuid;

use super::*;
use crate::identity::NodeIdentity;
use crate::packet::Direction;
use crate::signature::SignatureEngine;

fn identity() -> NodeIdentity {
    NodeIdentity::new(Uuid::new_v4(), *b"production_signing_key_test_0032").unwrap()
}

fn external_packets(count: usize) -> Vec<Packet> {
    (0..count)
        .map(|i| {
            Packet::external(format!("external_attack_{}", i).into_bytes())
                .with_direction(Direction::Inbound)
        })
        .collect()
}

fn self_signed_packets(engine: &SignatureEngine, count: usize) -> Vec<Packet> {
    (0..count)
        .map(|i| {
            let payload = format!("counter_strike_{}", i).into_bytes();
            let headers = engine.sign(&payload);
            Packet::signed(payload, headers).with_direction(Direction::Outbound)
        })
        .collect()
}

#[test]
fn test_feedback_loop_prevention() {
    // The node generates 100 offensive packets per tick. The gate must
    // not move: if it does, the system attacks itself in production.
    let identity = identity();
    let engine = SignatureEngine::new(identity.clone());
    let mut pid = GateController::new(Tier::Shield, identity);

    let offensive = self_signed_packets(&engine, 100);

    let initial_gate = pid.current_gate();
    let mut now = pid.last_update;
    for _ in 0..10 {
        now = now + Duration::seconds(1);
        let gate = pid.update_gate_at(&offensive, 0.5, now);
        assert!((0.0..=pid.params.max_gate).contains(&gate));
    }

    let change = (pid.current_gate() - initial_gate).abs();
    assert!(change < 0.1, "feedback loop detected: gate moved by {}", change);

    let stats = pid.statistics();
    assert_eq!(stats.updates, 10);
    assert_eq!(stats.gate_increases, 0);
    assert_eq!(stats.filter_stats.self_filtered, 1000);
    assert_eq!(stats.filter_stats.external_analyzed, 0);
}

#[test]
fn test_mixed_traffic_scores_external_only() {
    // Under attack while conducting counter-strikes: the threat score
    // reflects the 10 external attacks, never the 50 counter-strikes.
    let identity = identity();
    let engine = SignatureEngine::new(identity.clone());
    let mut pid = GateController::new(Tier::Shield, identity);

    let mut traffic = external_packets(10);
    traffic.extend(self_signed_packets(&engine, 50));

    let score = pid.calculate_threat_score(&traffic);
    assert!((score - 1.0).abs() < 1e-9, "score {} should be 1.0", score);

    let now = pid.last_update + Duration::seconds(1);
    let gate = pid.update_gate_at(&traffic, 0.5, now);
    assert!(gate > 0.0, "gate should respond to external threats");
}

#[test]
fn test_guardian_surge_then_counter_strike_tick() {
    let identity = identity();
    let engine = SignatureEngine::new(identity.clone());
    let mut pid = GateController::new(Tier::Guardian, identity);

    // Tick 1: 50 external packets in one tick
    let surge = external_packets(50);
    let measured = pid.calculate_threat_score(&surge);
    assert!((measured - 5.0).abs() < 1e-9);

    let t1 = pid.last_update + Duration::seconds(1);
    let gate = pid.update_gate_at(&surge, 0.5, t1);
    assert!(gate > 0.0);
    assert!(gate <= 3.9);
    assert_eq!(pid.statistics().gate_increases, 1);

    // Tick 2: attack stops, 50 counter-strikes go out
    let counter_strikes = self_signed_packets(&engine, 50);
    let t2 = t1 + Duration::seconds(1);
    let gate2 = pid.update_gate_at(&counter_strikes, 0.5, t2);
    assert!(gate2 <= gate, "gate must not rise on self-traffic");

    let stats = pid.statistics();
    assert_eq!(stats.gate_decreases, 1);
    assert_eq!(stats.filter_stats.self_filtered, 50);
}

#[test]
fn test_same_timestamp_update_yields_zero_derivative() {
    let mut pid = GateController::new(Tier::Shield, identity());

    let t1 = pid.last_update + Duration::seconds(1);
    pid.update_gate_at(&external_packets(50), 0.5, t1);
    let integral_after_first = pid.integral;

    // Second call at the exact same timestamp: dt == 0. The error just
    // swung from 4.5 to -0.5; an unguarded derivative would be infinite.
    let gate = pid.update_gate_at(&[], 0.5, t1);
    assert!(gate.is_finite());
    assert!((0.0..=pid.params.max_gate).contains(&gate));
    assert_eq!(pid.integral, integral_after_first);
}

#[test]
fn test_gate_bounded_for_all_tiers() {
    for tier in Tier::ALL {
        let mut pid = GateController::new(tier, identity());
        let max_gate = pid.params.max_gate;

        // Saturating surge, then silence
        let flood = external_packets(200);
        let mut now = pid.last_update;
        for _ in 0..30 {
            now = now + Duration::seconds(1);
            let gate = pid.update_gate_at(&flood, 0.5, now);
            assert!((0.0..=max_gate).contains(&gate), "{} out of bounds for {}", gate, tier);
        }
        for _ in 0..30 {
            now = now + Duration::seconds(1);
            let gate = pid.update_gate_at(&[], 0.5, now);
            assert!((0.0..=max_gate).contains(&gate), "{} out of bounds for {}", gate, tier);
        }

        let stats = pid.statistics();
        assert_eq!(stats.max_gate_reached, max_gate, "{} should saturate", tier);
        assert_eq!(stats.updates, 60);
    }
}

#[test]
fn test_threat_score_clamped_at_ceiling() {
    let pid = GateController::new(Tier::Reaper, identity());
    let flood = external_packets(150);
    assert_eq!(pid.calculate_threat_score(&flood), 10.0);
}

#[test]
fn test_threat_score_mutates_no_pid_state() {
    let pid = GateController::new(Tier::Gladiator, identity());
    pid.calculate_threat_score(&external_packets(25));

    let stats = pid.statistics();
    assert_eq!(stats.updates, 0);
    assert_eq!(stats.current_gate, 0.0);
    // The filter did run - its counters are the one visible effect
    assert_eq!(stats.filter_stats.total_packets, 25);
}

#[test]
fn test_statistics_snapshot() {
    let mut pid = GateController::new(Tier::Gladiator, identity());
    let t1 = pid.last_update + Duration::seconds(1);
    pid.update_gate_at(&external_packets(20), 0.5, t1);

    let stats = pid.statistics();
    assert_eq!(stats.tier, Tier::Gladiator);
    assert_eq!(stats.max_gate, 4.9);
    assert_eq!(stats.updates, 1);
    assert_eq!(stats.filter_stats.total_packets, 20);
    assert_eq!(stats.filter_stats.external_analyzed, 20);
    assert!(stats.current_gate > 0.0);
    assert_eq!(stats.max_gate_reached, stats.current_gate);
}
