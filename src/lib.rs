//! GLADIATOR Anti-Feedback Gating Core
//!
//! Defensive gating library for appliances that run an offensive
//! traffic generator and a defensive threat-response controller on the
//! same node. Left uncorrected, the defensive side detects the node's
//! own offensive traffic as a threat, raises the gate, and the two
//! subsystems escalate each other without bound.
//!
//! Three components break that loop, in dependency order:
//! - [`signature`] - HMAC-SHA256 self-signing of outbound offensive
//!   traffic
//! - [`filter`] - strips validly self-signed packets from the analysis
//!   path before any threat scoring
//! - [`gate`] - tier-tuned PID loop from the external-only threat score
//!   to a bounded gate intensity
//!
//! Data flows one way: packets -> filter -> external-only packets ->
//! threat score -> PID update -> gate intensity. The gate value is never
//! fed back into signing or filtering.
//!
//! The crate owns no I/O. Hosts feed in [`packet::Packet`] records,
//! read back the gate value, and export the statistics snapshots
//! (signature, filter, controller) to their telemetry pipeline.

pub mod constants;
pub mod error;
pub mod filter;
pub mod gate;
pub mod identity;
pub mod packet;
pub mod signature;

pub use error::{CoreError, CoreResult};
pub use filter::{FilterStats, TrafficFilter};
pub use gate::{ControllerStats, GateController, Tier, TierParams};
pub use identity::NodeIdentity;
pub use packet::{Direction, Packet, SignatureHeaders};
pub use signature::{SignatureEngine, SignatureStats};
