//! Central Configuration Constants
//!
//! Single source of truth for signing, filtering and gate defaults.

/// Minimum signing key length in bytes (256-bit)
///
/// Construction fails below this. There is no degraded mode for an
/// under-length key.
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Length of generated signing keys in bytes
pub const GENERATED_KEY_LEN: usize = 32;

/// Header carrying the hex HMAC-SHA256 signature
pub const SIGNATURE_HEADER: &str = "X-GLADIATOR-SIG";

/// Header carrying the signer's node UUID
pub const NODE_ID_HEADER: &str = "X-GLADIATOR-UUID";

/// Header carrying the emission timestamp (unix seconds, advisory)
pub const TIMESTAMP_HEADER: &str = "X-GLADIATOR-TS";

/// Threat score contribution per external packet
pub const PACKET_THREAT_WEIGHT: f64 = 0.1;

/// Threat score ceiling
pub const MAX_THREAT_SCORE: f64 = 10.0;

/// Default target threat level for the gate controller
pub const DEFAULT_TARGET_THRESHOLD: f64 = 0.5;
