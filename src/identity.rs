//! Node Identity
//!
//! One identity value (UUID + secret signing key) per node, created at
//! provisioning time and immutable for the process lifetime. The
//! signature engine and the traffic filter on a node MUST share the
//! exact same pair or self-traffic stops filtering out; constructing
//! the identity once and cloning it into both sides removes that
//! deployment bug entirely.

use rand::rngs::OsRng;
use rand::RngCore;
use uuid::Uuid;

use crate::constants::{GENERATED_KEY_LEN, MIN_SIGNING_KEY_LEN};
use crate::error::{CoreError, CoreResult};

/// Node identity: UUID plus secret signing key (≥32 bytes).
#[derive(Clone)]
pub struct NodeIdentity {
    node_id: Uuid,
    signing_key: Vec<u8>,
}

impl NodeIdentity {
    /// Build an identity from a known UUID and key.
    ///
    /// Fails when the key carries less than 32 bytes of material.
    pub fn new(node_id: Uuid, signing_key: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let signing_key = signing_key.into();
        if signing_key.len() < MIN_SIGNING_KEY_LEN {
            return Err(CoreError::KeyTooShort {
                actual: signing_key.len(),
                minimum: MIN_SIGNING_KEY_LEN,
            });
        }
        Ok(Self {
            node_id,
            signing_key,
        })
    }

    /// Build an identity from provisioning strings.
    pub fn from_parts(node_id: &str, signing_key: impl Into<Vec<u8>>) -> CoreResult<Self> {
        let node_id = node_id
            .parse::<Uuid>()
            .map_err(|source| CoreError::InvalidNodeId {
                value: node_id.to_string(),
                source,
            })?;
        Self::new(node_id, signing_key)
    }

    /// Generate a fresh identity: random UUID v4 plus a 32-byte key
    /// from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut signing_key = vec![0u8; GENERATED_KEY_LEN];
        OsRng.fill_bytes(&mut signing_key);
        Self {
            node_id: Uuid::new_v4(),
            signing_key,
        }
    }

    /// This node's UUID.
    pub fn node_id(&self) -> Uuid {
        self.node_id
    }

    pub(crate) fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Key length in bytes, for telemetry.
    pub fn key_length(&self) -> usize {
        self.signing_key.len()
    }
}

// Debug must not leak the signing key.
impl std::fmt::Debug for NodeIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIdentity")
            .field("node_id", &self.node_id)
            .field("key_length", &self.signing_key.len())
            .finish()
    }
}
