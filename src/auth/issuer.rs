//! Unique identifier and session token issuance
//!
//! Account ids use the snowflake layout: 41 bits of milliseconds since
//! [`EPOCH_MS`], 10 bits of node id and a 12-bit per-millisecond sequence.
//! Session tokens are random UUIDv4 values and carry no structure.

use crate::error::{Error, Result};
use std::sync::Mutex;
use uuid::Uuid;

/// Custom epoch (2010-11-04T01:42:54.657Z)
pub const EPOCH_MS: i64 = 1_288_834_974_657;

const NODE_BITS: u8 = 10;
const SEQUENCE_BITS: u8 = 12;

pub const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;
const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;

#[derive(Debug, Default)]
struct IdState {
    last_ms: i64,
    sequence: u16,
}

/// Generates account ids and session tokens. Safe to share across tasks.
#[derive(Debug)]
pub struct TokenIssuer {
    node_id: u16,
    state: Mutex<IdState>,
}

impl TokenIssuer {
    /// Create an issuer for the given node id (0..=1023)
    pub fn new(node_id: u16) -> Result<Self> {
        if node_id > MAX_NODE_ID {
            return Err(Error::Config(format!(
                "node id {} exceeds maximum {}",
                node_id, MAX_NODE_ID
            )));
        }
        Ok(Self {
            node_id,
            state: Mutex::new(IdState::default()),
        })
    }

    /// Next time-ordered id. Strictly increasing within this issuer.
    pub fn next_raw_id(&self) -> u64 {
        let now = chrono::Utc::now().timestamp_millis() - EPOCH_MS;

        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if now > state.last_ms {
            state.last_ms = now;
            state.sequence = 0;
        } else if state.sequence == MAX_SEQUENCE {
            // Sequence exhausted (or the clock stepped back): borrow the next millisecond
            state.last_ms += 1;
            state.sequence = 0;
        } else {
            state.sequence += 1;
        }

        ((state.last_ms as u64) << (NODE_BITS + SEQUENCE_BITS))
            | ((self.node_id as u64) << SEQUENCE_BITS)
            | state.sequence as u64
    }

    /// Next account id, rendered as a decimal string
    pub fn next_account_id(&self) -> String {
        self.next_raw_id().to_string()
    }

    /// Fresh opaque session token
    pub fn issue_session_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self {
            node_id: 1,
            state: Mutex::new(IdState::default()),
        }
    }
}
