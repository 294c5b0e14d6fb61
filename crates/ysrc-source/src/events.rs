//! Events emitted by yield source state transitions.
//!
//! Events accumulate in an [`EventLog`] owned by the yield source and are
//! drained with [`YieldSource::take_events`](crate::YieldSource::take_events).
//! A failed operation leaves no events behind.

use ethereum_types::{Address, U256};
use serde::{Deserialize, Serialize};

/// A yield source event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum YieldSourceEvent {
    /// The yield source was bound to a vault and deposit token.
    Initialized {
        /// The wrapped vault.
        vault: Address,
        /// The deposit token.
        token: Address,
    },
    /// Tokens were supplied and shares minted.
    SuppliedTokenTo {
        /// Account the tokens came from.
        from: Address,
        /// Shares minted.
        shares: U256,
        /// Tokens supplied.
        amount: U256,
        /// Account credited with the shares.
        to: Address,
    },
    /// Shares were burned for tokens.
    RedeemedToken {
        /// Redeeming account.
        from: Address,
        /// Shares burned.
        shares: U256,
        /// Tokens requested.
        amount: U256,
    },
    /// Tokens were added without minting shares.
    Sponsored {
        /// Sponsoring account.
        from: Address,
        /// Tokens added.
        amount: U256,
    },
    /// Max withdrawal losses changed.
    MaxLossesChanged {
        /// New value in basis points.
        max_losses: u16,
    },
    /// Ownership moved to a new account, or was renounced to the zero address.
    OwnershipTransferred {
        /// Previous owner.
        previous_owner: Address,
        /// New owner.
        new_owner: Address,
    },
}

impl YieldSourceEvent {
    /// Event name as used in the serialized `event_type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "initialized",
            Self::SuppliedTokenTo { .. } => "supplied_token_to",
            Self::RedeemedToken { .. } => "redeemed_token",
            Self::Sponsored { .. } => "sponsored",
            Self::MaxLossesChanged { .. } => "max_losses_changed",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }

    /// Render the event as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the event cannot be serialized.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Ordered buffer of emitted events.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<YieldSourceEvent>,
}

impl EventLog {
    /// Append an event.
    pub fn emit(&mut self, event: YieldSourceEvent) {
        tracing::debug!(event = event.name(), "yield source event");
        self.events.push(event);
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[YieldSourceEvent] {
        &self.events
    }

    /// Remove and return all buffered events.
    pub fn drain(&mut self) -> Vec<YieldSourceEvent> {
        std::mem::take(&mut self.events)
    }
}
