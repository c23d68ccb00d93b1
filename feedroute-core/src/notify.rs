use std::fmt::Display;

use anchor_lang::prelude::Pubkey;
use tracing::info;

use crate::pair::CanonicalPair;
use crate::plan::Plan;

/// State changes reported by the router after a successful mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
  /// Support for a pair was added, changed or removed (`Plan::None`).
  PlanUpdated { pair: CanonicalPair, plan: Plan },
  TokensConsideredUsd { tokens: Vec<Pubkey> },
  TokensNoLongerConsideredUsd { tokens: Vec<Pubkey> },
  MappingsAdded {
    tokens: Vec<Pubkey>,
    mappings: Vec<Pubkey>,
  },
  MaxStalenessSet { max_staleness_secs: u64 },
}

impl Display for Notification {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Notification::PlanUpdated { .. } => f.write_str("plan_updated"),
      Notification::TokensConsideredUsd { .. } => {
        f.write_str("tokens_considered_usd")
      }
      Notification::TokensNoLongerConsideredUsd { .. } => {
        f.write_str("tokens_no_longer_considered_usd")
      }
      Notification::MappingsAdded { .. } => f.write_str("mappings_added"),
      Notification::MaxStalenessSet { .. } => f.write_str("max_staleness_set"),
    }
  }
}

/// Sink for router notifications.
pub trait Notifier {
  fn notify(&self, notification: &Notification);
}

/// Discards every notification.
impl Notifier for () {
  fn notify(&self, _: &Notification) {}
}

/// Emits notifications as `info` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, notification: &Notification) {
    match notification {
      Notification::PlanUpdated { pair, plan } => {
        info!(%pair, %plan, "{notification}");
      }
      Notification::TokensConsideredUsd { tokens }
      | Notification::TokensNoLongerConsideredUsd { tokens } => {
        info!(count = tokens.len(), ?tokens, "{notification}");
      }
      Notification::MappingsAdded { tokens, mappings } => {
        info!(count = tokens.len(), ?tokens, ?mappings, "{notification}");
      }
      Notification::MaxStalenessSet { max_staleness_secs } => {
        info!(max_staleness_secs, "{notification}");
      }
    }
  }
}
