use std::fmt::Display;

use anchor_lang::prelude::*;

/// Unordered token pair normalized so the lesser identifier comes first.
///
/// Callers resolve aliases before constructing one; the router is the only
/// place that does both steps.
#[derive(
  Clone,
  Copy,
  Debug,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub struct CanonicalPair {
  token_a: Pubkey,
  token_b: Pubkey,
}

impl CanonicalPair {
  #[must_use]
  pub fn new(x: Pubkey, y: Pubkey) -> CanonicalPair {
    if x <= y {
      CanonicalPair {
        token_a: x,
        token_b: y,
      }
    } else {
      CanonicalPair {
        token_a: y,
        token_b: x,
      }
    }
  }

  #[must_use]
  pub fn token_a(&self) -> Pubkey {
    self.token_a
  }

  #[must_use]
  pub fn token_b(&self) -> Pubkey {
    self.token_b
  }
}

impl Display for CanonicalPair {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.token_a, self.token_b)
  }
}

/// Identifies one registry feed: the price of `base` denominated in `quote`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FeedKey {
  pub base: Pubkey,
  pub quote: Pubkey,
}

impl FeedKey {
  #[must_use]
  pub fn new(base: Pubkey, quote: Pubkey) -> FeedKey {
    FeedKey { base, quote }
  }
}

impl Display for FeedKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.base, self.quote)
  }
}
