use std::fmt::Display;

use anchor_lang::prelude::*;

use crate::denominations::Denominations;
use crate::pair::{CanonicalPair, FeedKey};
use crate::plan::Plan::{
  NativeUsdPair, TokenAToNativeToUsdToTokenB, TokenAToUsdToNativeToTokenB,
  TokenNativePair, TokenToNativeToToken, TokenToUsdToToken, TokenUsdPair,
};

/// Strategy for pricing one canonical pair out of registry feeds.
///
/// `A` and `B` refer to the first and second token of the canonical pair,
/// `native` and `usd` to the two reference denominations.
#[derive(
  Clone,
  Copy,
  Debug,
  Default,
  PartialEq,
  Eq,
  Hash,
  AnchorSerialize,
  AnchorDeserialize,
)]
pub enum Plan {
  /// No supported strategy.
  #[default]
  None,
  /// `native/usd` alone.
  NativeUsdPair,
  /// `token/usd` against a USD-equivalent token.
  TokenUsdPair,
  /// `token/native` against the native asset.
  TokenNativePair,
  /// `A/usd` over `B/usd`.
  TokenToUsdToToken,
  /// `A/native` over `B/native`.
  TokenToNativeToToken,
  /// `A/usd` over `B/native * native/usd`.
  TokenAToUsdToNativeToTokenB,
  /// `A/native * native/usd` over `B/usd`.
  TokenAToNativeToUsdToTokenB,
}

impl Plan {
  #[must_use]
  pub fn is_supported(&self) -> bool {
    !matches!(self, Plan::None)
  }

  /// Number of distinct feeds read to quote under this plan.
  #[must_use]
  pub fn feed_count(&self) -> usize {
    match self {
      Plan::None => 0,
      NativeUsdPair | TokenUsdPair | TokenNativePair => 1,
      TokenToUsdToToken | TokenToNativeToToken => 2,
      TokenAToUsdToNativeToTokenB | TokenAToNativeToUsdToTokenB => 3,
    }
  }
}

impl Display for Plan {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Plan::None => "none",
      NativeUsdPair => "native_usd_pair",
      TokenUsdPair => "token_usd_pair",
      TokenNativePair => "token_native_pair",
      TokenToUsdToToken => "token_to_usd_to_token",
      TokenToNativeToToken => "token_to_native_to_token",
      TokenAToUsdToNativeToTokenB => "token_a_to_usd_to_native_to_token_b",
      TokenAToNativeToUsdToTokenB => "token_a_to_native_to_usd_to_token_b",
    })
  }
}

/// Feeds a plan reads for one canonical pair.
///
/// Each side is valued in a common reference as the product of its legs; a
/// side without legs is the reference itself and is worth exactly one. The
/// price of `A` in `B` is `value(A) / value(B)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PricingRoute {
  pub pair: CanonicalPair,
  pub plan: Plan,
  pub token_a_legs: Vec<FeedKey>,
  pub token_b_legs: Vec<FeedKey>,
}

impl PricingRoute {
  /// Lays out the legs of `plan` over `pair`.
  ///
  /// Single-feed plans locate their reference token with the current
  /// denominations and `is_usd`. Returns `None` for [`Plan::None`].
  pub fn new(
    plan: Plan,
    pair: CanonicalPair,
    denoms: &Denominations,
    is_usd: impl Fn(Pubkey) -> bool,
  ) -> Option<PricingRoute> {
    let (a, b) = (pair.token_a(), pair.token_b());
    let (native, usd) = (denoms.native, denoms.usd);
    let native_usd = FeedKey::new(native, usd);
    let (token_a_legs, token_b_legs) = match plan {
      Plan::None => return None,
      NativeUsdPair if denoms.is_native(a) => (vec![native_usd], vec![]),
      NativeUsdPair => (vec![], vec![native_usd]),
      TokenNativePair if denoms.is_native(a) => {
        (vec![], vec![FeedKey::new(b, native)])
      }
      TokenNativePair => (vec![FeedKey::new(a, native)], vec![]),
      TokenUsdPair if is_usd(b) => (vec![FeedKey::new(a, usd)], vec![]),
      TokenUsdPair => (vec![], vec![FeedKey::new(b, usd)]),
      TokenToUsdToToken => {
        (vec![FeedKey::new(a, usd)], vec![FeedKey::new(b, usd)])
      }
      TokenToNativeToToken => {
        (vec![FeedKey::new(a, native)], vec![FeedKey::new(b, native)])
      }
      TokenAToUsdToNativeToTokenB => (
        vec![FeedKey::new(a, usd)],
        vec![FeedKey::new(b, native), native_usd],
      ),
      TokenAToNativeToUsdToTokenB => (
        vec![FeedKey::new(a, native), native_usd],
        vec![FeedKey::new(b, usd)],
      ),
    };
    Some(PricingRoute {
      pair,
      plan,
      token_a_legs,
      token_b_legs,
    })
  }

  /// Distinct feeds across both sides, in leg order.
  #[must_use]
  pub fn feeds(&self) -> Vec<FeedKey> {
    let mut feeds: Vec<FeedKey> = Vec::with_capacity(3);
    for feed in self.token_a_legs.iter().chain(&self.token_b_legs) {
      if !feeds.contains(feed) {
        feeds.push(*feed);
      }
    }
    feeds
  }
}
