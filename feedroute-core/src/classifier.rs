use anchor_lang::prelude::Pubkey;
use tracing::debug;

use crate::denominations::Denominations;
use crate::feed::FeedRegistry;
use crate::pair::{CanonicalPair, FeedKey};
use crate::plan::Plan;

/// Which reference feeds a token has in the registry.
#[derive(Clone, Copy, Debug)]
struct Listing {
  usd: bool,
  native: bool,
}

impl Listing {
  fn probe<R: FeedRegistry>(
    registry: &R,
    token: Pubkey,
    denoms: &Denominations,
  ) -> Listing {
    Listing {
      usd: registry.feed_exists(FeedKey::new(token, denoms.usd)),
      native: registry.feed_exists(FeedKey::new(token, denoms.native)),
    }
  }
}

/// Picks the pricing plan for an already canonicalized pair.
///
/// Rules are tried in a fixed order and the first match wins:
/// 1. native against a USD-equivalent token
/// 2. one side native, the other listed against native
/// 3. one side USD-equivalent, the other listed against USD
/// 4. both listed against USD
/// 5. both listed against native
/// 6. `A` against USD, `B` against native
/// 7. `A` against native, `B` against USD
///
/// Only feed existence is probed; readings are not validated here.
pub fn classify<R: FeedRegistry>(
  registry: &R,
  pair: CanonicalPair,
  denoms: &Denominations,
  is_usd: impl Fn(Pubkey) -> bool,
) -> Plan {
  let (a, b) = (pair.token_a(), pair.token_b());
  let plan = classify_tokens(registry, a, b, denoms, is_usd);
  debug!(%pair, %plan, "classified pair");
  plan
}

fn classify_tokens<R: FeedRegistry>(
  registry: &R,
  a: Pubkey,
  b: Pubkey,
  denoms: &Denominations,
  is_usd: impl Fn(Pubkey) -> bool,
) -> Plan {
  let (a_native, b_native) = (denoms.is_native(a), denoms.is_native(b));
  let (a_usd, b_usd) = (is_usd(a), is_usd(b));

  if (a_native && b_usd) || (b_native && a_usd) {
    return Plan::NativeUsdPair;
  }

  let listed = |token: Pubkey, quote: Pubkey| {
    registry.feed_exists(FeedKey::new(token, quote))
  };
  if a_native != b_native {
    let other = if a_native { b } else { a };
    if listed(other, denoms.native) {
      return Plan::TokenNativePair;
    }
  }
  if a_usd != b_usd {
    let other = if a_usd { b } else { a };
    if listed(other, denoms.usd) {
      return Plan::TokenUsdPair;
    }
  }

  let (la, lb) = (
    Listing::probe(registry, a, denoms),
    Listing::probe(registry, b, denoms),
  );
  match (la, lb) {
    (Listing { usd: true, .. }, Listing { usd: true, .. }) => {
      Plan::TokenToUsdToToken
    }
    (Listing { native: true, .. }, Listing { native: true, .. }) => {
      Plan::TokenToNativeToToken
    }
    (Listing { usd: true, .. }, Listing { native: true, .. }) => {
      Plan::TokenAToUsdToNativeToTokenB
    }
    (Listing { native: true, .. }, Listing { usd: true, .. }) => {
      Plan::TokenAToNativeToUsdToTokenB
    }
    _ => Plan::None,
  }
}
