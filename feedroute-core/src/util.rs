#[cfg(test)]
pub mod proptest {
  use anchor_lang::prelude::Pubkey;
  use proptest::prelude::*;

  use crate::denominations::{NATIVE_MINT, USD};
  use crate::feed::RoundData;
  use crate::pair::FeedKey;
  use crate::snapshot::FeedSnapshot;

  /// Fixed "now" for staleness checks, late 2023.
  pub const NOW: i64 = 1_700_000_000;

  /// One day, the window most scenarios run with.
  pub const DAY: u64 = 86_400;

  /// Arbitrary 32-byte identifier, sentinel included.
  pub fn pubkey() -> impl Strategy<Value = Pubkey> {
    any::<[u8; 32]>().prop_map(Pubkey::new_from_array)
  }

  /// Fresh feed between two unique tokens.
  #[must_use]
  pub fn feed_key() -> FeedKey {
    FeedKey::new(Pubkey::new_unique(), Pubkey::new_unique())
  }

  /// Which of the four reference feeds a token has.
  #[derive(Clone, Copy, Debug)]
  pub struct Listing {
    pub usd: bool,
    pub native: bool,
  }

  prop_compose! {
    pub fn listing()(usd in any::<bool>(), native in any::<bool>()) -> Listing {
      Listing { usd, native }
    }
  }

  /// Snapshot listing `token`'s reference feeds per `listing`.
  #[must_use]
  pub fn list_token(
    snapshot: FeedSnapshot,
    token: Pubkey,
    listing: Listing,
  ) -> FeedSnapshot {
    let snapshot = if listing.usd {
      snapshot.with_listed(FeedKey::new(token, USD))
    } else {
      snapshot
    };
    if listing.native {
      snapshot.with_listed(FeedKey::new(token, NATIVE_MINT))
    } else {
      snapshot
    }
  }

  /// Fresh round at `NOW`.
  #[must_use]
  pub fn fresh(answer: i128) -> RoundData {
    RoundData::new(answer, NOW)
  }
}
