use anchor_lang::prelude::*;

use crate::error::CoreError::ZeroAddress;

/// Wrapped SOL mint, the native-asset reference by default.
pub const NATIVE_MINT: Pubkey =
  pubkey!("So11111111111111111111111111111111111111112");

/// Fiat USD reference. Follows the `0x348` (ISO 4217 numeric 840)
/// denomination convention used by feed registries.
pub const USD: Pubkey = Pubkey::new_from_array([
  0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
  0, 0, 0, 0, 0x03, 0x48,
]);

/// The two reference assets every feed is quoted against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct Denominations {
  pub native: Pubkey,
  pub usd: Pubkey,
}

impl Denominations {
  /// Both references must be set and distinct.
  pub fn new(native: Pubkey, usd: Pubkey) -> Result<Denominations> {
    let unset = Pubkey::default();
    if native == unset || usd == unset || native == usd {
      Err(ZeroAddress.into())
    } else {
      Ok(Denominations { native, usd })
    }
  }

  #[must_use]
  pub fn is_native(&self, token: Pubkey) -> bool {
    token == self.native
  }
}

impl Default for Denominations {
  fn default() -> Self {
    Denominations {
      native: NATIVE_MINT,
      usd: USD,
    }
  }
}
