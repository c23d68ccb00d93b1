use std::collections::HashMap;

use anchor_lang::prelude::*;

use crate::error::CoreError::InvalidMappingsInput;

/// Token aliases, e.g. a wrapped mint pointing at the asset its feeds exist
/// for. Resolution is a single hop.
#[derive(Clone, Debug, Default)]
pub struct AliasMap {
  mappings: HashMap<Pubkey, Pubkey>,
}

impl AliasMap {
  #[must_use]
  pub fn new() -> AliasMap {
    AliasMap::default()
  }

  /// Canonical token for `token`; the input itself when unmapped.
  #[must_use]
  pub fn resolve(&self, token: Pubkey) -> Pubkey {
    self.mappings.get(&token).copied().unwrap_or(token)
  }

  /// Registers `tokens[i] -> mappings[i]`, overwriting earlier entries.
  /// Mapping a token to the unset key clears its alias.
  ///
  /// Input is validated before anything is written.
  pub fn add_mappings(
    &mut self,
    tokens: &[Pubkey],
    mappings: &[Pubkey],
  ) -> Result<()> {
    if tokens.is_empty() || tokens.len() != mappings.len() {
      return Err(InvalidMappingsInput.into());
    }
    for (token, mapping) in tokens.iter().zip(mappings) {
      if *mapping == Pubkey::default() {
        self.mappings.remove(token);
      } else {
        self.mappings.insert(*token, *mapping);
      }
    }
    Ok(())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.mappings.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.mappings.is_empty()
  }
}
