use std::fmt::Display;
use std::str::FromStr;

use anchor_lang::prelude::Pubkey;
use serde::{Deserialize, Serialize};

use crate::denominations::{NATIVE_MINT, USD};

/// Token identifier carried as a base58 string in configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyString(pub Pubkey);

impl TryFrom<String> for KeyString {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Pubkey::from_str(&value)
      .map(KeyString)
      .map_err(|e| format!("invalid token identifier `{value}`: {e}"))
  }
}

impl From<KeyString> for String {
  fn from(key: KeyString) -> String {
    key.0.to_string()
  }
}

impl Display for KeyString {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
  pub token: KeyString,
  pub mapping: KeyString,
}

/// Initial router state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
  pub max_staleness_secs: u64,
  /// Native-asset reference; wrapped SOL when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub native: Option<KeyString>,
  /// USD reference; the fiat USD denomination when absent.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub usd: Option<KeyString>,
  #[serde(default)]
  pub usd_tokens: Vec<KeyString>,
  #[serde(default)]
  pub mappings: Vec<MappingEntry>,
}

impl RouterConfig {
  /// Config with the given window and otherwise default state.
  #[must_use]
  pub fn new(max_staleness_secs: u64) -> RouterConfig {
    RouterConfig {
      max_staleness_secs,
      native: None,
      usd: None,
      usd_tokens: Vec::new(),
      mappings: Vec::new(),
    }
  }

  pub fn from_json(json: &str) -> serde_json::Result<RouterConfig> {
    serde_json::from_str(json)
  }

  #[must_use]
  pub fn native(&self) -> Pubkey {
    self.native.map_or(NATIVE_MINT, |k| k.0)
  }

  #[must_use]
  pub fn usd(&self) -> Pubkey {
    self.usd.map_or(USD, |k| k.0)
  }

  #[must_use]
  pub fn usd_tokens(&self) -> Vec<Pubkey> {
    self.usd_tokens.iter().map(|k| k.0).collect()
  }

  /// Mapping entries split into parallel token and alias lists.
  #[must_use]
  pub fn mapping_lists(&self) -> (Vec<Pubkey>, Vec<Pubkey>) {
    self
      .mappings
      .iter()
      .map(|entry| (entry.token.0, entry.mapping.0))
      .unzip()
  }
}
