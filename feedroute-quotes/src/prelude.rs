//! Common imports for feedroute-quotes.

pub use anchor_lang::prelude::Pubkey;
pub use anyhow::Result;
pub use feedroute_core::plan::Plan;
pub use fix::prelude::*;
pub use rust_decimal::Decimal;

pub use crate::{
  fetch_route, probe_listings, FeedSource, QuoteService, RegistrySource,
  SystemClock,
};
