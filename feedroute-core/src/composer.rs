use std::collections::HashMap;

use anchor_lang::prelude::*;
use fix::prelude::*;
use fix::typenum::Integer;
use rust_decimal::Decimal;
use tracing::debug;

use crate::clock::UnixClock;
use crate::error::CoreError::{
  QuoteAmountRange, QuoteArithmetic, RateUnderflow,
};
use crate::feed::{read_feed, truncate, FeedRegistry};
use crate::pair::FeedKey;
use crate::plan::PricingRoute;

/// Validated prices of a route's feeds, each read exactly once.
pub struct RouteReadings {
  prices: HashMap<FeedKey, Decimal>,
}

impl RouteReadings {
  /// Reads every distinct feed of `route` through the validator.
  pub fn read<R: FeedRegistry, C: UnixClock>(
    registry: &R,
    clock: &C,
    route: &PricingRoute,
    max_staleness_secs: u64,
  ) -> Result<RouteReadings> {
    let prices = route
      .feeds()
      .into_iter()
      .map(|feed| {
        read_feed(registry, clock, feed, max_staleness_secs)
          .and_then(|reading| reading.price())
          .map(|price| (feed, price))
      })
      .collect::<Result<_>>()?;
    Ok(RouteReadings { prices })
  }

  /// Product of the legs' prices; a side without legs is worth one.
  fn side_value(&self, legs: &[FeedKey]) -> Result<Decimal> {
    legs.iter().try_fold(Decimal::ONE, |acc, leg| {
      self
        .prices
        .get(leg)
        .and_then(|price| acc.checked_mul(*price))
        .map(truncate)
        .ok_or(QuoteArithmetic.into())
    })
  }
}

/// Composes the rate of `base` denominated in the other token of the route.
///
/// `base` is the alias-resolved first token of the request. Readings are
/// normalized to 18 decimals, as is every intermediate product and the final
/// quotient.
pub fn compose_rate(
  route: &PricingRoute,
  readings: &RouteReadings,
  base: Pubkey,
) -> Result<Decimal> {
  let value_a = readings.side_value(&route.token_a_legs)?;
  let value_b = readings.side_value(&route.token_b_legs)?;
  let (num, den) = if base == route.pair.token_a() {
    (value_a, value_b)
  } else {
    (value_b, value_a)
  };
  let rate = num.checked_div(den).map(truncate).ok_or(QuoteArithmetic)?;
  if rate.is_zero() {
    Err(RateUnderflow.into())
  } else {
    debug!(pair = %route.pair, plan = %route.plan, %rate, "composed rate");
    Ok(rate)
  }
}

/// Reads and composes in one step.
pub fn quote_route<R: FeedRegistry, C: UnixClock>(
  registry: &R,
  clock: &C,
  route: &PricingRoute,
  base: Pubkey,
  max_staleness_secs: u64,
) -> Result<Decimal> {
  let readings =
    RouteReadings::read(registry, clock, route, max_staleness_secs)?;
  compose_rate(route, &readings, base)
}

/// Decimal places of a fixed-point exponent, within what `Decimal` holds.
fn exp_scale<Exp: Integer>() -> Result<u32> {
  u32::try_from(-Exp::to_i32())
    .ok()
    .filter(|scale| *scale <= 18)
    .ok_or(QuoteAmountRange.into())
}

/// Converts `amount_in` at its token's precision into the output token at
/// `rate`, truncating to the output precision.
///   `amount_in * rate`
pub fn convert_amount<InExp: Integer, OutExp: Integer>(
  amount_in: UFix64<InExp>,
  rate: Decimal,
) -> Result<UFix64<OutExp>> {
  let in_scale = exp_scale::<InExp>()?;
  let amount =
    Decimal::from_i128_with_scale(i128::from(amount_in.bits), in_scale);
  let out_scale = exp_scale::<OutExp>()?;
  let product = amount.checked_mul(rate).ok_or(QuoteAmountRange)?;
  let mantissa = product.mantissa().unsigned_abs();
  let bits = match product.scale().cmp(&out_scale) {
    std::cmp::Ordering::Equal => Some(mantissa),
    std::cmp::Ordering::Greater => {
      10u128
        .checked_pow(product.scale() - out_scale)
        .and_then(|divisor| mantissa.checked_div(divisor))
    }
    std::cmp::Ordering::Less => 10u128
      .checked_pow(out_scale - product.scale())
      .and_then(|multiplier| mantissa.checked_mul(multiplier)),
  };
  bits
    .and_then(|bits| u64::try_from(bits).ok())
    .map(UFix64::new)
    .ok_or(QuoteAmountRange.into())
}
