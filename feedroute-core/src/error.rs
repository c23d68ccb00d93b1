use anchor_lang::error::Error;
use anchor_lang::prelude::error_code;

#[error_code]
pub enum CoreError {
  // `denominations` / `router`
  #[msg("Required identifier is unset.")]
  ZeroAddress = 8000,
  #[msg("Max staleness window cannot be zero.")]
  ZeroMaxDelay,
  #[msg("Caller is not authorized for the required role.")]
  Unauthorized,
  // `alias_map`
  #[msg("Token and mapping lists must be non-empty and of equal length.")]
  InvalidMappingsInput,
  // `feed`
  #[msg("Feed reported a non-positive price.")]
  InvalidPrice,
  #[msg("Feed reading is older than the max staleness window.")]
  LastUpdateIsTooOld,
  #[msg("Feed price is not representable at quote precision.")]
  FeedPriceRange,
  // `classifier`
  #[msg("No pricing plan can support the pair.")]
  PairCannotBeSupported,
  // `composer`
  #[msg("Overflow while composing feed readings.")]
  QuoteArithmetic,
  #[msg("Composed rate truncates to zero at quote precision.")]
  RateUnderflow,
  #[msg("Quoted amount does not fit the output precision.")]
  QuoteAmountRange,
}

/// Errors raised by the feed registries bundled with this crate. These travel
/// the same channel as provider errors and are reported as upstream.
#[error_code]
pub enum FeedError {
  #[msg("No feed registered for the base/quote pair.")]
  FeedNotFound = 8100,
  #[msg("Price update is not fully verified.")]
  PythVerificationLevel,
  #[msg("Price exponent is out of range.")]
  PythExponent,
}

/// Where an error on the shared channel originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorSource {
  /// Violation detected by the engine itself.
  Core,
  /// Anything reported by a feed provider, passed through untouched.
  Upstream,
}

/// Tags an error as engine-detected or provider-originated.
#[must_use]
pub fn error_source(err: &Error) -> ErrorSource {
  let core =
    u32::from(CoreError::ZeroAddress)..=u32::from(CoreError::QuoteAmountRange);
  match err {
    Error::AnchorError(e) if core.contains(&e.error_code_number) => {
      ErrorSource::Core
    }
    _ => ErrorSource::Upstream,
  }
}
