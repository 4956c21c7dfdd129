//! Ecosystem constants for the order reactor.
//!
//! Pallet identifiers and fee parameters shared by runtime configurations, mocks and
//! off-chain fillers.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used by `PalletId::into_account_truncating()` to derive the account that holds
/// transient input custody and skimmed fees awaiting claim.
pub mod pallet_ids {
  /// Order reactor pallet ID (settlement engine)
  pub const ORDER_REACTOR_PALLET_ID: &[u8; 8] = b"py/react";
}

/// Fee and settlement parameters.
pub mod params {
  use super::Balance;

  /// Basis point denominator (100%).
  pub const BPS: u32 = 10_000;

  /// Default ceiling for controller-supplied protocol fees (5 bps of the same-token outputs).
  pub const MAX_PROTOCOL_FEE_BPS: u32 = 5;

  /// Default protocol share of a skimmed interface fee (50%).
  pub const SKIM_SPLIT_BPS: u32 = 5_000;

  /// Maximum number of orders settled by one batch call.
  pub const MAX_BATCH_SIZE: u32 = 32;

  /// Precision scalar used by tests and tooling (10^12).
  pub const PRECISION: Balance = 1_000_000_000_000;
}
