//! Fee composition applied to resolved orders before settlement.
//!
//! Two independent mechanisms, applied in this order:
//! - protocol fees supplied by the registered fee controller, appended as extra outputs
//!   after cap and duplicate checks;
//! - the interface skim, which redirects the order's last real output to the engine
//!   account and splits it between the protocol and the interface in the claim ledger.

use crate::math::mul_div_floor;
use alloc::vec::Vec;
use frame::deps::frame_support::traits::Defensive;
use primitives::{params::BPS, AssetKind, Balance, OutputToken, ResolvedOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeeError {
  /// Protocol fee above the cap for its token
  FeeTooLarge,
  /// Same (token, recipient) pair supplied twice by the controller
  DuplicateFeeOutput,
  /// Split outside `0..=BPS`
  InvalidFee,
  Overflow,
}

/// Appends controller-supplied fee outputs to `order`.
///
/// Each candidate is capped at `max_bps` of the order's real outputs in the same token.
/// `order.outputs` must not contain fee outputs yet.
pub fn inject_protocol_fees<AccountId: Clone + PartialEq>(
  mut order: ResolvedOrder<AccountId>,
  candidates: Vec<OutputToken<AccountId>>,
  max_bps: u32,
) -> Result<ResolvedOrder<AccountId>, FeeError> {
  for (i, fee) in candidates.iter().enumerate() {
    if candidates[..i]
      .iter()
      .any(|prior| prior.token == fee.token && prior.recipient == fee.recipient)
    {
      return Err(FeeError::DuplicateFeeOutput);
    }
    let base = order.output_total(fee.token).ok_or(FeeError::Overflow)?;
    let cap = mul_div_floor(base, max_bps.into(), BPS.into()).ok_or(FeeError::Overflow)?;
    if fee.amount > cap {
      return Err(FeeError::FeeTooLarge);
    }
  }
  order.outputs.extend(candidates);
  Ok(order)
}

/// Protocol share of a skimmed fee, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeSplit(u32);

impl FeeSplit {
  pub fn new(bps: u32) -> Result<Self, FeeError> {
    if bps > BPS {
      return Err(FeeError::InvalidFee);
    }
    Ok(Self(bps))
  }

  /// `floor(amount * bps / BPS)`; the interface receives the remainder.
  pub fn protocol_share(&self, amount: Balance) -> Balance {
    // bps <= BPS keeps the quotient at or below `amount`
    mul_div_floor(amount, self.0.into(), BPS.into()).defensive_unwrap_or_default()
  }
}

/// Ledger accruals produced by one skim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkimmedFee<AccountId> {
  pub token: AssetKind,
  pub protocol_share: Balance,
  pub interface_share: Balance,
  pub interface_recipient: AccountId,
}

/// Redirects the last of the first `real_len` outputs to `engine`.
///
/// Orders with at most one real output pass through untouched.
pub fn skim_interface_fee<AccountId: Clone>(
  mut order: ResolvedOrder<AccountId>,
  real_len: usize,
  split: FeeSplit,
  engine: &AccountId,
) -> (ResolvedOrder<AccountId>, Option<SkimmedFee<AccountId>>) {
  if real_len <= 1 || real_len > order.outputs.len() {
    return (order, None);
  }
  let output = &mut order.outputs[real_len - 1];
  let protocol_share = split.protocol_share(output.amount);
  let skimmed = SkimmedFee {
    token: output.token,
    protocol_share,
    interface_share: output.amount - protocol_share,
    interface_recipient: output.recipient.clone(),
  };
  output.recipient = engine.clone();
  (order, Some(skimmed))
}
