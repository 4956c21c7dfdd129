//! Adapter traits at the pallet's trust boundaries.
//!
//! The reactor never verifies signatures, permits or filler logic itself. Each of those
//! is a runtime-provided collaborator, and only post-settlement balances are trusted.

use alloc::vec::Vec;
use frame::prelude::*;
use primitives::{OutputToken, ResolvedOrder};

/// Source of protocol fee outputs for a resolved order.
///
/// `controller` is the account currently registered in storage, letting one
/// implementation serve several governance-selected controllers. Results are untrusted
/// and still pass the cap and duplicate checks.
pub trait FeeController<AccountId> {
  fn fee_outputs(controller: &AccountId, order: &ResolvedOrder<AccountId>) -> Vec<OutputToken<AccountId>>;
}

/// No protocol fees.
impl<AccountId> FeeController<AccountId> for () {
  fn fee_outputs(_: &AccountId, _: &ResolvedOrder<AccountId>) -> Vec<OutputToken<AccountId>> {
    Vec::new()
  }
}

/// Signature-gated input custody.
///
/// `collect` moves `order.input.amount` of `order.input.token` from the offerer to `to`.
/// Implementations verify the signature, consume the nonce and enforce the deadline.
pub trait CustodyTransfer<AccountId> {
  fn collect(order: &ResolvedOrder<AccountId>, to: &AccountId) -> DispatchResult;
}

/// Filler entry point invoked once per settlement with the whole batch.
///
/// The fill contract already holds every order's input when called and must deliver
/// the resolved outputs before returning.
pub trait ReactorCallback<AccountId> {
  fn reactor_callback(
    fill_contract: &AccountId,
    orders: &[ResolvedOrder<AccountId>],
    filler: &AccountId,
    fill_data: &[u8],
  ) -> DispatchResult;
}
