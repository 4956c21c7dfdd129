//! Order model shared by the reactor, its resolvers and off-chain fillers.
//!
//! Every order type is decoded from its signed byte envelope and normalized into a
//! [`ResolvedOrder`], the only shape the settlement pipeline operates on.

use crate::{AssetKind, Balance};
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// Hash identifying a signed order (blake2-256 of its encoded bytes).
pub type OrderHash = [u8; 32];

/// Fields common to every order type. Immutable once signed.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct OrderInfo<AccountId> {
  /// Engine account the order is valid for
  pub reactor: AccountId,
  /// Account whose signature authorizes the order and who supplies the input
  pub offerer: AccountId,
  /// Single-use replay protection, consumed by the custody subsystem
  pub nonce: u64,
  /// Unix seconds after which the order is void; also the end of decay
  pub deadline: u64,
  /// Settlement oracle for cross-chain orders, carried but not interpreted here
  pub settlement_oracle: Option<AccountId>,
}

#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct InputToken {
  pub token: AssetKind,
  /// Resolved quantity collected from the offerer
  pub amount: Balance,
  /// Upper bound the offerer pre-approved for custody
  pub max_amount: Balance,
}

#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct OutputToken<AccountId> {
  pub token: AssetKind,
  pub amount: Balance,
  pub recipient: AccountId,
}

/// Canonical settlement unit.
///
/// `outputs` is ordered: the order's own outputs come first, fee outputs are only ever
/// appended behind them.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct ResolvedOrder<AccountId> {
  pub info: OrderInfo<AccountId>,
  pub input: InputToken,
  pub outputs: Vec<OutputToken<AccountId>>,
  pub sig: Vec<u8>,
  pub hash: OrderHash,
}

impl<AccountId> ResolvedOrder<AccountId> {
  /// Sum of output amounts denominated in `token`, `None` on overflow.
  pub fn output_total(&self, token: AssetKind) -> Option<Balance> {
    self
      .outputs
      .iter()
      .filter(|output| output.token == token)
      .try_fold(0u128, |acc, output| acc.checked_add(output.amount))
  }
}

#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct DutchInput {
  pub token: AssetKind,
  pub start_amount: Balance,
  pub end_amount: Balance,
}

#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct DutchOutput<AccountId> {
  pub token: AssetKind,
  pub start_amount: Balance,
  pub end_amount: Balance,
  pub recipient: AccountId,
}

/// Order whose amounts decay linearly from `decay_start_time` to `info.deadline`.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct DutchOrder<AccountId> {
  pub info: OrderInfo<AccountId>,
  pub decay_start_time: u64,
  pub input: DutchInput,
  pub outputs: Vec<DutchOutput<AccountId>>,
}

/// Fixed-price order; resolves to itself.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct LimitOrder<AccountId> {
  pub info: OrderInfo<AccountId>,
  pub input: InputToken,
  pub outputs: Vec<OutputToken<AccountId>>,
}

/// Order type tag carried next to the encoded order bytes.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum OrderKind {
  Dutch,
  Limit,
}

/// Wire envelope submitted by fillers.
#[derive(Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, PartialEq, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct SignedOrder {
  pub kind: OrderKind,
  /// SCALE-encoded `DutchOrder` or `LimitOrder`
  pub order: Vec<u8>,
  pub sig: Vec<u8>,
}

impl SignedOrder {
  pub fn dutch<AccountId: Encode>(order: &DutchOrder<AccountId>, sig: Vec<u8>) -> Self {
    Self {
      kind: OrderKind::Dutch,
      order: order.encode(),
      sig,
    }
  }

  pub fn limit<AccountId: Encode>(order: &LimitOrder<AccountId>, sig: Vec<u8>) -> Self {
    Self {
      kind: OrderKind::Limit,
      order: order.encode(),
      sig,
    }
  }
}
