//! Order resolution: decode a signed envelope and normalize it into a [`ResolvedOrder`].

use crate::decay::{self, DecayError};
use codec::{Decode, DecodeAll};
use polkadot_sdk::sp_io::hashing::blake2_256;
use primitives::{DutchOrder, LimitOrder, OrderKind, ResolvedOrder, SignedOrder};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveError {
  /// Order bytes do not decode as the tagged order type
  MalformedOrder,
  /// Order names a different engine account
  InvalidReactor,
  Decay(DecayError),
}

impl From<DecayError> for ResolveError {
  fn from(err: DecayError) -> Self {
    ResolveError::Decay(err)
  }
}

/// Converts one order encoding into the canonical settlement shape.
pub trait OrderResolver<AccountId> {
  fn resolve(order: &[u8], sig: &[u8], now: u64) -> Result<ResolvedOrder<AccountId>, ResolveError>;
}

/// Dutch auction orders with linear amount decay.
pub struct DutchResolver;

impl<AccountId: Decode + Clone> OrderResolver<AccountId> for DutchResolver {
  fn resolve(order: &[u8], sig: &[u8], now: u64) -> Result<ResolvedOrder<AccountId>, ResolveError> {
    let dutch = DutchOrder::<AccountId>::decode_all(&mut &order[..])
      .map_err(|_| ResolveError::MalformedOrder)?;
    decay::validate(&dutch)?;

    let start = dutch.decay_start_time;
    let end = dutch.info.deadline;
    Ok(ResolvedOrder {
      input: decay::decay_input(&dutch.input, start, end, now),
      outputs: decay::decay_outputs(&dutch.outputs, start, end, now),
      info: dutch.info,
      sig: sig.to_vec(),
      hash: blake2_256(order),
    })
  }
}

/// Fixed-price orders, resolved as written.
pub struct LimitResolver;

impl<AccountId: Decode> OrderResolver<AccountId> for LimitResolver {
  fn resolve(order: &[u8], sig: &[u8], _now: u64) -> Result<ResolvedOrder<AccountId>, ResolveError> {
    let limit = LimitOrder::<AccountId>::decode_all(&mut &order[..])
      .map_err(|_| ResolveError::MalformedOrder)?;
    Ok(ResolvedOrder {
      info: limit.info,
      input: limit.input,
      outputs: limit.outputs,
      sig: sig.to_vec(),
      hash: blake2_256(order),
    })
  }
}

/// Resolves a signed envelope for the engine account `reactor` at time `now`.
pub fn resolve<AccountId: Decode + Clone + PartialEq>(
  signed: &SignedOrder,
  reactor: &AccountId,
  now: u64,
) -> Result<ResolvedOrder<AccountId>, ResolveError> {
  let resolved: ResolvedOrder<AccountId> = match signed.kind {
    OrderKind::Dutch => DutchResolver::resolve(&signed.order, &signed.sig, now)?,
    OrderKind::Limit => LimitResolver::resolve(&signed.order, &signed.sig, now)?,
  };
  if &resolved.info.reactor != reactor {
    return Err(ResolveError::InvalidReactor);
  }
  Ok(resolved)
}
