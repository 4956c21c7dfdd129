//! Pre/post balance verification for a settlement batch.

use alloc::collections::btree_map::BTreeMap;
use primitives::{AssetKind, Balance, ResolvedOrder};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Entry {
  before: Balance,
  expected: Balance,
}

/// A pair that did not receive its expected delta.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shortfall<AccountId> {
  pub token: AssetKind,
  pub recipient: AccountId,
  pub expected: Balance,
  /// Net increase observed, zero when the balance went down
  pub received: Balance,
}

/// Balances of every (token, recipient) pair touched by a batch, taken before custody moves.
#[derive(Clone, Debug)]
pub struct BalanceSnapshot<AccountId> {
  entries: BTreeMap<(AssetKind, AccountId), Entry>,
}

impl<AccountId: Clone + Ord> BalanceSnapshot<AccountId> {
  /// Aggregates expected deltas across `orders` and records current balances.
  ///
  /// The engine's balance in every input and output token is tracked with no expected
  /// gain beyond its skims, so neither custody forwarding nor the filler can dip into
  /// fees it already holds.
  /// Returns `None` when an aggregated expectation overflows.
  pub fn take<F>(orders: &[ResolvedOrder<AccountId>], engine: &AccountId, balance_of: F) -> Option<Self>
  where
    F: Fn(AssetKind, &AccountId) -> Balance,
  {
    let mut entries: BTreeMap<(AssetKind, AccountId), Entry> = BTreeMap::new();
    for order in orders {
      for output in &order.outputs {
        let entry = entries
          .entry((output.token, output.recipient.clone()))
          .or_default();
        entry.expected = entry.expected.checked_add(output.amount)?;
      }
    }
    for order in orders {
      let tokens = order.outputs.iter().map(|output| output.token);
      for token in core::iter::once(order.input.token).chain(tokens) {
        entries.entry((token, engine.clone())).or_default();
      }
    }
    for ((token, who), entry) in entries.iter_mut() {
      entry.before = balance_of(*token, who);
    }
    Some(Self { entries })
  }

  #[cfg(test)]
  fn len(&self) -> usize {
    self.entries.len()
  }

  #[cfg(test)]
  fn expected(&self, token: AssetKind, who: &AccountId) -> Option<Balance> {
    self
      .entries
      .get(&(token, who.clone()))
      .map(|entry| entry.expected)
  }

  /// Checks `after >= before + expected` for every pair, reporting the first failure.
  pub fn verify<F>(&self, balance_of: F) -> Result<(), Shortfall<AccountId>>
  where
    F: Fn(AssetKind, &AccountId) -> Balance,
  {
    for ((token, who), entry) in self.entries.iter() {
      let after = balance_of(*token, who);
      let satisfied = entry
        .before
        .checked_add(entry.expected)
        .is_some_and(|target| after >= target);
      if !satisfied {
        return Err(Shortfall {
          token: *token,
          recipient: who.clone(),
          expected: entry.expected,
          received: after.saturating_sub(entry.before),
        });
      }
    }
    Ok(())
  }
}
