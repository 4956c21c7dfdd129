//! Linear decay of Dutch order legs.
//!
//! Amounts move from `start_amount` at `decay_start_time` to `end_amount` at the order
//! deadline. Intermediate values are floored so the filler never owes more, and the
//! offerer never pays less, than the exact interpolation allows.

use crate::math::mul_div_floor;
use alloc::vec::Vec;
use frame::deps::frame_support::traits::Defensive;
use primitives::{Balance, DutchInput, DutchOrder, DutchOutput, InputToken, OutputToken};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayError {
  /// Deadline is not strictly after the decay start
  DeadlineBeforeStartTime,
  /// An output increases or the input decreases over time
  InvalidAmounts,
  /// Input and at least one output both decay
  InputAndOutputDecay,
}

/// Amount of a single leg at `now`.
pub fn decay(
  start_amount: Balance,
  end_amount: Balance,
  start_time: u64,
  end_time: u64,
  now: u64,
) -> Balance {
  if now >= end_time || start_amount == end_amount {
    return end_amount;
  }
  if now <= start_time {
    return start_amount;
  }
  // start_time < now < end_time, so elapsed < duration and the delta stays below the span
  let elapsed = u128::from(now - start_time);
  let duration = u128::from(end_time - start_time);
  if end_amount < start_amount {
    let delta = mul_div_floor(start_amount - end_amount, elapsed, duration).defensive_unwrap_or(0);
    start_amount - delta
  } else {
    let delta = mul_div_floor(end_amount - start_amount, elapsed, duration).defensive_unwrap_or(0);
    start_amount + delta
  }
}

/// Structural checks that do not depend on the evaluation time.
pub fn validate<AccountId>(order: &DutchOrder<AccountId>) -> Result<(), DecayError> {
  if order.info.deadline <= order.decay_start_time {
    return Err(DecayError::DeadlineBeforeStartTime);
  }
  if order.input.start_amount > order.input.end_amount {
    return Err(DecayError::InvalidAmounts);
  }
  if order
    .outputs
    .iter()
    .any(|output| output.start_amount < output.end_amount)
  {
    return Err(DecayError::InvalidAmounts);
  }
  let input_decays = order.input.start_amount != order.input.end_amount;
  let output_decays = order
    .outputs
    .iter()
    .any(|output| output.start_amount != output.end_amount);
  if input_decays && output_decays {
    return Err(DecayError::InputAndOutputDecay);
  }
  Ok(())
}

pub fn decay_input(input: &DutchInput, start_time: u64, end_time: u64, now: u64) -> InputToken {
  InputToken {
    token: input.token,
    amount: decay(
      input.start_amount,
      input.end_amount,
      start_time,
      end_time,
      now,
    ),
    max_amount: input.end_amount,
  }
}

pub fn decay_outputs<AccountId: Clone>(
  outputs: &[DutchOutput<AccountId>],
  start_time: u64,
  end_time: u64,
  now: u64,
) -> Vec<OutputToken<AccountId>> {
  outputs
    .iter()
    .map(|output| OutputToken {
      token: output.token,
      amount: decay(
        output.start_amount,
        output.end_amount,
        start_time,
        end_time,
        now,
      ),
      recipient: output.recipient.clone(),
    })
    .collect()
}
