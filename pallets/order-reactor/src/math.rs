use frame::deps::sp_core::U256;
use primitives::Balance;

/// `floor(value * numerator / denominator)` with a 256-bit intermediate.
///
/// Returns `None` when `denominator` is zero or the quotient does not fit a `Balance`.
pub fn mul_div_floor(value: Balance, numerator: u128, denominator: u128) -> Option<Balance> {
  if denominator == 0 {
    return None;
  }
  let quotient = U256::from(value)
    .saturating_mul(U256::from(numerator))
    .checked_div(U256::from(denominator))?;
  quotient.try_into().ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rounds_toward_zero() {
    assert_eq!(mul_div_floor(100, 4, 10), Some(40));
    assert_eq!(mul_div_floor(7, 1, 2), Some(3));
    assert_eq!(mul_div_floor(1, 1, 3), Some(0));
  }

  #[test]
  fn survives_u128_sized_products() {
    assert_eq!(mul_div_floor(u128::MAX, 5_000, 10_000), Some(u128::MAX / 2));
    assert_eq!(mul_div_floor(u128::MAX, 2, 1), None);
  }

  #[test]
  fn zero_denominator_is_rejected() {
    assert_eq!(mul_div_floor(10, 1, 0), None);
  }
}
