#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn execute_batch(n: u32) -> Weight;
	fn set_fee_controller() -> Weight;
	fn transfer_ownership() -> Weight;
	fn set_protocol_fee_recipient() -> Weight;
	fn claim_fees() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	/// Per order: decode, two fee lookups, custody pull and forward, snapshot and recheck
	/// of up to eight (token, account) pairs, two ledger writes.
	fn execute_batch(n: u32) -> Weight {
		Weight::from_parts(40_000_000, 4000)
			.saturating_add(Weight::from_parts(120_000_000, 12000).saturating_mul(n.into()))
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().reads((20_u64).saturating_mul(n.into())))
			.saturating_add(T::DbWeight::get().writes((8_u64).saturating_mul(n.into())))
	}
	fn set_fee_controller() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn transfer_ownership() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_protocol_fee_recipient() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn claim_fees() -> Weight {
		Weight::from_parts(45_000_000, 3600)
			.saturating_add(T::DbWeight::get().reads(3))
			.saturating_add(T::DbWeight::get().writes(3))
	}
}

impl WeightInfo for () {
	fn execute_batch(n: u32) -> Weight {
		Weight::from_parts(40_000_000, 4000)
			.saturating_add(Weight::from_parts(120_000_000, 12000).saturating_mul(n.into()))
	}
	fn set_fee_controller() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn transfer_ownership() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn set_protocol_fee_recipient() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn claim_fees() -> Weight {
		Weight::from_parts(45_000_000, 3600)
	}
}
