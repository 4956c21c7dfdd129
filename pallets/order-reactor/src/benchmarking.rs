extern crate alloc;

use crate::*;
use alloc::{vec, vec::Vec};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::{BoundedVec, traits::Get};
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{
  AssetKind, Balance, InputToken, LimitOrder, OrderInfo, OutputToken, SignedOrder,
  params::PRECISION,
};

const INPUT: AssetKind = AssetKind::Local(1);
const OUTPUT: AssetKind = AssetKind::Local(2);

fn limit_order<T: Config>(offerer: T::AccountId, interface: T::AccountId) -> LimitOrder<T::AccountId> {
  LimitOrder {
    info: OrderInfo {
      reactor: Pallet::<T>::account_id(),
      offerer: offerer.clone(),
      nonce: 0,
      deadline: u64::MAX,
      settlement_oracle: None,
    },
    input: InputToken {
      token: INPUT,
      amount: PRECISION,
      max_amount: PRECISION,
    },
    // two outputs so every order also pays the interface skim
    outputs: vec![
      OutputToken {
        token: OUTPUT,
        amount: PRECISION,
        recipient: offerer,
      },
      OutputToken {
        token: OUTPUT,
        amount: PRECISION / 10,
        recipient: interface,
      },
    ],
  }
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn execute_batch(n: Linear<1, { T::MaxBatchSize::get() }>) {
    let filler: T::AccountId = whitelisted_caller();
    let fill_contract: T::AccountId = account("fill_contract", 0, 0);
    let interface: T::AccountId = account("interface", 0, 0);
    let per_order: Balance = PRECISION * 2;

    T::BenchmarkHelper::ensure_funded(&fill_contract, OUTPUT, per_order * n as Balance)
      .expect("Failed to fund fill contract");
    let mut orders = Vec::new();
    for i in 0..n {
      let offerer: T::AccountId = account("offerer", i, 0);
      T::BenchmarkHelper::ensure_funded(&offerer, INPUT, per_order)
        .expect("Failed to fund offerer");
      let order = limit_order::<T>(offerer.clone(), interface.clone());
      orders.push(SignedOrder::limit(&order, T::BenchmarkHelper::sign(&offerer)));
    }
    let orders: BoundedVec<SignedOrder, T::MaxBatchSize> =
      orders.try_into().expect("n is bounded by MaxBatchSize");

    #[extrinsic_call]
    execute_batch(RawOrigin::Signed(filler), orders, fill_contract, Vec::new());
  }

  #[benchmark]
  fn set_fee_controller() {
    let owner: T::AccountId = whitelisted_caller();
    let controller: T::AccountId = account("controller", 0, 0);
    Owner::<T>::put(&owner);

    #[extrinsic_call]
    set_fee_controller(RawOrigin::Signed(owner), Some(controller.clone()));

    assert_eq!(FeeController::<T>::get(), Some(controller));
  }

  #[benchmark]
  fn transfer_ownership() {
    let owner: T::AccountId = whitelisted_caller();
    let new_owner: T::AccountId = account("owner", 0, 0);
    Owner::<T>::put(&owner);

    #[extrinsic_call]
    transfer_ownership(RawOrigin::Signed(owner), new_owner.clone());

    assert_eq!(Owner::<T>::get(), Some(new_owner));
  }

  #[benchmark]
  fn set_protocol_fee_recipient() {
    let recipient: T::AccountId = whitelisted_caller();
    let new_recipient: T::AccountId = account("recipient", 0, 0);
    ProtocolFeeRecipient::<T>::put(&recipient);

    #[extrinsic_call]
    set_protocol_fee_recipient(RawOrigin::Signed(recipient), new_recipient.clone());

    assert_eq!(ProtocolFeeRecipient::<T>::get(), Some(new_recipient));
  }

  #[benchmark]
  fn claim_fees() {
    let caller: T::AccountId = whitelisted_caller();
    let amount: Balance = PRECISION;
    T::BenchmarkHelper::ensure_funded(&Pallet::<T>::account_id(), AssetKind::Native, amount * 2)
      .expect("Failed to fund engine account");
    ClaimableFees::<T>::insert(AssetKind::Native, &caller, amount);

    #[extrinsic_call]
    claim_fees(RawOrigin::Signed(caller.clone()), AssetKind::Native);

    assert_eq!(ClaimableFees::<T>::get(AssetKind::Native, &caller), 0);
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
