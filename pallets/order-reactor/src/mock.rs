use crate as pallet_order_reactor;

use codec::Encode;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  storage::unhashed,
  traits::{ConstU32, ConstU128, Get, UnixTime},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{
  AssetKind, Balance, OutputToken, ResolvedOrder,
  ecosystem::{pallet_ids, params},
};
use std::cell::RefCell;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const FILL_CONTRACT: u64 = 3;
pub const CAROL: u64 = 4;
pub const DAVE: u64 = 5;
pub const OWNER: u64 = 10;
pub const PROTOCOL: u64 = 11;
pub const CONTROLLER: u64 = 12;

pub const USDC: AssetKind = AssetKind::Local(1);
pub const WETH: AssetKind = AssetKind::Local(2);
pub const BRIDGED: AssetKind = AssetKind::Foreign(3);

pub const UNIT: Balance = params::PRECISION;
pub const INITIAL_BALANCE: Balance = 1_000_000 * UNIT;
pub const START_TIME: u64 = 1_700_000_000;

/// How the mock filler settles outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
  /// Pay every output exactly
  Exact,
  /// Pay every output, shaving `by` off the last one of the batch
  Short { by: Balance },
  /// Pay every output, adding `by` to the last one of the batch
  Over { by: Balance },
  /// Keep everything
  Nothing,
}

thread_local! {
    pub static NOW: RefCell<u64> = const { RefCell::new(START_TIME) };
    pub static FEE_OUTPUTS: RefCell<Vec<OutputToken<u64>>> = const { RefCell::new(Vec::new()) };
    pub static FILL_MODE: RefCell<FillMode> = const { RefCell::new(FillMode::Exact) };
    // (fill contract, orders, filler, fill data) per callback
    pub static CALLBACKS: RefCell<Vec<(u64, usize, u64, Vec<u8>)>> = const { RefCell::new(Vec::new()) };
}

pub fn set_now(now: u64) {
  NOW.with(|n| *n.borrow_mut() = now);
}

pub fn set_fee_outputs(outputs: Vec<OutputToken<u64>>) {
  FEE_OUTPUTS.with(|f| *f.borrow_mut() = outputs);
}

pub fn set_fill_mode(mode: FillMode) {
  FILL_MODE.with(|m| *m.borrow_mut() = mode);
}

pub fn callbacks() -> Vec<(u64, usize, u64, Vec<u8>)> {
  CALLBACKS.with(|c| c.borrow().clone())
}

fn reset_mock_adapters() {
  set_now(START_TIME);
  set_fee_outputs(Vec::new());
  set_fill_mode(FillMode::Exact);
  CALLBACKS.with(|c| c.borrow_mut().clear());
}

/// Signature accepted by [`MockCustody`] for `who`.
pub fn sign(who: u64) -> Vec<u8> {
  who.encode()
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    OrderReactor: pallet_order_reactor,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

pub struct MockTime;
impl UnixTime for MockTime {
  fn now() -> core::time::Duration {
    core::time::Duration::from_secs(NOW.with(|n| *n.borrow()))
  }
}

/// Permit stand-in: the signature is the encoded offerer, nonces live in unhashed
/// storage so they roll back with the settlement.
pub struct MockCustody;
impl crate::CustodyTransfer<u64> for MockCustody {
  fn collect(order: &ResolvedOrder<u64>, to: &u64) -> DispatchResult {
    let offerer = &order.info.offerer;
    if order.sig != sign(*offerer) {
      return Err(DispatchError::Other("InvalidSignature"));
    }
    if MockTime::now().as_secs() > order.info.deadline {
      return Err(DispatchError::Other("OrderExpired"));
    }
    if order.input.amount > order.input.max_amount {
      return Err(DispatchError::Other("PermitExceeded"));
    }
    let key = (b"mock/nonce", offerer, order.info.nonce).encode();
    if unhashed::exists(&key) {
      return Err(DispatchError::Other("NonceUsed"));
    }
    unhashed::put(&key, &true);
    OrderReactor::transfer(order.input.token, offerer, to, order.input.amount)
  }
}

pub struct MockFeeController;
impl crate::types::FeeController<u64> for MockFeeController {
  fn fee_outputs(controller: &u64, _order: &ResolvedOrder<u64>) -> Vec<OutputToken<u64>> {
    if *controller != CONTROLLER {
      return Vec::new();
    }
    FEE_OUTPUTS.with(|f| f.borrow().clone())
  }
}

/// Filler paying resolved outputs out of the fill contract's own balances.
pub struct MockCallback;
impl crate::ReactorCallback<u64> for MockCallback {
  fn reactor_callback(
    fill_contract: &u64,
    orders: &[ResolvedOrder<u64>],
    filler: &u64,
    fill_data: &[u8],
  ) -> DispatchResult {
    CALLBACKS.with(|c| {
      c.borrow_mut()
        .push((*fill_contract, orders.len(), *filler, fill_data.to_vec()))
    });
    let mode = FILL_MODE.with(|m| *m.borrow());
    if mode == FillMode::Nothing {
      return Ok(());
    }
    let total = orders.iter().map(|o| o.outputs.len()).sum::<usize>();
    let mut paid = 0;
    for order in orders {
      for output in &order.outputs {
        paid += 1;
        let amount = match mode {
          FillMode::Short { by } if paid == total => output.amount.saturating_sub(by),
          FillMode::Over { by } if paid == total => output.amount.saturating_add(by),
          _ => output.amount,
        };
        OrderReactor::transfer(output.token, fill_contract, &output.recipient, amount)?;
      }
    }
    Ok(())
  }
}

pub struct OrderReactorPalletId;
impl Get<PalletId> for OrderReactorPalletId {
  fn get() -> PalletId {
    PalletId(*pallet_ids::ORDER_REACTOR_PALLET_ID)
  }
}

impl pallet_order_reactor::Config for Test {
  type Currency = Balances;
  type Assets = Assets;
  type TimeProvider = MockTime;
  type Custody = MockCustody;
  type FeeController = MockFeeController;
  type Callback = MockCallback;
  type PalletId = OrderReactorPalletId;
  type MaxProtocolFeeBps = ConstU32<{ params::MAX_PROTOCOL_FEE_BPS }>;
  type SkimSplitBps = ConstU32<{ params::SKIM_SPLIT_BPS }>;
  type MaxBatchSize = ConstU32<{ params::MAX_BATCH_SIZE }>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = OrderReactorBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct OrderReactorBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for OrderReactorBenchmarkHelper {
  fn ensure_funded(who: &u64, token: AssetKind, amount: Balance) -> DispatchResult {
    use polkadot_sdk::frame_support::traits::{fungible, fungibles};
    match token {
      AssetKind::Native => {
        <Balances as fungible::Mutate<u64>>::mint_into(who, amount)?;
      }
      AssetKind::Local(id) | AssetKind::Foreign(id) => {
        <Assets as fungibles::Mutate<u64>>::mint_into(id, who, amount)?;
      }
    }
    Ok(())
  }

  fn sign(offerer: &u64) -> Vec<u8> {
    sign(*offerer)
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let funded = [ALICE, DAVE, FILL_CONTRACT];
  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: funded
      .iter()
      .map(|who| (*who, INITIAL_BALANCE))
      .chain([(BOB, INITIAL_BALANCE), (OWNER, UNIT), (PROTOCOL, UNIT)])
      .collect(),
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    // Sufficient assets so fresh recipients need no native deposit
    assets: vec![(1, OWNER, true, 1), (2, OWNER, true, 1), (3, OWNER, true, 1)],
    metadata: vec![],
    accounts: [1u32, 2, 3]
      .iter()
      .flat_map(|id| funded.iter().map(move |who| (*id, *who, INITIAL_BALANCE)))
      .collect(),
    reserves: vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_order_reactor::GenesisConfig::<Test> {
    owner: Some(OWNER),
    fee_controller: None,
    protocol_fee_recipient: Some(PROTOCOL),
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| {
    System::set_block_number(1);
    reset_mock_adapters();
  });
  ext
}
