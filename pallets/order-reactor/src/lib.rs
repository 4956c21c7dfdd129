//! Order Reactor Pallet
//!
//! Settlement engine for signed intent orders. Orders are resolved into a canonical
//! shape (with linear decay for Dutch orders), amended with protocol and interface fees,
//! and filled atomically by a third-party filler. Every recipient's balance is checked
//! after the fill, native currency included, and any shortfall unwinds the whole batch.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod checker;
pub mod decay;
pub mod fees;
pub mod math;
pub mod resolver;
pub mod types;
pub use types::{CustodyTransfer, ReactorCallback};

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

pub(crate) const LOG_TARGET: &str = "runtime::order-reactor";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Mint `amount` of `token` to `who`
  fn ensure_funded(
    who: &AccountId,
    token: primitives::AssetKind,
    amount: primitives::Balance,
  ) -> frame::deps::sp_runtime::DispatchResult;
  /// Signature the configured custody accepts from `offerer`
  fn sign(offerer: &AccountId) -> alloc::vec::Vec<u8>;
}

#[frame::pallet]
pub mod pallet {
  use super::{WeightInfo, LOG_TARGET};
  use crate::{
    checker::BalanceSnapshot,
    decay::DecayError,
    fees::{self, FeeError, FeeSplit, SkimmedFee},
    resolver::{self, ResolveError},
    types::{CustodyTransfer, ReactorCallback},
  };
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::{
      storage::with_storage_layer,
      traits::{
        fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
        fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
        tokens::Preservation,
        UnixTime,
      },
      PalletId,
    },
    sp_runtime::traits::{AccountIdConversion, Zero},
  };
  use frame::prelude::*;
  use primitives::{params::BPS, AssetKind, Balance, OrderHash, ResolvedOrder, SignedOrder};

  /// A resolved order together with the skim it produced, if any.
  pub type Prepared<AccountId> = (ResolvedOrder<AccountId>, Option<SkimmedFee<AccountId>>);

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native currency (AssetKind::Native)
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Local and foreign assets (AssetKind::Local / AssetKind::Foreign)
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// Wall clock used to evaluate decay
    type TimeProvider: UnixTime;

    /// Signature-gated input collection from offerers
    type Custody: CustodyTransfer<Self::AccountId>;

    /// Protocol fee source queried for the registered controller
    type FeeController: crate::types::FeeController<Self::AccountId>;

    /// Filler callback
    type Callback: ReactorCallback<Self::AccountId>;

    /// Pallet ID for the engine account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Ceiling for each protocol fee output, in basis points of same-token outputs
    #[pallet::constant]
    type MaxProtocolFeeBps: Get<u32>;

    /// Protocol share of the interface skim, in basis points
    #[pallet::constant]
    type SkimSplitBps: Get<u32>;

    /// Maximum orders per batch
    #[pallet::constant]
    type MaxBatchSize: Get<u32>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Account allowed to replace the fee controller and hand over ownership
  #[pallet::storage]
  pub type Owner<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Registered protocol fee controller; protocol fees are off while unset
  #[pallet::storage]
  pub type FeeController<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Receiver of the protocol share of skimmed fees; the skim is off while unset
  #[pallet::storage]
  pub type ProtocolFeeRecipient<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Skimmed fees held by the engine account, claimable per (token, recipient)
  #[pallet::storage]
  pub type ClaimableFees<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    AssetKind,
    Blake2_128Concat,
    T::AccountId,
    Balance,
    ValueQuery,
  >;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Order settled
    Fill {
      order_hash: OrderHash,
      filler: T::AccountId,
      offerer: T::AccountId,
      nonce: u64,
    },
    /// Interface fee redirected to the engine and credited to the claim ledger
    InterfaceFeeSkimmed {
      order_hash: OrderHash,
      token: AssetKind,
      protocol_recipient: T::AccountId,
      protocol_share: Balance,
      interface_recipient: T::AccountId,
      interface_share: Balance,
    },
    /// Skimmed fees paid out
    FeesClaimed {
      token: AssetKind,
      recipient: T::AccountId,
      amount: Balance,
    },
    FeeControllerUpdated {
      old: Option<T::AccountId>,
      new: Option<T::AccountId>,
    },
    OwnershipTransferred {
      old: T::AccountId,
      new: T::AccountId,
    },
    ProtocolFeeRecipientUpdated {
      old: T::AccountId,
      new: T::AccountId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Order bytes do not decode as the declared order type
    MalformedOrder,
    /// Order is bound to a different engine account
    InvalidReactor,
    /// The engine account cannot act as fill contract
    InvalidFillContract,
    /// Decay window ends at or before it starts
    DeadlineBeforeStartTime,
    /// Output amounts increase or the input amount decreases over time
    InvalidAmounts,
    /// Input and outputs decay in the same order
    InputAndOutputDecay,
    /// Protocol fee exceeds the configured cap
    FeeTooLarge,
    /// Fee controller returned the same (token, recipient) twice
    DuplicateFeeOutput,
    /// Skim split exceeds 10000 basis points
    InvalidFee,
    /// Caller is not the owner
    NotOwner,
    /// Caller is not the protocol fee recipient
    NotProtocolFeeRecipient,
    /// A recipient received less than its resolved outputs
    InsufficientOutput,
    /// No orders supplied
    EmptyBatch,
    /// Arithmetic overflow occurred
    ArithmeticOverflow,
  }

  impl<T> From<DecayError> for Error<T> {
    fn from(err: DecayError) -> Self {
      match err {
        DecayError::DeadlineBeforeStartTime => Error::<T>::DeadlineBeforeStartTime,
        DecayError::InvalidAmounts => Error::<T>::InvalidAmounts,
        DecayError::InputAndOutputDecay => Error::<T>::InputAndOutputDecay,
      }
    }
  }

  impl<T> From<ResolveError> for Error<T> {
    fn from(err: ResolveError) -> Self {
      match err {
        ResolveError::MalformedOrder => Error::<T>::MalformedOrder,
        ResolveError::InvalidReactor => Error::<T>::InvalidReactor,
        ResolveError::Decay(err) => err.into(),
      }
    }
  }

  impl<T> From<FeeError> for Error<T> {
    fn from(err: FeeError) -> Self {
      match err {
        FeeError::FeeTooLarge => Error::<T>::FeeTooLarge,
        FeeError::DuplicateFeeOutput => Error::<T>::DuplicateFeeOutput,
        FeeError::InvalidFee => Error::<T>::InvalidFee,
        FeeError::Overflow => Error::<T>::ArithmeticOverflow,
      }
    }
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(
        FeeSplit::new(T::SkimSplitBps::get()).is_ok(),
        "SkimSplitBps must not exceed 10000"
      );
      assert!(
        T::MaxProtocolFeeBps::get() <= BPS,
        "MaxProtocolFeeBps must not exceed 10000"
      );
      assert!(T::MaxBatchSize::get() > 0, "MaxBatchSize must be positive");
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Settle a single signed order through `fill_contract`.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::execute_batch(1))]
    pub fn execute(
      origin: OriginFor<T>,
      order: SignedOrder,
      fill_contract: T::AccountId,
      fill_data: Vec<u8>,
    ) -> DispatchResult {
      let filler = ensure_signed(origin)?;
      Self::settle(&filler, &[order], &fill_contract, &fill_data)
    }

    /// Settle several orders with one filler callback. All or nothing.
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::execute_batch(orders.len() as u32))]
    pub fn execute_batch(
      origin: OriginFor<T>,
      orders: BoundedVec<SignedOrder, T::MaxBatchSize>,
      fill_contract: T::AccountId,
      fill_data: Vec<u8>,
    ) -> DispatchResult {
      let filler = ensure_signed(origin)?;
      Self::settle(&filler, &orders, &fill_contract, &fill_data)
    }

    /// Replace or clear the protocol fee controller (owner only)
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_fee_controller())]
    pub fn set_fee_controller(
      origin: OriginFor<T>,
      controller: Option<T::AccountId>,
    ) -> DispatchResult {
      Self::ensure_owner(origin)?;
      let old = FeeController::<T>::get();
      FeeController::<T>::set(controller.clone());
      Self::deposit_event(Event::FeeControllerUpdated {
        old,
        new: controller,
      });
      Ok(())
    }

    /// Hand ownership to `new_owner` (owner only)
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::transfer_ownership())]
    pub fn transfer_ownership(origin: OriginFor<T>, new_owner: T::AccountId) -> DispatchResult {
      let old = Self::ensure_owner(origin)?;
      Owner::<T>::put(&new_owner);
      Self::deposit_event(Event::OwnershipTransferred {
        old,
        new: new_owner,
      });
      Ok(())
    }

    /// Rotate the protocol fee recipient (current recipient only).
    ///
    /// Fees already accrued stay claimable by the previous recipient.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::set_protocol_fee_recipient())]
    pub fn set_protocol_fee_recipient(
      origin: OriginFor<T>,
      new_recipient: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      ensure!(
        ProtocolFeeRecipient::<T>::get().as_ref() == Some(&who),
        Error::<T>::NotProtocolFeeRecipient
      );
      ProtocolFeeRecipient::<T>::put(&new_recipient);
      Self::deposit_event(Event::ProtocolFeeRecipientUpdated {
        old: who,
        new: new_recipient,
      });
      Ok(())
    }

    /// Withdraw the caller's skimmed fees in `token`. A zero balance is a no-op.
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::claim_fees())]
    pub fn claim_fees(origin: OriginFor<T>, token: AssetKind) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let amount = ClaimableFees::<T>::get(token, &who);
      Self::transfer(token, &Self::account_id(), &who, amount)?;
      ClaimableFees::<T>::remove(token, &who);
      Self::deposit_event(Event::FeesClaimed {
        token,
        recipient: who,
        amount,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Engine account: holds transient custody and skimmed fees.
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    pub fn balance_of(token: AssetKind, who: &T::AccountId) -> Balance {
      match token {
        AssetKind::Native => T::Currency::balance(who),
        AssetKind::Local(id) | AssetKind::Foreign(id) => T::Assets::balance(id, who),
      }
    }

    /// Move `amount` of `token`; zero amounts and self-transfers are skipped.
    pub fn transfer(
      token: AssetKind,
      from: &T::AccountId,
      to: &T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      if amount.is_zero() || from == to {
        return Ok(());
      }
      match token {
        AssetKind::Native => {
          T::Currency::transfer(from, to, amount, Preservation::Expendable)?;
        }
        AssetKind::Local(id) | AssetKind::Foreign(id) => {
          T::Assets::transfer(id, from, to, amount, Preservation::Expendable)?;
        }
      }
      Ok(())
    }

    /// Fully resolved, fee-inclusive view of `order` at the current time.
    pub fn quote(order: &SignedOrder) -> Result<ResolvedOrder<T::AccountId>, DispatchError> {
      let now = T::TimeProvider::now().as_secs();
      Self::prepare(order, &Self::account_id(), now).map(|(resolved, _)| resolved)
    }

    fn ensure_owner(origin: OriginFor<T>) -> Result<T::AccountId, DispatchError> {
      let who = ensure_signed(origin)?;
      ensure!(
        Owner::<T>::get().as_ref() == Some(&who),
        Error::<T>::NotOwner
      );
      Ok(who)
    }

    /// Resolve one order and apply the protocol fee, then the skim.
    fn prepare(
      signed: &SignedOrder,
      engine: &T::AccountId,
      now: u64,
    ) -> Result<Prepared<T::AccountId>, DispatchError> {
      let order = resolver::resolve(signed, engine, now).map_err(Error::<T>::from)?;
      let real_len = order.outputs.len();

      let order = match FeeController::<T>::get() {
        Some(controller) => {
          let candidates =
            <T::FeeController as crate::types::FeeController<_>>::fee_outputs(&controller, &order);
          fees::inject_protocol_fees(order, candidates, T::MaxProtocolFeeBps::get())
            .map_err(Error::<T>::from)?
        }
        None => order,
      };

      if ProtocolFeeRecipient::<T>::get().is_none() {
        return Ok((order, None));
      }
      let split = FeeSplit::new(T::SkimSplitBps::get()).map_err(Error::<T>::from)?;
      Ok(fees::skim_interface_fee(order, real_len, split, engine))
    }

    /// Runs the settlement pipeline inside its own storage layer.
    fn settle(
      filler: &T::AccountId,
      orders: &[SignedOrder],
      fill_contract: &T::AccountId,
      fill_data: &[u8],
    ) -> DispatchResult {
      ensure!(!orders.is_empty(), Error::<T>::EmptyBatch);
      with_storage_layer(|| Self::do_settle(filler, orders, fill_contract, fill_data))
    }

    fn do_settle(
      filler: &T::AccountId,
      orders: &[SignedOrder],
      fill_contract: &T::AccountId,
      fill_data: &[u8],
    ) -> DispatchResult {
      let engine = Self::account_id();
      ensure!(fill_contract != &engine, Error::<T>::InvalidFillContract);
      let now = T::TimeProvider::now().as_secs();

      let mut resolved = Vec::with_capacity(orders.len());
      let mut skims = Vec::with_capacity(orders.len());
      for signed in orders {
        let (order, skim) = Self::prepare(signed, &engine, now)?;
        log::debug!(
          target: LOG_TARGET,
          "resolved order {:?}: input {:?}, {} outputs",
          order.hash,
          order.input,
          order.outputs.len()
        );
        resolved.push(order);
        skims.push(skim);
      }

      let snapshot = BalanceSnapshot::take(&resolved, &engine, Self::balance_of)
        .ok_or(Error::<T>::ArithmeticOverflow)?;

      for order in &resolved {
        T::Custody::collect(order, &engine)?;
        Self::transfer(
          order.input.token,
          &engine,
          fill_contract,
          order.input.amount,
        )?;
      }

      T::Callback::reactor_callback(fill_contract, &resolved, filler, fill_data)?;

      snapshot.verify(Self::balance_of).map_err(|shortfall| {
        log::warn!(
          target: LOG_TARGET,
          "fill by {:?} short for {:?} of {:?}: expected {}, received {}",
          filler,
          shortfall.recipient,
          shortfall.token,
          shortfall.expected,
          shortfall.received
        );
        Error::<T>::InsufficientOutput
      })?;

      for (order, skim) in resolved.iter().zip(skims) {
        if let Some(skim) = skim {
          Self::accrue(order.hash, skim)?;
        }
        Self::deposit_event(Event::Fill {
          order_hash: order.hash,
          filler: filler.clone(),
          offerer: order.info.offerer.clone(),
          nonce: order.info.nonce,
        });
      }
      log::debug!(
        target: LOG_TARGET,
        "settled {} orders via {:?}",
        resolved.len(),
        fill_contract
      );
      Ok(())
    }

    /// Credits both shares of a skim to the claim ledger.
    fn accrue(order_hash: OrderHash, skim: SkimmedFee<T::AccountId>) -> DispatchResult {
      let protocol_recipient =
        ProtocolFeeRecipient::<T>::get().ok_or(Error::<T>::NotProtocolFeeRecipient)?;
      for (recipient, share) in [
        (&protocol_recipient, skim.protocol_share),
        (&skim.interface_recipient, skim.interface_share),
      ] {
        ClaimableFees::<T>::try_mutate(skim.token, recipient, |balance| -> DispatchResult {
          *balance = balance
            .checked_add(share)
            .ok_or(Error::<T>::ArithmeticOverflow)?;
          Ok(())
        })?;
      }
      Self::deposit_event(Event::InterfaceFeeSkimmed {
        order_hash,
        token: skim.token,
        protocol_recipient,
        protocol_share: skim.protocol_share,
        interface_recipient: skim.interface_recipient,
        interface_share: skim.interface_share,
      });
      Ok(())
    }
  }

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub owner: Option<T::AccountId>,
    pub fee_controller: Option<T::AccountId>,
    pub protocol_fee_recipient: Option<T::AccountId>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      Owner::<T>::set(self.owner.clone());
      FeeController::<T>::set(self.fee_controller.clone());
      ProtocolFeeRecipient::<T>::set(self.protocol_fee_recipient.clone());
      // Engine account survives zero native balance between settlements
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }
}
