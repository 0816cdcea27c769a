//! DaoVsDao Pallet
//!
//! Competitive game played on per-realm triangular pyramids. Row `i` of a realm holds `i + 1`
//! cells and the apex is row `0`. Players enter by paying a participation fee and claiming an
//! empty cell, then move one cell at a time towards the apex. Moving onto an occupied cell is an
//! attack: if the attacker is worth at least as much as the occupant, a percentage of the
//! occupant's balance and sponsorships is slashed, taxed and handed to the attacker, and the two
//! players exchange cells.
//!
//! Third parties may sponsor a player. Sponsored tokens are escrowed by the pallet account and
//! accounted as shares of the player's sponsorship pool; each sponsorship is represented by a
//! certificate obtained from a [`CertificateIssuer`], and only the configured certificate emitter
//! may redeem shares back into tokens.
//!
//! Every player also accrues a per-block emission of game tokens, minted when the player moves or
//! collects it.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::{
  Balance, CertificateIssuer, Coordinates, GameData, PlayerData, PlayerRecord, SlashOutcome,
};

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Log target of the pallet
pub const LOG_TARGET: &str = "runtime::dao-vs-dao";

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::{vec, vec::Vec};
  use frame::deps::{
    frame_support::traits::{
      fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
      fungibles::{Inspect, Mutate},
      tokens::{Fortitude, Precision, Preservation},
    },
    sp_core::U256,
    sp_runtime::{
      ArithmeticError,
      traits::{AccountIdConversion, Saturating, TrailingZeroInput, UniqueSaturatedInto, Zero},
    },
  };
  use frame::prelude::*;
  use primitives::{CertificateId, Step, percent_of};

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Assets ledger holding the game token
    type Assets: Inspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + Mutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// Native currency the participation fee is paid in
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Origin that can add realms and tune the game parameters
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Issuer of sponsorship certificates
    type CertificateIssuer: CertificateIssuer<Self::AccountId, Balance>;

    /// Pallet ID of the escrow account
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Asset id of the game token
    #[pallet::constant]
    type GameAsset: Get<u32>;

    /// Recipient of slashing taxes and of the non-referral part of participation fees
    #[pallet::constant]
    type TreasuryAccount: Get<Self::AccountId>;

    /// Maximum number of realms
    #[pallet::constant]
    type MaxRealms: Get<u32>;

    /// Maximum number of cells in a row, which also bounds the number of rows of a realm
    #[pallet::constant]
    type MaxRowLength: Get<u32>;

    /// Blocks a player has to wait between two moves
    #[pallet::constant]
    type AttackCooldown: Get<BlockNumberFor<Self>>;

    /// Blocks during which a slashed player cannot be attacked again
    #[pallet::constant]
    type AttackedCooldown: Get<BlockNumberFor<Self>>;

    /// Default slashing percentage
    #[pallet::constant]
    type DefaultSlashingPercentage: Get<u8>;

    /// Default percentage of each slash paid to the treasury
    #[pallet::constant]
    type DefaultSlashingTax: Get<u8>;

    /// Default percentage of the participation fee credited to the referrer
    #[pallet::constant]
    type DefaultReferrerPercentage: Get<u8>;

    /// Default participation fee in native currency
    #[pallet::constant]
    type DefaultParticipationFee: Get<Balance>;

    /// Default game tokens emitted to every player per block
    #[pallet::constant]
    type DefaultEmissionPerBlock: Get<Balance>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  #[pallet::storage_version(STORAGE_VERSION)]
  pub struct Pallet<T>(_);

  /// The current storage version.
  const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

  /// Number of realms created so far
  #[pallet::storage]
  #[pallet::getter(fn realm_count)]
  pub type RealmCount<T: Config> = StorageValue<_, u32, ValueQuery>;

  /// Number of rows of each realm
  #[pallet::storage]
  #[pallet::getter(fn realm_rows)]
  pub type RealmRows<T: Config> = StorageMap<_, Twox64Concat, u32, u32, ValueQuery>;

  /// Cells of a row: `(realm, row) -> [occupant; row + 1]`
  #[pallet::storage]
  pub type Lands<T: Config> = StorageDoubleMap<
    _,
    Twox64Concat,
    u32,
    Twox64Concat,
    u32,
    BoundedVec<Option<T::AccountId>, T::MaxRowLength>,
    ValueQuery,
  >;

  /// Registered players
  #[pallet::storage]
  #[pallet::getter(fn player)]
  pub type Players<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, PlayerRecord<BlockNumberFor<T>>>;

  /// Number of registered players
  #[pallet::storage]
  #[pallet::getter(fn player_count)]
  pub type PlayerCount<T: Config> = StorageValue<_, u32, ValueQuery>;

  /// Players in join order
  #[pallet::storage]
  pub type PlayersByIndex<T: Config> = StorageMap<_, Twox64Concat, u32, T::AccountId>;

  /// Outstanding shares of each player's sponsorship pool
  #[pallet::storage]
  #[pallet::getter(fn sponsorship_shares)]
  pub type SponsorshipShares<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, Balance, ValueQuery>;

  /// Current slashing percentage (can be updated by governance)
  #[pallet::storage]
  #[pallet::getter(fn slashing_percentage)]
  pub type SlashingPercentage<T: Config> =
    StorageValue<_, u8, ValueQuery, T::DefaultSlashingPercentage>;

  /// Current slashing tax (can be updated by governance)
  #[pallet::storage]
  #[pallet::getter(fn slashing_tax)]
  pub type SlashingTax<T: Config> = StorageValue<_, u8, ValueQuery, T::DefaultSlashingTax>;

  /// Current referrer percentage (can be updated by governance)
  #[pallet::storage]
  #[pallet::getter(fn referrer_percentage)]
  pub type ReferrerPercentage<T: Config> =
    StorageValue<_, u8, ValueQuery, T::DefaultReferrerPercentage>;

  /// Current participation fee (can be updated by governance)
  #[pallet::storage]
  #[pallet::getter(fn participation_fee)]
  pub type ParticipationFee<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultParticipationFee>;

  /// Current per-player emission per block (can be updated by governance)
  #[pallet::storage]
  #[pallet::getter(fn emission_per_block)]
  pub type EmissionPerBlock<T: Config> =
    StorageValue<_, Balance, ValueQuery, T::DefaultEmissionPerBlock>;

  /// Emission accrued per player up to a block, checkpointed whenever the rate changes
  #[pallet::storage]
  pub type EmissionCheckpoint<T: Config> =
    StorageValue<_, (Balance, BlockNumberFor<T>), ValueQuery>;

  /// Account allowed to redeem sponsorship shares
  #[pallet::storage]
  #[pallet::getter(fn certificate_emitter)]
  pub type CertificateEmitter<T: Config> = StorageValue<_, T::AccountId>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A realm with a single empty cell was created
    RealmAdded { realm: u32 },
    /// A row was appended to a realm
    RowAdded { realm: u32, row: u32 },
    /// A new player entered the game
    UserPlaced {
      who: T::AccountId,
      coords: Coordinates,
      fee: Balance,
      referrer: Option<T::AccountId>,
      referrer_reward: Balance,
    },
    /// A player moved, possibly exchanging cells with a defeated defender
    Swapped {
      who: T::AccountId,
      from: Coordinates,
      to: Coordinates,
      defender: Option<T::AccountId>,
    },
    /// A defender was slashed by an attacker
    Slashed {
      attacker: T::AccountId,
      defender: T::AccountId,
      subtracted_from_attacked_balance: Balance,
      subtracted_from_attacked_sponsorships: Balance,
      slashing_taxes: Balance,
      added_to_attacker_balance: Balance,
      added_to_attacker_sponsorships: Balance,
    },
    /// Tokens were escrowed in a player's sponsorship pool
    Sponsored {
      sponsor: T::AccountId,
      beneficiary: T::AccountId,
      amount: Balance,
      shares: Balance,
      certificate_id: CertificateId,
    },
    /// Sponsorship shares were converted back into tokens
    SharesRedeemed {
      certificate_owner: T::AccountId,
      beneficiary: T::AccountId,
      shares: Balance,
      value: Balance,
    },
    /// Referral rewards were paid out
    ReferralRewardsClaimed { who: T::AccountId, amount: Balance },
    /// Slashing percentage updated
    SlashingPercentageUpdated { old_percentage: u8, new_percentage: u8 },
    /// Slashing tax updated
    SlashingTaxUpdated { old_tax: u8, new_tax: u8 },
    /// Participation fee updated
    ParticipationFeeUpdated { old_fee: Balance, new_fee: Balance },
    /// Referrer percentage updated
    ReferrerPercentageUpdated { old_percentage: u8, new_percentage: u8 },
    /// Certificate emitter updated
    SponsorshipCertificateEmitterUpdated {
      old_emitter: Option<T::AccountId>,
      new_emitter: T::AccountId,
    },
    /// Emission per block updated
    EmissionPerBlockUpdated { old_emission: Balance, new_emission: Balance },
    /// Accrued emission was minted to a player
    EmissionCollected { who: T::AccountId, amount: Balance },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// Realm index is past the last realm
    RealmOutOfBound,
    /// Row index is past the last row of the realm
    RowOutOfBound,
    /// Column index is past the end of the row
    ColumnOutOfBound,
    /// Realm limit reached
    TooManyRealms,
    /// Row length limit reached
    TooManyRows,
    /// Target cell is already occupied
    CellOccupied,
    /// Caller is already registered
    AlreadyAPlayer,
    /// Account is not a registered player
    NotAPlayer,
    /// Caller cannot cover the participation fee
    ParticipationFeeNotPaid,
    /// Caller moved too recently
    CannotAttackYet,
    /// Defender was slashed too recently
    CannotBeAttackedYet,
    /// Target cell is not a neighbour of the caller's cell
    SwapTooFar,
    /// Target cell is further from the apex than the caller's cell
    CannotSwapWithHigherRow,
    /// Target cell is the caller's own cell
    CannotSwapWithSelf,
    /// Defender is worth more than the caller
    TargetHasHigherWorth,
    /// Zero amount not allowed
    ZeroAmount,
    /// Sponsor does not hold enough game tokens
    InsufficientBalanceToSponsor,
    /// No certificate emitter has been configured
    EmitterNotSet,
    /// Only the certificate emitter may redeem shares
    OnlyEmitterCanRedeem,
    /// Zero shares cannot be redeemed
    CannotRedeemZeroShares,
    /// More shares requested than outstanding
    InsufficientShares,
    /// Pool shares are outstanding but the pool holds no tokens; they must be redeemed first
    SponsorshipPoolDepleted,
    /// No referral rewards to claim
    NothingToClaim,
    /// No emission accrued since the last collection
    NoEmissionAccrued,
    /// Slashing percentage above 100
    InvalidSlashingPercentage,
    /// Slashing tax above 100
    InvalidSlashingTax,
    /// Referrer percentage above 100
    InvalidReferrerPercentage,
    /// The all-zero account cannot be the emitter
    InvalidEmitter,
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn integrity_test() {
      assert!(T::MaxRowLength::get() > 0, "MaxRowLength must allow the apex row");
      assert!(T::DefaultSlashingPercentage::get() <= 100);
      assert!(T::DefaultSlashingTax::get() <= 100);
      assert!(T::DefaultReferrerPercentage::get() <= 100);
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Create a new realm holding a single empty cell (governance only)
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::add_realm())]
    pub fn add_realm(origin: OriginFor<T>) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      Self::do_add_realm().map(|_| ())
    }

    /// Append a row one cell longer than the current last row
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::add_row())]
    pub fn add_row(origin: OriginFor<T>, realm: u32) -> DispatchResult {
      ensure_signed(origin)?;
      Self::do_add_row(realm).map(|_| ())
    }

    /// Enter the game on an empty cell, paying the participation fee
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::place_user())]
    pub fn place_user(
      origin: OriginFor<T>,
      coords: Coordinates,
      referrer: Option<T::AccountId>,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;

      ensure!(
        Self::cell_at(&coords)?.is_none(),
        Error::<T>::CellOccupied
      );
      ensure!(
        !Players::<T>::contains_key(&who),
        Error::<T>::AlreadyAPlayer
      );
      let fee = ParticipationFee::<T>::get();
      ensure!(
        T::Currency::reducible_balance(&who, Preservation::Expendable, Fortitude::Polite) >= fee,
        Error::<T>::ParticipationFeeNotPaid
      );

      let referrer = referrer.filter(|r| r != &who && Players::<T>::contains_key(r));
      let referrer_reward = match referrer {
        Some(_) => percent_of(fee, ReferrerPercentage::<T>::get()),
        None => Zero::zero(),
      };
      let treasury_share = fee.saturating_sub(referrer_reward);

      if !referrer_reward.is_zero() {
        T::Currency::transfer(
          &who,
          &Self::account_id(),
          referrer_reward,
          Preservation::Expendable,
        )?;
      }
      if !treasury_share.is_zero() {
        T::Currency::transfer(
          &who,
          &T::TreasuryAccount::get(),
          treasury_share,
          Preservation::Expendable,
        )?;
      }
      if let Some(referrer) = &referrer {
        Players::<T>::try_mutate(referrer, |maybe_record| -> DispatchResult {
          let record = maybe_record.as_mut().ok_or(Error::<T>::NotAPlayer)?;
          record.claimable = record
            .claimable
            .checked_add(referrer_reward)
            .ok_or(ArithmeticError::Overflow)?;
          Ok(())
        })?;
      }

      let index = PlayerCount::<T>::get();
      Players::<T>::insert(
        &who,
        PlayerRecord::<BlockNumberFor<T>>::new(coords, Self::emission_index()),
      );
      PlayersByIndex::<T>::insert(index, &who);
      PlayerCount::<T>::put(index.saturating_add(1));
      Self::set_cell(&coords, Some(who.clone()));

      log::debug!(
        target: LOG_TARGET,
        "player {:?} placed at {:?}, fee {} (referrer reward {})",
        who, coords, fee, referrer_reward,
      );

      Self::deposit_event(Event::UserPlaced {
        who,
        coords,
        fee,
        referrer,
        referrer_reward,
      });

      Self::grow_if_full(coords.realm)
    }

    /// Move to a neighbouring cell, attacking its occupant if there is one
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::swap())]
    pub fn swap(origin: OriginFor<T>, target: Coordinates) -> DispatchResult {
      let who = ensure_signed(origin)?;

      let occupant = Self::cell_at(&target)?;
      let mut attacker = Players::<T>::get(&who).ok_or(Error::<T>::NotAPlayer)?;
      let now = frame_system::Pallet::<T>::block_number();
      if let Some(last) = attacker.last_attack {
        ensure!(
          now >= last.saturating_add(T::AttackCooldown::get()),
          Error::<T>::CannotAttackYet
        );
      }

      let from = attacker.coords;
      match from.step_to(&target) {
        Step::Stay => return Err(Error::<T>::CannotSwapWithSelf.into()),
        Step::TooFar => return Err(Error::<T>::SwapTooFar.into()),
        Step::AwayFromApex => return Err(Error::<T>::CannotSwapWithHigherRow.into()),
        Step::SameRow | Step::TowardsApex => {}
      }

      Self::settle_emission(&who, &mut attacker)?;
      match &occupant {
        Some(defender_id) => {
          let mut defender = Players::<T>::get(defender_id).ok_or(Error::<T>::NotAPlayer)?;
          if let Some(last) = defender.last_attacked {
            ensure!(
              now >= last.saturating_add(T::AttackedCooldown::get()),
              Error::<T>::CannotBeAttackedYet
            );
          }
          Self::settle_emission(defender_id, &mut defender)?;

          let outcome = Self::slash(&who, &mut attacker, defender_id, &mut defender)?;

          defender.last_attacked = Some(now);
          defender.coords = from;
          Players::<T>::insert(defender_id, defender);
          Self::set_cell(&from, Some(defender_id.clone()));

          Self::deposit_event(Event::Slashed {
            attacker: who.clone(),
            defender: defender_id.clone(),
            subtracted_from_attacked_balance: outcome.subtracted_from_attacked_balance,
            subtracted_from_attacked_sponsorships: outcome.subtracted_from_attacked_sponsorships,
            slashing_taxes: outcome.slashing_taxes,
            added_to_attacker_balance: outcome.added_to_attacker_balance,
            added_to_attacker_sponsorships: outcome.added_to_attacker_sponsorships,
          });
        }
        None => Self::set_cell(&from, None),
      }

      attacker.coords = target;
      attacker.last_attack = Some(now);
      Players::<T>::insert(&who, attacker);
      Self::set_cell(&target, Some(who.clone()));

      Self::deposit_event(Event::Swapped {
        who,
        from,
        to: target,
        defender: occupant,
      });

      Ok(())
    }

    /// Escrow game tokens in a player's sponsorship pool in exchange for a certificate
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::sponsor())]
    pub fn sponsor(
      origin: OriginFor<T>,
      beneficiary: T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;

      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      let mut record = Players::<T>::get(&beneficiary).ok_or(Error::<T>::NotAPlayer)?;
      let asset = T::GameAsset::get();
      ensure!(
        T::Assets::reducible_balance(asset, &who, Preservation::Expendable, Fortitude::Polite)
          >= amount,
        Error::<T>::InsufficientBalanceToSponsor
      );

      let total_shares = SponsorshipShares::<T>::get(&beneficiary);
      ensure!(
        total_shares.is_zero() || !record.sponsorships.is_zero(),
        Error::<T>::SponsorshipPoolDepleted
      );
      let shares = if total_shares.is_zero() {
        amount
      } else {
        Self::mul_div(amount, total_shares, record.sponsorships)?
      };
      let new_total_shares = total_shares
        .checked_add(shares)
        .ok_or(ArithmeticError::Overflow)?;
      record.sponsorships = record
        .sponsorships
        .checked_add(amount)
        .ok_or(ArithmeticError::Overflow)?;

      T::Assets::transfer(
        asset,
        &who,
        &Self::account_id(),
        amount,
        Preservation::Expendable,
      )?;
      Players::<T>::insert(&beneficiary, record);
      SponsorshipShares::<T>::insert(&beneficiary, new_total_shares);

      let certificate_id =
        T::CertificateIssuer::issue(&Self::account_id(), &who, &beneficiary, amount, shares)?;

      Self::deposit_event(Event::Sponsored {
        sponsor: who,
        beneficiary,
        amount,
        shares,
        certificate_id,
      });

      Ok(())
    }

    /// Convert sponsorship shares back into tokens (certificate emitter only)
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::redeem_sponsorship_shares())]
    pub fn redeem_sponsorship_shares(
      origin: OriginFor<T>,
      certificate_owner: T::AccountId,
      beneficiary: T::AccountId,
      shares: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::redeem_shares(&who, &certificate_owner, &beneficiary, shares).map(|_| ())
    }

    /// Pay out the caller's accumulated referral rewards
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::claim_referral_rewards())]
    pub fn claim_referral_rewards(origin: OriginFor<T>) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let mut record = Players::<T>::get(&who).ok_or(Error::<T>::NotAPlayer)?;
      let amount = record.claimable;
      ensure!(!amount.is_zero(), Error::<T>::NothingToClaim);

      T::Currency::transfer(&Self::account_id(), &who, amount, Preservation::Preserve)?;
      record.claimable = Zero::zero();
      Players::<T>::insert(&who, record);

      Self::deposit_event(Event::ReferralRewardsClaimed { who, amount });
      Ok(())
    }

    /// Update slashing percentage (governance only)
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::set_slashing_percentage())]
    pub fn set_slashing_percentage(origin: OriginFor<T>, new_percentage: u8) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(new_percentage <= 100, Error::<T>::InvalidSlashingPercentage);
      let old_percentage = SlashingPercentage::<T>::get();
      SlashingPercentage::<T>::put(new_percentage);
      Self::deposit_event(Event::SlashingPercentageUpdated {
        old_percentage,
        new_percentage,
      });
      Ok(())
    }

    /// Update slashing tax (governance only)
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::set_slashing_tax())]
    pub fn set_slashing_tax(origin: OriginFor<T>, new_tax: u8) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(new_tax <= 100, Error::<T>::InvalidSlashingTax);
      let old_tax = SlashingTax::<T>::get();
      SlashingTax::<T>::put(new_tax);
      Self::deposit_event(Event::SlashingTaxUpdated { old_tax, new_tax });
      Ok(())
    }

    /// Update participation fee (governance only)
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::set_participation_fee())]
    pub fn set_participation_fee(origin: OriginFor<T>, new_fee: Balance) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      let old_fee = ParticipationFee::<T>::get();
      ParticipationFee::<T>::put(new_fee);
      Self::deposit_event(Event::ParticipationFeeUpdated { old_fee, new_fee });
      Ok(())
    }

    /// Update referrer percentage (governance only)
    #[pallet::call_index(10)]
    #[pallet::weight(T::WeightInfo::set_percentage_for_referrer())]
    pub fn set_percentage_for_referrer(
      origin: OriginFor<T>,
      new_percentage: u8,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(new_percentage <= 100, Error::<T>::InvalidReferrerPercentage);
      let old_percentage = ReferrerPercentage::<T>::get();
      ReferrerPercentage::<T>::put(new_percentage);
      Self::deposit_event(Event::ReferrerPercentageUpdated {
        old_percentage,
        new_percentage,
      });
      Ok(())
    }

    /// Update the account allowed to redeem sponsorship shares (governance only)
    #[pallet::call_index(11)]
    #[pallet::weight(T::WeightInfo::set_sponsorship_certificate_emitter())]
    pub fn set_sponsorship_certificate_emitter(
      origin: OriginFor<T>,
      new_emitter: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        !Self::is_zero_account(&new_emitter),
        Error::<T>::InvalidEmitter
      );
      let old_emitter = CertificateEmitter::<T>::get();
      CertificateEmitter::<T>::put(&new_emitter);
      Self::deposit_event(Event::SponsorshipCertificateEmitterUpdated {
        old_emitter,
        new_emitter,
      });
      Ok(())
    }

    /// Update the per-player emission per block (governance only)
    #[pallet::call_index(12)]
    #[pallet::weight(T::WeightInfo::set_emission_per_block())]
    pub fn set_emission_per_block(origin: OriginFor<T>, new_emission: Balance) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      // Accrual up to now stays priced at the old rate
      EmissionCheckpoint::<T>::put((
        Self::emission_index(),
        frame_system::Pallet::<T>::block_number(),
      ));
      let old_emission = EmissionPerBlock::<T>::get();
      EmissionPerBlock::<T>::put(new_emission);
      Self::deposit_event(Event::EmissionPerBlockUpdated {
        old_emission,
        new_emission,
      });
      Ok(())
    }

    /// Mint the emission the caller accrued since its last settlement
    #[pallet::call_index(13)]
    #[pallet::weight(T::WeightInfo::collect_emission())]
    pub fn collect_emission(origin: OriginFor<T>) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let mut record = Players::<T>::get(&who).ok_or(Error::<T>::NotAPlayer)?;
      let amount = Self::settle_emission(&who, &mut record)?;
      ensure!(!amount.is_zero(), Error::<T>::NoEmissionAccrued);
      Players::<T>::insert(&who, record);
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Get the account ID of the escrow
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Occupant of a cell, after checking realm, row and column bounds in that order
    pub fn cell_at(coords: &Coordinates) -> Result<Option<T::AccountId>, DispatchError> {
      ensure!(
        coords.realm < RealmCount::<T>::get(),
        Error::<T>::RealmOutOfBound
      );
      ensure!(
        coords.row < RealmRows::<T>::get(coords.realm),
        Error::<T>::RowOutOfBound
      );
      ensure!(coords.column <= coords.row, Error::<T>::ColumnOutOfBound);
      Ok(
        Lands::<T>::get(coords.realm, coords.row)
          .get(coords.column as usize)
          .cloned()
          .flatten(),
      )
    }

    /// Cells of the frontier row of a realm
    pub fn last_row(realm: u32) -> Result<Vec<Option<T::AccountId>>, DispatchError> {
      ensure!(realm < RealmCount::<T>::get(), Error::<T>::RealmOutOfBound);
      let last = RealmRows::<T>::get(realm).saturating_sub(1);
      Ok(Lands::<T>::get(realm, last).into_inner())
    }

    /// Snapshot of a single player
    pub fn player_data(who: &T::AccountId) -> Option<PlayerData<T::AccountId>> {
      let record = Players::<T>::get(who)?;
      let pending = Self::emission_index().saturating_sub(record.emission_index);
      Some(PlayerData {
        who: who.clone(),
        coords: record.coords,
        balance: T::Assets::balance(T::GameAsset::get(), who).saturating_add(pending),
        sponsorships: record.sponsorships,
        claimable: record.claimable,
        sponsorship_shares: SponsorshipShares::<T>::get(who),
      })
    }

    /// Snapshot of every realm and every player in join order
    pub fn game_data() -> GameData<T::AccountId> {
      let lands: Vec<Vec<Vec<Option<T::AccountId>>>> = (0..RealmCount::<T>::get())
        .map(|realm| {
          (0..RealmRows::<T>::get(realm))
            .map(|row| Lands::<T>::get(realm, row).into_inner())
            .collect::<Vec<_>>()
        })
        .collect();
      let players: Vec<PlayerData<T::AccountId>> = (0..PlayerCount::<T>::get())
        .filter_map(|index| PlayersByIndex::<T>::get(index))
        .filter_map(|who| Self::player_data(&who))
        .collect();
      GameData { lands, players }
    }

    /// Redeem `shares` of `beneficiary`'s pool on behalf of `certificate_owner`.
    ///
    /// `emitter` must be the configured certificate emitter. Returns the token value paid out.
    pub fn redeem_shares(
      emitter: &T::AccountId,
      certificate_owner: &T::AccountId,
      beneficiary: &T::AccountId,
      shares: Balance,
    ) -> Result<Balance, DispatchError> {
      let expected = CertificateEmitter::<T>::get().ok_or(Error::<T>::EmitterNotSet)?;
      ensure!(emitter == &expected, Error::<T>::OnlyEmitterCanRedeem);
      ensure!(!shares.is_zero(), Error::<T>::CannotRedeemZeroShares);
      let total_shares = SponsorshipShares::<T>::get(beneficiary);
      ensure!(shares <= total_shares, Error::<T>::InsufficientShares);
      let mut record = Players::<T>::get(beneficiary).ok_or(Error::<T>::NotAPlayer)?;

      let value = Self::mul_div(shares, record.sponsorships, total_shares)?;
      record.sponsorships = record.sponsorships.saturating_sub(value);

      if !value.is_zero() {
        T::Assets::transfer(
          T::GameAsset::get(),
          &Self::account_id(),
          certificate_owner,
          value,
          Preservation::Expendable,
        )?;
      }
      Players::<T>::insert(beneficiary, record);
      let remaining = total_shares.saturating_sub(shares);
      if remaining.is_zero() {
        SponsorshipShares::<T>::remove(beneficiary);
      } else {
        SponsorshipShares::<T>::insert(beneficiary, remaining);
      }

      Self::deposit_event(Event::SharesRedeemed {
        certificate_owner: certificate_owner.clone(),
        beneficiary: beneficiary.clone(),
        shares,
        value,
      });

      Ok(value)
    }

    /// Emission accrued by a single player since genesis
    pub fn emission_index() -> Balance {
      let (index, since) = EmissionCheckpoint::<T>::get();
      let blocks: Balance = frame_system::Pallet::<T>::block_number()
        .saturating_sub(since)
        .unique_saturated_into();
      index.saturating_add(EmissionPerBlock::<T>::get().saturating_mul(blocks))
    }

    /// Mint the emission `who` accrued since its last settlement. The caller stores `record`.
    fn settle_emission(
      who: &T::AccountId,
      record: &mut PlayerRecord<BlockNumberFor<T>>,
    ) -> Result<Balance, DispatchError> {
      let index = Self::emission_index();
      let amount = index.saturating_sub(record.emission_index);
      record.emission_index = index;
      if !amount.is_zero() {
        Self::mint_game_tokens(who, amount)?;
        Self::deposit_event(Event::EmissionCollected {
          who: who.clone(),
          amount,
        });
      }
      Ok(amount)
    }

    pub(crate) fn do_add_realm() -> Result<u32, DispatchError> {
      let realm = RealmCount::<T>::get();
      ensure!(realm < T::MaxRealms::get(), Error::<T>::TooManyRealms);
      let apex: BoundedVec<Option<T::AccountId>, T::MaxRowLength> =
        vec![None].try_into().map_err(|_| Error::<T>::TooManyRows)?;
      Lands::<T>::insert(realm, 0, apex);
      RealmRows::<T>::insert(realm, 1);
      RealmCount::<T>::put(realm.saturating_add(1));
      Self::deposit_event(Event::RealmAdded { realm });
      Ok(realm)
    }

    pub(crate) fn do_add_row(realm: u32) -> Result<u32, DispatchError> {
      ensure!(realm < RealmCount::<T>::get(), Error::<T>::RealmOutOfBound);
      let row = RealmRows::<T>::get(realm);
      ensure!(row < T::MaxRowLength::get(), Error::<T>::TooManyRows);
      let cells: BoundedVec<Option<T::AccountId>, T::MaxRowLength> =
        vec![None; row.saturating_add(1) as usize]
        .try_into()
        .map_err(|_| Error::<T>::TooManyRows)?;
      Lands::<T>::insert(realm, row, cells);
      RealmRows::<T>::insert(realm, row.saturating_add(1));
      Self::deposit_event(Event::RowAdded { realm, row });
      Ok(row)
    }

    /// Append a row when the frontier row of `realm` has no empty cell left
    fn grow_if_full(realm: u32) -> DispatchResult {
      let rows = RealmRows::<T>::get(realm);
      let frontier = Lands::<T>::get(realm, rows.saturating_sub(1));
      if frontier.iter().any(|cell| cell.is_none()) {
        return Ok(());
      }
      if rows >= T::MaxRowLength::get() {
        log::warn!(
          target: LOG_TARGET,
          "realm {} is full and already has {} rows, not growing",
          realm, rows,
        );
        return Ok(());
      }
      Self::do_add_row(realm).map(|_| ())
    }

    fn set_cell(coords: &Coordinates, occupant: Option<T::AccountId>) {
      Lands::<T>::mutate(coords.realm, coords.row, |cells| {
        if let Some(cell) = cells.get_mut(coords.column as usize) {
          *cell = occupant;
        }
      });
    }

    /// Slash `defender` in favour of `attacker`, moving the tokens and updating both records.
    ///
    /// Fails before touching any balance when the defender is worth more than the attacker.
    fn slash(
      attacker_id: &T::AccountId,
      attacker: &mut PlayerRecord<BlockNumberFor<T>>,
      defender_id: &T::AccountId,
      defender: &mut PlayerRecord<BlockNumberFor<T>>,
    ) -> Result<SlashOutcome, DispatchError> {
      let asset = T::GameAsset::get();
      let attacker_balance = T::Assets::balance(asset, attacker_id);
      let defender_balance = T::Assets::balance(asset, defender_id);
      let attacker_worth = attacker_balance
        .checked_add(attacker.sponsorships)
        .ok_or(ArithmeticError::Overflow)?;
      let defender_worth = defender_balance
        .checked_add(defender.sponsorships)
        .ok_or(ArithmeticError::Overflow)?;
      ensure!(
        defender_worth <= attacker_worth,
        Error::<T>::TargetHasHigherWorth
      );

      let percentage = SlashingPercentage::<T>::get();
      let tax = SlashingTax::<T>::get();
      let balance_slash = percent_of(defender_balance, percentage);
      let sponsorship_slash = percent_of(defender.sponsorships, percentage);
      let balance_tax = percent_of(balance_slash, tax);
      let sponsorship_tax = percent_of(sponsorship_slash, tax);
      let balance_rest = balance_slash.saturating_sub(balance_tax);
      let sponsorship_rest = sponsorship_slash.saturating_sub(sponsorship_tax);

      // Share of the attacker's worth held as balance, in whole percents.
      let balance_part = if attacker_worth.is_zero() {
        100u8
      } else {
        Self::mul_div(attacker_balance, 100, attacker_worth)?.min(100) as u8
      };
      let to_balance = percent_of(balance_rest, balance_part);
      let to_sponsorships = percent_of(balance_rest, 100 - balance_part)
        .checked_add(sponsorship_rest)
        .ok_or(ArithmeticError::Overflow)?;

      let outcome = SlashOutcome {
        subtracted_from_attacked_balance: balance_slash,
        subtracted_from_attacked_sponsorships: sponsorship_slash,
        slashing_taxes: balance_tax.saturating_add(sponsorship_tax),
        added_to_attacker_balance: to_balance,
        added_to_attacker_sponsorships: to_sponsorships,
      };

      let escrow = Self::account_id();
      Self::burn_game_tokens(defender_id, balance_slash)?;
      Self::burn_game_tokens(&escrow, sponsorship_slash)?;
      Self::mint_game_tokens(&T::TreasuryAccount::get(), outcome.slashing_taxes)?;
      Self::mint_game_tokens(attacker_id, to_balance)?;
      Self::mint_game_tokens(&escrow, to_sponsorships)?;

      defender.sponsorships = defender.sponsorships.saturating_sub(sponsorship_slash);
      attacker.sponsorships = attacker
        .sponsorships
        .checked_add(to_sponsorships)
        .ok_or(ArithmeticError::Overflow)?;

      log::debug!(
        target: LOG_TARGET,
        "{:?} slashed {:?}: {:?}",
        attacker_id, defender_id, outcome,
      );

      Ok(outcome)
    }

    fn mint_game_tokens(who: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount.is_zero() {
        return Ok(());
      }
      T::Assets::mint_into(T::GameAsset::get(), who, amount).map(|_| ())
    }

    fn burn_game_tokens(who: &T::AccountId, amount: Balance) -> DispatchResult {
      if amount.is_zero() {
        return Ok(());
      }
      T::Assets::burn_from(
        T::GameAsset::get(),
        who,
        amount,
        Preservation::Expendable,
        Precision::Exact,
        Fortitude::Polite,
      )
      .map(|_| ())
    }

    /// `floor(a * b / c)` with a 256-bit intermediate
    fn mul_div(a: Balance, b: Balance, c: Balance) -> Result<Balance, DispatchError> {
      let result = U256::from(a)
        .saturating_mul(U256::from(b))
        .checked_div(U256::from(c))
        .ok_or(ArithmeticError::DivisionByZero)?;
      if result > U256::from(u128::MAX) {
        return Err(ArithmeticError::Overflow.into());
      }
      Ok(result.as_u128())
    }

    fn is_zero_account(who: &T::AccountId) -> bool {
      T::AccountId::decode(&mut TrailingZeroInput::zeroes())
        .map(|zero| &zero == who)
        .unwrap_or(false)
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Number of empty realms created at genesis
    pub realms: u32,
    /// Account allowed to redeem sponsorship shares
    pub certificate_emitter: Option<T::AccountId>,
    /// Game tokens minted to the treasury account
    pub treasury_endowment: Balance,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      // Escrow and treasury hold the existential deposit so fee shares below it still land
      let escrow = Pallet::<T>::account_id();
      let treasury = T::TreasuryAccount::get();
      let existential_deposit = T::Currency::minimum_balance();
      frame_system::Pallet::<T>::inc_providers(&escrow);
      if !existential_deposit.is_zero() {
        T::Currency::mint_into(&escrow, existential_deposit)
          .expect("escrow endowment cannot overflow at genesis");
      }
      let treasury_native = T::Currency::balance(&treasury);
      if treasury_native < existential_deposit {
        T::Currency::mint_into(&treasury, existential_deposit - treasury_native)
          .expect("treasury endowment cannot overflow at genesis");
      }

      assert!(
        self.realms <= T::MaxRealms::get(),
        "genesis realms exceed MaxRealms"
      );
      for _ in 0..self.realms {
        Pallet::<T>::do_add_realm().expect("realms bounded by MaxRealms above");
      }
      if let Some(emitter) = &self.certificate_emitter {
        CertificateEmitter::<T>::put(emitter);
      }
      if !self.treasury_endowment.is_zero() {
        T::Assets::mint_into(T::GameAsset::get(), &treasury, self.treasury_endowment)
          .expect("game asset must exist before the game genesis");
      }
    }
  }
}
