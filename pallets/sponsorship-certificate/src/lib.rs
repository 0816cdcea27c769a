//! Sponsorship Certificate Pallet
//!
//! Non-fungible receipts for DaoVsDao sponsorships. The game pallet account (the manager) emits a
//! certificate to the sponsor every time tokens are escrowed in a player's sponsorship pool. The
//! owner may transfer it, or redeem its shares fully or in parts; redemptions are forwarded to the
//! game through a [`SponsorshipRedeemer`] with this pallet's account acting as emitter.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod types;
pub use types::{
  Balance, Certificate, CertificateMetadata, SponsorshipRedeemer, UserCertificates,
};

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Log target of the pallet
pub const LOG_TARGET: &str = "runtime::sponsorship-certificate";

#[frame::pallet]
pub mod pallet {
  use super::*;
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::traits::tokens::nonfungible,
    sp_runtime::{
      ArithmeticError,
      traits::{AccountIdConversion, TrailingZeroInput, Zero},
    },
  };
  use frame::prelude::*;
  use primitives::CertificateId;

  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Game side of a redemption
    type Redeemer: SponsorshipRedeemer<Self::AccountId, Balance>;

    /// Metadata renderer
    type Metadata: CertificateMetadata<Self::AccountId>;

    /// Origin that can replace the manager
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Pallet ID, used as the emitter identity towards the game
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(_);

  /// Number of certificates emitted; also the id of the latest one
  #[pallet::storage]
  #[pallet::getter(fn certificate_count)]
  pub type CertificateCount<T: Config> = StorageValue<_, CertificateId, ValueQuery>;

  /// Certificate data by id
  #[pallet::storage]
  #[pallet::getter(fn certificate_data)]
  pub type Certificates<T: Config> =
    StorageMap<_, Twox64Concat, CertificateId, Certificate<T::AccountId>>;

  /// Current owner of each certificate
  #[pallet::storage]
  #[pallet::getter(fn owner_of)]
  pub type Owners<T: Config> = StorageMap<_, Twox64Concat, CertificateId, T::AccountId>;

  /// Certificates held by an account
  #[pallet::storage]
  pub type OwnedCertificates<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Twox64Concat,
    CertificateId,
    (),
    OptionQuery,
  >;

  /// Certificates whose sponsorship went to an account
  #[pallet::storage]
  pub type ReceivedCertificates<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Twox64Concat,
    CertificateId,
    (),
    OptionQuery,
  >;

  /// Account allowed to emit certificates
  #[pallet::storage]
  #[pallet::getter(fn manager)]
  pub type Manager<T: Config> = StorageValue<_, T::AccountId>;

  /// Account identifying the metadata renderer
  #[pallet::storage]
  #[pallet::getter(fn metadata_factory)]
  pub type MetadataFactory<T: Config> = StorageValue<_, T::AccountId>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A certificate was minted to its sponsor
    CertificateEmitted {
      id: CertificateId,
      sponsor: T::AccountId,
      receiver: T::AccountId,
      amount: Balance,
      shares: Balance,
    },
    /// Shares of a certificate were redeemed
    CertificateRedeemed {
      id: CertificateId,
      owner: T::AccountId,
      shares: Balance,
      value: Balance,
      closed: bool,
    },
    /// Rendered metadata of a certificate changed
    MetadataUpdate { id: CertificateId },
    /// A certificate changed hands
    CertificateTransferred {
      id: CertificateId,
      from: T::AccountId,
      to: T::AccountId,
    },
    /// Manager updated
    SponsorshipManagerUpdated {
      old_manager: Option<T::AccountId>,
      new_manager: T::AccountId,
    },
    /// Metadata factory updated
    SponsorshipMetadataFactoryUpdated {
      old_factory: Option<T::AccountId>,
      new_factory: T::AccountId,
    },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// No manager has been configured
    ManagerNotSet,
    /// Only the manager may emit certificates
    OnlyManagerCanEmit,
    /// No certificate with this id
    UnknownCertificate,
    /// Caller does not own the certificate
    NotTheOwner,
    /// Certificate is fully redeemed
    AlreadyClosed,
    /// Zero shares cannot be redeemed
    ZeroShares,
    /// More shares requested than left on the certificate
    ExceedsCertificateShares,
    /// The all-zero account cannot be the manager
    InvalidManager,
    /// The all-zero account cannot be the metadata factory
    InvalidFactory,
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Mint a certificate to `sponsor` (manager only)
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::emit_certificate())]
    pub fn emit_certificate(
      origin: OriginFor<T>,
      sponsor: T::AccountId,
      receiver: T::AccountId,
      amount: Balance,
      shares: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::emit(&who, &sponsor, &receiver, amount, shares).map(|_| ())
    }

    /// Redeem every remaining share of a certificate and close it
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::redeem_certificate())]
    pub fn redeem_certificate(origin: OriginFor<T>, id: CertificateId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_redeem(&who, id, None)
    }

    /// Redeem part of a certificate's shares
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::redeem_certificate_partially())]
    pub fn redeem_certificate_partially(
      origin: OriginFor<T>,
      id: CertificateId,
      shares: Balance,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_redeem(&who, id, Some(shares))
    }

    /// Hand a certificate over to another account
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::transfer())]
    pub fn transfer(origin: OriginFor<T>, id: CertificateId, dest: T::AccountId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      let owner = Owners::<T>::get(id).ok_or(Error::<T>::UnknownCertificate)?;
      ensure!(owner == who, Error::<T>::NotTheOwner);

      if dest != who {
        OwnedCertificates::<T>::remove(&who, id);
        OwnedCertificates::<T>::insert(&dest, id, ());
        Owners::<T>::insert(id, &dest);
      }

      Self::deposit_event(Event::CertificateTransferred {
        id,
        from: who,
        to: dest,
      });
      Ok(())
    }

    /// Update the account allowed to emit certificates (governance only)
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::set_sponsorship_certificate_manager())]
    pub fn set_sponsorship_certificate_manager(
      origin: OriginFor<T>,
      new_manager: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        !Self::is_zero_account(&new_manager),
        Error::<T>::InvalidManager
      );
      let old_manager = Manager::<T>::get();
      Manager::<T>::put(&new_manager);
      Self::deposit_event(Event::SponsorshipManagerUpdated {
        old_manager,
        new_manager,
      });
      Ok(())
    }

    /// Update the account identifying the metadata renderer (governance only)
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::set_sponsorship_certificate_metadata_factory())]
    pub fn set_sponsorship_certificate_metadata_factory(
      origin: OriginFor<T>,
      new_factory: T::AccountId,
    ) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      ensure!(
        !Self::is_zero_account(&new_factory),
        Error::<T>::InvalidFactory
      );
      let old_factory = MetadataFactory::<T>::get();
      MetadataFactory::<T>::put(&new_factory);
      Self::deposit_event(Event::SponsorshipMetadataFactoryUpdated {
        old_factory,
        new_factory,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Get the account ID of the pallet
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Mint the next certificate to `sponsor`. `manager` must be the configured manager.
    pub fn emit(
      manager: &T::AccountId,
      sponsor: &T::AccountId,
      receiver: &T::AccountId,
      amount: Balance,
      shares: Balance,
    ) -> Result<CertificateId, DispatchError> {
      let expected = Manager::<T>::get().ok_or(Error::<T>::ManagerNotSet)?;
      ensure!(manager == &expected, Error::<T>::OnlyManagerCanEmit);

      let id = CertificateCount::<T>::get()
        .checked_add(1)
        .ok_or(ArithmeticError::Overflow)?;
      OwnedCertificates::<T>::insert(sponsor, id, ());
      ReceivedCertificates::<T>::insert(receiver, id, ());

      Certificates::<T>::insert(
        id,
        Certificate {
          sponsor: sponsor.clone(),
          receiver: receiver.clone(),
          amount,
          redeemed: Zero::zero(),
          shares,
          redeemed_shares: Zero::zero(),
          closed: false,
        },
      );
      Owners::<T>::insert(id, sponsor);
      CertificateCount::<T>::put(id);

      Self::deposit_event(Event::CertificateEmitted {
        id,
        sponsor: sponsor.clone(),
        receiver: receiver.clone(),
        amount,
        shares,
      });

      Ok(id)
    }

    /// Owned certificates (closed included) and open certificates received by `who`
    pub fn user_certificates(who: &T::AccountId) -> UserCertificates {
      let mut owned: Vec<CertificateId> = OwnedCertificates::<T>::iter_key_prefix(who).collect();
      owned.sort_unstable();
      let mut beneficiary: Vec<CertificateId> = ReceivedCertificates::<T>::iter_key_prefix(who)
        .filter(|id| Certificates::<T>::get(id).is_some_and(|c| !c.closed))
        .collect();
      beneficiary.sort_unstable();
      UserCertificates { owned, beneficiary }
    }

    /// Rendered metadata of a certificate
    pub fn certificate_metadata(id: CertificateId) -> Option<Vec<u8>> {
      let factory = MetadataFactory::<T>::get();
      Certificates::<T>::get(id)
        .map(|certificate| T::Metadata::render(factory.as_ref(), id, &certificate))
    }

    /// Redeem `shares` of certificate `id`, or all remaining ones when `None`
    fn do_redeem(who: &T::AccountId, id: CertificateId, shares: Option<Balance>) -> DispatchResult {
      let mut certificate = Certificates::<T>::get(id).ok_or(Error::<T>::UnknownCertificate)?;
      let owner = Owners::<T>::get(id).ok_or(Error::<T>::UnknownCertificate)?;
      ensure!(&owner == who, Error::<T>::NotTheOwner);
      ensure!(!certificate.closed, Error::<T>::AlreadyClosed);

      let remaining = certificate.remaining_shares();
      let shares = shares.unwrap_or(remaining);
      ensure!(!shares.is_zero(), Error::<T>::ZeroShares);
      ensure!(shares <= remaining, Error::<T>::ExceedsCertificateShares);

      let value =
        T::Redeemer::redeem_shares(&Self::account_id(), who, &certificate.receiver, shares)?;

      certificate.redeemed = certificate
        .redeemed
        .checked_add(value)
        .ok_or(ArithmeticError::Overflow)?;
      certificate.redeemed_shares = certificate.redeemed_shares.saturating_add(shares);
      certificate.closed = certificate.redeemed_shares == certificate.shares;
      let closed = certificate.closed;
      Certificates::<T>::insert(id, certificate);

      log::debug!(
        target: LOG_TARGET,
        "certificate {} redeemed {} shares for {} (closed: {})",
        id, shares, value, closed,
      );

      Self::deposit_event(Event::CertificateRedeemed {
        id,
        owner: who.clone(),
        shares,
        value,
        closed,
      });
      Self::deposit_event(Event::MetadataUpdate { id });
      Ok(())
    }

    fn is_zero_account(who: &T::AccountId) -> bool {
      T::AccountId::decode(&mut TrailingZeroInput::zeroes())
        .map(|zero| &zero == who)
        .unwrap_or(false)
    }
  }

  impl<T: Config> nonfungible::Inspect<T::AccountId> for Pallet<T> {
    type ItemId = CertificateId;

    fn owner(item: &CertificateId) -> Option<T::AccountId> {
      Owners::<T>::get(item)
    }

    fn can_transfer(item: &CertificateId) -> bool {
      Owners::<T>::contains_key(item)
    }
  }

  /// Genesis configuration
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Account allowed to emit certificates
    pub manager: Option<T::AccountId>,
    /// Account identifying the metadata renderer
    pub metadata_factory: Option<T::AccountId>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Some(manager) = &self.manager {
        Manager::<T>::put(manager);
      }
      if let Some(factory) = &self.metadata_factory {
        MetadataFactory::<T>::put(factory);
      }
    }
  }
}
