extern crate alloc;

use crate as pallet_sponsorship_certificate;
use alloc::vec::Vec;
use polkadot_sdk::frame_support::{PalletId, construct_runtime, derive_impl, traits::Get};
use polkadot_sdk::frame_system::{self, EnsureRoot};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::CertificateId;
use std::cell::RefCell;

/// Stand-in for the game pallet account
pub const MANAGER: u64 = 100;
pub const SPONSOR: u64 = 1;
pub const RECEIVER: u64 = 2;
pub const OTHER: u64 = 3;

/// Value the mock game pays per redemption
pub const REDEEM_VALUE: u128 = 1000;

// State containers for stateful mocks
thread_local! {
    // Redemptions seen by the game: (emitter, owner, beneficiary, shares)
    pub static REDEMPTIONS: RefCell<Vec<(u64, u64, u64, u128)>> = const { RefCell::new(Vec::new()) };

    // Error returned by the game instead of paying out
    pub static REDEEM_ERROR: RefCell<Option<DispatchError>> = const { RefCell::new(None) };
}

pub fn redemptions() -> Vec<(u64, u64, u64, u128)> {
  REDEMPTIONS.with(|r| r.borrow().clone())
}

pub fn fail_redemptions_with(error: DispatchError) {
  REDEEM_ERROR.with(|e| *e.borrow_mut() = Some(error));
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    SponsorshipCertificate: pallet_sponsorship_certificate,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
}

pub struct MockGame;
impl pallet_sponsorship_certificate::SponsorshipRedeemer<u64, u128> for MockGame {
  fn redeem_shares(
    emitter: &u64,
    owner: &u64,
    beneficiary: &u64,
    shares: u128,
  ) -> Result<u128, DispatchError> {
    if let Some(error) = REDEEM_ERROR.with(|e| e.borrow().clone()) {
      return Err(error);
    }
    REDEMPTIONS.with(|r| {
      r.borrow_mut()
        .push((*emitter, *owner, *beneficiary, shares))
    });
    Ok(REDEEM_VALUE)
  }
}

/// Renders `id:redeemed/amount`, prefixed with `factory@` once a factory is set
pub struct PlainMetadata;
impl pallet_sponsorship_certificate::CertificateMetadata<u64> for PlainMetadata {
  fn render(
    factory: Option<&u64>,
    id: CertificateId,
    certificate: &pallet_sponsorship_certificate::Certificate<u64>,
  ) -> Vec<u8> {
    let body = alloc::format!("{}:{}/{}", id, certificate.redeemed, certificate.amount);
    match factory {
      Some(factory) => alloc::format!("{}@{}", factory, body).into_bytes(),
      None => body.into_bytes(),
    }
  }
}

pub struct CertificatePalletId;
impl Get<PalletId> for CertificatePalletId {
  fn get() -> PalletId {
    PalletId(*primitives::ecosystem::pallet_ids::SPONSORSHIP_CERTIFICATE_PALLET_ID)
  }
}

impl pallet_sponsorship_certificate::Config for Test {
  type Redeemer = MockGame;
  type Metadata = PlainMetadata;
  type AdminOrigin = EnsureRoot<u64>;
  type PalletId = CertificatePalletId;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  pallet_sponsorship_certificate::GenesisConfig::<Test> {
    manager: Some(MANAGER),
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Reset State
  REDEMPTIONS.with(|r| r.borrow_mut().clear());
  REDEEM_ERROR.with(|e| *e.borrow_mut() = None);

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}

/// Emit a certificate as the manager
pub fn emit(sponsor: u64, receiver: u64, amount: u128, shares: u128) -> CertificateId {
  SponsorshipCertificate::emit(&MANAGER, &sponsor, &receiver, amount, shares).unwrap()
}
