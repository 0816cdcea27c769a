extern crate alloc;

use crate as pallet_dao_vs_dao;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU8, ConstU32, ConstU64, ConstU128, Get},
};
use polkadot_sdk::frame_system::{self, EnsureRoot};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError,
  testing::H256,
  traits::{AccountIdConversion, BlakeTwo256, IdentityLookup},
};
use primitives::{
  CertificateId, Coordinates,
  ecosystem::{pallet_ids, params, token},
};
use std::cell::RefCell;

pub const UNIT: u128 = params::UNIT;
pub const GAME_ASSET: u32 = 1;
pub const ASSET_OWNER: u64 = 1000;
pub const TREASURY: u64 = 999;

pub const ALICE: u64 = 1;
pub const BOB: u64 = 2;
pub const CHARLIE: u64 = 3;
pub const DAVE: u64 = 4;
/// Funded with native currency only, never holds game tokens at genesis
pub const EVE: u64 = 5;

pub const INITIAL_NATIVE: u128 = 1_000 * UNIT;
pub const ATTACK_COOLDOWN: u64 = params::ATTACK_COOLDOWN_BLOCKS as u64;
/// Longer than the attack cooldown so the two windows can be told apart
pub const ATTACKED_COOLDOWN: u64 = 20;

// State containers for stateful mocks
thread_local! {
    // Existential deposit of the native currency
    pub static EXISTENTIAL_DEPOSIT: RefCell<u128> = const { RefCell::new(1) };
}

pub struct ExistentialDeposit;
impl Get<u128> for ExistentialDeposit {
  fn get() -> u128 {
    EXISTENTIAL_DEPOSIT.with(|ed| *ed.borrow())
  }
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    DaoVsDao: pallet_dao_vs_dao,
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
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ExistentialDeposit;
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

/// Routes certificate requests of the game to the certificate pallet
pub struct CertificateAdapter;
impl pallet_dao_vs_dao::CertificateIssuer<u64, u128> for CertificateAdapter {
  fn issue(
    manager: &u64,
    sponsor: &u64,
    beneficiary: &u64,
    amount: u128,
    shares: u128,
  ) -> Result<CertificateId, DispatchError> {
    SponsorshipCertificate::emit(manager, sponsor, beneficiary, amount, shares)
  }
}

/// Routes certificate redemptions back into the game
pub struct GameRedeemer;
impl pallet_sponsorship_certificate::SponsorshipRedeemer<u64, u128> for GameRedeemer {
  fn redeem_shares(
    emitter: &u64,
    owner: &u64,
    beneficiary: &u64,
    shares: u128,
  ) -> Result<u128, DispatchError> {
    DaoVsDao::redeem_shares(emitter, owner, beneficiary, shares)
  }
}

pub struct GamePalletId;
impl Get<PalletId> for GamePalletId {
  fn get() -> PalletId {
    PalletId(*pallet_ids::DAO_VS_DAO_PALLET_ID)
  }
}

pub struct CertificatePalletId;
impl Get<PalletId> for CertificatePalletId {
  fn get() -> PalletId {
    PalletId(*pallet_ids::SPONSORSHIP_CERTIFICATE_PALLET_ID)
  }
}

parameter_types! {
  pub const GameAsset: u32 = GAME_ASSET;
  pub const MaxRealms: u32 = 3;
  pub const MaxRowLength: u32 = 4;
}

impl pallet_dao_vs_dao::Config for Test {
  type Assets = Assets;
  type Currency = Balances;
  type AdminOrigin = EnsureRoot<u64>;
  type CertificateIssuer = CertificateAdapter;
  type PalletId = GamePalletId;
  type GameAsset = GameAsset;
  type TreasuryAccount = ConstU64<TREASURY>;
  type MaxRealms = MaxRealms;
  type MaxRowLength = MaxRowLength;
  type AttackCooldown = ConstU64<ATTACK_COOLDOWN>;
  type AttackedCooldown = ConstU64<ATTACKED_COOLDOWN>;
  type DefaultSlashingPercentage = ConstU8<{ params::SLASHING_PERCENTAGE }>;
  type DefaultSlashingTax = ConstU8<{ params::SLASHING_TAX }>;
  type DefaultReferrerPercentage = ConstU8<{ params::REFERRER_PERCENTAGE }>;
  type DefaultParticipationFee = ConstU128<{ params::PARTICIPATION_FEE }>;
  type DefaultEmissionPerBlock = ConstU128<{ params::EMISSION_PER_BLOCK }>;
  type WeightInfo = ();
}

impl pallet_sponsorship_certificate::Config for Test {
  type Redeemer = GameRedeemer;
  type Metadata = ();
  type AdminOrigin = EnsureRoot<u64>;
  type PalletId = CertificatePalletId;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  build_ext(1, Some(UNIT))
}

/// Same genesis under a custom existential deposit, leaving the treasury without native funds
pub fn new_test_ext_with_existential_deposit(
  existential_deposit: u128,
) -> polkadot_sdk::sp_io::TestExternalities {
  build_ext(existential_deposit, None)
}

fn build_ext(
  existential_deposit: u128,
  treasury_native: Option<u128>,
) -> polkadot_sdk::sp_io::TestExternalities {
  EXISTENTIAL_DEPOSIT.with(|ed| *ed.borrow_mut() = existential_deposit);

  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  let mut balances = alloc::vec![
    (ALICE, INITIAL_NATIVE),
    (BOB, INITIAL_NATIVE),
    (CHARLIE, INITIAL_NATIVE),
    (DAVE, INITIAL_NATIVE),
    (EVE, INITIAL_NATIVE),
  ];
  if let Some(amount) = treasury_native {
    balances.push((TREASURY, amount));
  }
  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances,
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Game token: sufficient, min balance 1
  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(GAME_ASSET, ASSET_OWNER, true, 1)],
    metadata: alloc::vec![(
      GAME_ASSET,
      token::NAME.to_vec(),
      token::SYMBOL.to_vec(),
      token::DECIMALS,
    )],
    accounts: alloc::vec![
      (GAME_ASSET, ALICE, UNIT / 4),
      (GAME_ASSET, BOB, UNIT / 2),
      (GAME_ASSET, CHARLIE, UNIT / 4),
      (GAME_ASSET, DAVE, UNIT),
    ],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let game_account: u64 = GamePalletId::get().into_account_truncating();
  let certificate_account: u64 = CertificatePalletId::get().into_account_truncating();

  pallet_dao_vs_dao::GenesisConfig::<Test> {
    realms: 1,
    certificate_emitter: Some(certificate_account),
    treasury_endowment: UNIT,
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_sponsorship_certificate::GenesisConfig::<Test> {
    manager: Some(game_account),
    ..Default::default()
  }
  .assimilate_storage(&mut t)
  .unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}

pub fn coords(realm: u32, row: u32, column: u32) -> Coordinates {
  Coordinates::new(realm, row, column)
}

pub fn game_balance(who: u64) -> u128 {
  use polkadot_sdk::frame_support::traits::fungibles::Inspect;
  Assets::balance(GAME_ASSET, who)
}

/// Jump past both cooldowns
pub fn skip_cooldowns() {
  System::set_block_number(System::block_number() + ATTACK_COOLDOWN + ATTACKED_COOLDOWN);
}
