#![cfg(feature = "runtime-benchmarks")]

use super::*;
use frame::deps::frame_support::traits::{
  Get, fungible::Mutate as NativeMutate, fungibles::Mutate,
};
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;

const TOKENS: Balance = 1_000_000_000_000;
const FEE: Balance = 1_000_000;

fn fund<T: Config>(who: &T::AccountId) {
  let _ = T::Currency::mint_into(who, TOKENS);
  let _ = T::Assets::mint_into(T::GameAsset::get(), who, TOKENS);
}

fn player<T: Config>(
  name: &'static str,
  coords: Coordinates,
  referrer: Option<T::AccountId>,
) -> T::AccountId {
  let who: T::AccountId = account(name, 0, 0);
  fund::<T>(&who);
  Pallet::<T>::place_user(RawOrigin::Signed(who.clone()).into(), coords, referrer).unwrap();
  who
}

fn sponsored<T: Config>(beneficiary: &T::AccountId, amount: Balance) -> T::AccountId {
  let sponsor: T::AccountId = account("sponsor", 0, 0);
  fund::<T>(&sponsor);
  Pallet::<T>::sponsor(
    RawOrigin::Signed(sponsor.clone()).into(),
    beneficiary.clone(),
    amount,
  )
  .unwrap();
  sponsor
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn add_realm() {
    let realm = RealmCount::<T>::get();

    #[extrinsic_call]
    add_realm(RawOrigin::Root);

    assert_eq!(RealmCount::<T>::get(), realm + 1);
  }

  #[benchmark]
  fn add_row() {
    let caller: T::AccountId = whitelisted_caller();
    let rows = RealmRows::<T>::get(0);

    #[extrinsic_call]
    add_row(RawOrigin::Signed(caller), 0);

    assert_eq!(RealmRows::<T>::get(0), rows + 1);
  }

  #[benchmark]
  fn place_user() {
    // Fee split with a referrer, and the placement fills the frontier
    ParticipationFee::<T>::put(FEE);
    let referrer = player::<T>("referrer", Coordinates::new(0, 0, 0), None);
    let _ = player::<T>("neighbour", Coordinates::new(0, 1, 0), None);
    let caller: T::AccountId = whitelisted_caller();
    fund::<T>(&caller);

    #[extrinsic_call]
    place_user(
      RawOrigin::Signed(caller.clone()),
      Coordinates::new(0, 1, 1),
      Some(referrer),
    );

    assert!(Players::<T>::contains_key(&caller));
  }

  #[benchmark]
  fn swap() {
    let defender = player::<T>("defender", Coordinates::new(0, 0, 0), None);
    let caller: T::AccountId = whitelisted_caller();
    fund::<T>(&caller);
    Pallet::<T>::place_user(
      RawOrigin::Signed(caller.clone()).into(),
      Coordinates::new(0, 1, 0),
      None,
    )
    .unwrap();
    let _ = sponsored::<T>(&defender, TOKENS / 4);
    let _ = sponsored::<T>(&caller, TOKENS / 2);

    #[extrinsic_call]
    swap(RawOrigin::Signed(caller.clone()), Coordinates::new(0, 0, 0));

    assert_eq!(Pallet::<T>::cell_at(&Coordinates::new(0, 0, 0)), Ok(Some(caller)));
  }

  #[benchmark]
  fn sponsor() {
    let beneficiary = player::<T>("beneficiary", Coordinates::new(0, 0, 0), None);
    let _ = sponsored::<T>(&beneficiary, TOKENS / 4);
    let caller: T::AccountId = whitelisted_caller();
    fund::<T>(&caller);

    #[extrinsic_call]
    sponsor(RawOrigin::Signed(caller), beneficiary.clone(), TOKENS / 2);

    assert_eq!(Players::<T>::get(&beneficiary).unwrap().sponsorships, 3 * TOKENS / 4);
  }

  #[benchmark]
  fn redeem_sponsorship_shares() {
    let beneficiary = player::<T>("beneficiary", Coordinates::new(0, 0, 0), None);
    let owner = sponsored::<T>(&beneficiary, TOKENS / 2);
    let caller: T::AccountId = whitelisted_caller();
    CertificateEmitter::<T>::put(&caller);

    #[extrinsic_call]
    redeem_sponsorship_shares(RawOrigin::Signed(caller), owner, beneficiary.clone(), TOKENS / 4);

    assert_eq!(SponsorshipShares::<T>::get(&beneficiary), TOKENS / 4);
  }

  #[benchmark]
  fn claim_referral_rewards() {
    ParticipationFee::<T>::put(FEE);
    let caller: T::AccountId = whitelisted_caller();
    fund::<T>(&caller);
    Pallet::<T>::place_user(
      RawOrigin::Signed(caller.clone()).into(),
      Coordinates::new(0, 0, 0),
      None,
    )
    .unwrap();
    let _ = player::<T>("referee", Coordinates::new(0, 1, 0), Some(caller.clone()));

    #[extrinsic_call]
    claim_referral_rewards(RawOrigin::Signed(caller.clone()));

    assert_eq!(Players::<T>::get(&caller).unwrap().claimable, 0);
  }

  #[benchmark]
  fn set_slashing_percentage() {
    #[extrinsic_call]
    set_slashing_percentage(RawOrigin::Root, 30);

    assert_eq!(SlashingPercentage::<T>::get(), 30);
  }

  #[benchmark]
  fn set_slashing_tax() {
    #[extrinsic_call]
    set_slashing_tax(RawOrigin::Root, 15);

    assert_eq!(SlashingTax::<T>::get(), 15);
  }

  #[benchmark]
  fn set_participation_fee() {
    #[extrinsic_call]
    set_participation_fee(RawOrigin::Root, FEE);

    assert_eq!(ParticipationFee::<T>::get(), FEE);
  }

  #[benchmark]
  fn set_percentage_for_referrer() {
    #[extrinsic_call]
    set_percentage_for_referrer(RawOrigin::Root, 25);

    assert_eq!(ReferrerPercentage::<T>::get(), 25);
  }

  #[benchmark]
  fn set_sponsorship_certificate_emitter() {
    let emitter: T::AccountId = account("emitter", 0, 0);

    #[extrinsic_call]
    set_sponsorship_certificate_emitter(RawOrigin::Root, emitter.clone());

    assert_eq!(CertificateEmitter::<T>::get(), Some(emitter));
  }

  #[benchmark]
  fn set_emission_per_block() {
    #[extrinsic_call]
    set_emission_per_block(RawOrigin::Root, FEE);

    assert_eq!(EmissionPerBlock::<T>::get(), FEE);
  }

  #[benchmark]
  fn collect_emission() {
    EmissionPerBlock::<T>::put(FEE);
    let caller = player::<T>("collector", Coordinates::new(0, 0, 0), None);
    let now = polkadot_sdk::frame_system::Pallet::<T>::block_number();
    polkadot_sdk::frame_system::Pallet::<T>::set_block_number(now + 10u32.into());

    #[extrinsic_call]
    collect_emission(RawOrigin::Signed(caller.clone()));

    assert_eq!(
      Players::<T>::get(&caller).unwrap().emission_index,
      Pallet::<T>::emission_index()
    );
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
