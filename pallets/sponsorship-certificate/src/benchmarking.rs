#![cfg(feature = "runtime-benchmarks")]

use super::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_system::RawOrigin;

fn set_manager<T: Config>() -> T::AccountId {
  let manager: T::AccountId = account("manager", 0, 0);
  Manager::<T>::put(&manager);
  manager
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn emit_certificate() {
    let manager = set_manager::<T>();
    let sponsor: T::AccountId = whitelisted_caller();
    let receiver: T::AccountId = account("receiver", 0, 0);

    #[extrinsic_call]
    emit_certificate(RawOrigin::Signed(manager), sponsor.clone(), receiver, 1_000, 1_000);

    assert_eq!(Owners::<T>::get(1), Some(sponsor));
  }

  #[benchmark]
  fn redeem_certificate() {
    let manager = set_manager::<T>();
    let sponsor: T::AccountId = whitelisted_caller();
    let receiver: T::AccountId = account("receiver", 0, 0);
    let id = Pallet::<T>::emit(&manager, &sponsor, &receiver, 1_000, 1_000).unwrap();

    #[extrinsic_call]
    redeem_certificate(RawOrigin::Signed(sponsor), id);

    assert!(Certificates::<T>::get(id).unwrap().closed);
  }

  #[benchmark]
  fn redeem_certificate_partially() {
    let manager = set_manager::<T>();
    let sponsor: T::AccountId = whitelisted_caller();
    let receiver: T::AccountId = account("receiver", 0, 0);
    let id = Pallet::<T>::emit(&manager, &sponsor, &receiver, 1_000, 1_000).unwrap();

    #[extrinsic_call]
    redeem_certificate_partially(RawOrigin::Signed(sponsor), id, 400);

    assert_eq!(Certificates::<T>::get(id).unwrap().redeemed_shares, 400);
  }

  #[benchmark]
  fn transfer() {
    let manager = set_manager::<T>();
    let sponsor: T::AccountId = whitelisted_caller();
    let receiver: T::AccountId = account("receiver", 0, 0);
    let dest: T::AccountId = account("dest", 0, 0);
    let id = Pallet::<T>::emit(&manager, &sponsor, &receiver, 1_000, 1_000).unwrap();

    #[extrinsic_call]
    transfer(RawOrigin::Signed(sponsor), id, dest.clone());

    assert_eq!(Owners::<T>::get(id), Some(dest));
  }

  #[benchmark]
  fn set_sponsorship_certificate_manager() {
    let new_manager: T::AccountId = account("manager", 1, 0);

    #[extrinsic_call]
    set_sponsorship_certificate_manager(RawOrigin::Root, new_manager.clone());

    assert_eq!(Manager::<T>::get(), Some(new_manager));
  }

  #[benchmark]
  fn set_sponsorship_certificate_metadata_factory() {
    let factory: T::AccountId = account("factory", 0, 0);

    #[extrinsic_call]
    set_sponsorship_certificate_metadata_factory(RawOrigin::Root, factory.clone());

    assert_eq!(MetadataFactory::<T>::get(), Some(factory));
  }

  impl_benchmark_test_suite!(Pallet, crate::mock::new_test_ext(), crate::mock::Test);
}
