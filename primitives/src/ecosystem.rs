//! Ecosystem Constants for the DaoVsDao game
//!
//! Pallet identifiers and the default economic parameters shared by the game pallet, the
//! certificate pallet and their runtime configurations.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
/// The first four bytes differ so the accounts stay distinct even when truncated to `u64`.
pub mod pallet_ids {
  /// Game pallet ID (sponsorship escrow and referral rewards)
  pub const DAO_VS_DAO_PALLET_ID: &[u8; 8] = b"game/dvd";

  /// Sponsorship certificate pallet ID (acts as the share redemption emitter)
  pub const SPONSORSHIP_CERTIFICATE_PALLET_ID: &[u8; 8] = b"cert/dvd";
}

/// Default game parameters.
///
/// Every percentage is an integer in `0..=100`; the pallets reject anything above.
pub mod params {
  use super::Balance;

  /// One whole game token (18 decimals).
  pub const UNIT: Balance = 1_000_000_000_000_000_000;

  /// Share of the defender's balance and sponsorships removed on a successful attack (20%).
  pub const SLASHING_PERCENTAGE: u8 = 20;

  /// Share of every slash paid to the treasury (10%).
  pub const SLASHING_TAX: u8 = 10;

  /// Share of the participation fee credited to a valid referrer (10%).
  pub const REFERRER_PERCENTAGE: u8 = 10;

  /// Participation fee in native currency. Entry is free until governance sets a fee.
  pub const PARTICIPATION_FEE: Balance = 0;

  /// Blocks a player must wait between two moves (~1 minute at 6s/block).
  pub const ATTACK_COOLDOWN_BLOCKS: u32 = 10;

  /// Game tokens emitted to every player per block. Off until governance sets a rate.
  pub const EMISSION_PER_BLOCK: Balance = 0;
}

/// Identity of the game token as registered in the assets ledger.
pub mod token {
  pub const NAME: &[u8] = b"DaoVsDao Token";
  pub const SYMBOL: &[u8] = b"DVD";
  pub const DECIMALS: u8 = 18;
}
