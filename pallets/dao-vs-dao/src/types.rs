use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame::deps::sp_runtime::{DispatchError, RuntimeDebug};
use scale_info::TypeInfo;

pub use primitives::{CertificateId, Coordinates};

/// Balance of the game asset and of the native currency.
pub type Balance = u128;

/// On-chain record of a registered player.
///
/// The game-token balance itself lives in the assets ledger; only the sponsorship pool value and
/// the unclaimed referral rewards are tracked here.
#[derive(
  Clone,
  Encode,
  Decode,
  DecodeWithMemTracking,
  Eq,
  PartialEq,
  RuntimeDebug,
  TypeInfo,
  MaxEncodedLen,
)]
pub struct PlayerRecord<BlockNumber> {
  /// Cell currently occupied by the player
  pub coords: Coordinates,
  /// Game tokens held in escrow on behalf of the player's sponsors
  pub sponsorships: Balance,
  /// Referral rewards in native currency awaiting a claim
  pub claimable: Balance,
  /// Block of the player's last move (`None` before the first one)
  pub last_attack: Option<BlockNumber>,
  /// Block at which the player was last slashed
  pub last_attacked: Option<BlockNumber>,
  /// Per-player emission index at the last settlement
  pub emission_index: Balance,
}

impl<BlockNumber> PlayerRecord<BlockNumber> {
  pub fn new(coords: Coordinates, emission_index: Balance) -> Self {
    Self {
      coords,
      sponsorships: 0,
      claimable: 0,
      last_attack: None,
      last_attacked: None,
      emission_index,
    }
  }
}

/// Snapshot of a single player, as returned by the read model.
///
/// `balance` includes emission accrued but not minted yet.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct PlayerData<AccountId> {
  pub who: AccountId,
  pub coords: Coordinates,
  pub balance: Balance,
  pub sponsorships: Balance,
  pub claimable: Balance,
  pub sponsorship_shares: Balance,
}

/// Full board snapshot: `lands[realm][row][column]` plus every player in join order.
#[derive(Clone, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct GameData<AccountId> {
  pub lands: Vec<Vec<Vec<Option<AccountId>>>>,
  pub players: Vec<PlayerData<AccountId>>,
}

/// Outcome of a successful attack, in the shape reported by `Event::Slashed`.
#[derive(Clone, Copy, Default, Eq, PartialEq, RuntimeDebug)]
pub struct SlashOutcome {
  pub subtracted_from_attacked_balance: Balance,
  pub subtracted_from_attacked_sponsorships: Balance,
  pub slashing_taxes: Balance,
  pub added_to_attacker_balance: Balance,
  pub added_to_attacker_sponsorships: Balance,
}

/// Certificate issuing interface used when a sponsorship is recorded.
///
/// `manager` is the account the game acts as when it asks the issuer for a certificate; the
/// issuer is expected to reject any other caller.
pub trait CertificateIssuer<AccountId, Balance> {
  fn issue(
    manager: &AccountId,
    sponsor: &AccountId,
    beneficiary: &AccountId,
    amount: Balance,
    shares: Balance,
  ) -> Result<CertificateId, DispatchError>;
}

impl<AccountId, Balance> CertificateIssuer<AccountId, Balance> for () {
  fn issue(
    _manager: &AccountId,
    _sponsor: &AccountId,
    _beneficiary: &AccountId,
    _amount: Balance,
    _shares: Balance,
  ) -> Result<CertificateId, DispatchError> {
    Ok(Default::default())
  }
}
