use alloc::vec::Vec;
use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame::deps::sp_runtime::{DispatchError, RuntimeDebug};
use scale_info::TypeInfo;

pub use primitives::CertificateId;

/// Balance of the game asset.
pub type Balance = u128;

/// A sponsorship receipt.
///
/// `amount` and `shares` are fixed at emission; `redeemed` and `redeemed_shares` grow with every
/// (partial) redemption until all shares are redeemed and the certificate is closed.
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
pub struct Certificate<AccountId> {
  /// Account that paid the sponsorship
  pub sponsor: AccountId,
  /// Player whose sponsorship pool received the tokens
  pub receiver: AccountId,
  /// Tokens escrowed at emission
  pub amount: Balance,
  /// Tokens paid out by redemptions so far
  pub redeemed: Balance,
  /// Pool shares minted at emission
  pub shares: Balance,
  /// Pool shares already redeemed
  pub redeemed_shares: Balance,
  /// Set once every share has been redeemed
  pub closed: bool,
}

impl<AccountId> Certificate<AccountId> {
  pub fn remaining_shares(&self) -> Balance {
    self.shares.saturating_sub(self.redeemed_shares)
  }
}

/// Certificates related to an account.
#[derive(Clone, Default, Encode, Decode, Eq, PartialEq, RuntimeDebug, TypeInfo)]
pub struct UserCertificates {
  /// Every certificate the account owns, closed ones included
  pub owned: Vec<CertificateId>,
  /// Open certificates whose sponsorship the account received
  pub beneficiary: Vec<CertificateId>,
}

/// Redeems sponsorship shares on the game side.
///
/// `emitter` is the certificate pallet account; the game only honours redemptions coming from the
/// emitter it was configured with. Returns the token value paid to `owner`.
pub trait SponsorshipRedeemer<AccountId, Balance> {
  fn redeem_shares(
    emitter: &AccountId,
    owner: &AccountId,
    beneficiary: &AccountId,
    shares: Balance,
  ) -> Result<Balance, DispatchError>;
}

/// Renders the metadata document of a certificate.
///
/// `factory` is the governance-configured renderer identity, if any.
pub trait CertificateMetadata<AccountId> {
  fn render(
    factory: Option<&AccountId>,
    id: CertificateId,
    certificate: &Certificate<AccountId>,
  ) -> Vec<u8>;
}

impl<AccountId> CertificateMetadata<AccountId> for () {
  fn render(
    _factory: Option<&AccountId>,
    _id: CertificateId,
    _certificate: &Certificate<AccountId>,
  ) -> Vec<u8> {
    Vec::new()
  }
}
