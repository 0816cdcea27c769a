use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::Percent;

/// Sequential identifier of a sponsorship certificate (first certificate is `1`).
pub type CertificateId = u64;

/// Address of a single cell inside the pyramid of a realm.
///
/// Row `0` is the apex and holds a single cell; row `i` holds `i + 1` cells, so a valid
/// coordinate always satisfies `column <= row`.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Default,
  Encode,
  Eq,
  MaxEncodedLen,
  Ord,
  PartialEq,
  PartialOrd,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct Coordinates {
  pub realm: u32,
  pub row: u32,
  pub column: u32,
}

impl Coordinates {
  pub const fn new(realm: u32, row: u32, column: u32) -> Self {
    Self { realm, row, column }
  }

  /// Classify a move from `self` to `target` on the triangular lattice.
  ///
  /// A cell `(r, c)` touches `(r, c - 1)` and `(r, c + 1)` on its own row, `(r - 1, c - 1)` and
  /// `(r - 1, c)` towards the apex, and `(r + 1, c)` and `(r + 1, c + 1)` away from it.
  pub fn step_to(&self, target: &Coordinates) -> Step {
    if self == target {
      return Step::Stay;
    }
    if self.realm != target.realm {
      return Step::TooFar;
    }
    let (row, column) = (self.row as i64, self.column as i64);
    let (t_row, t_column) = (target.row as i64, target.column as i64);
    match (t_row - row, t_column - column) {
      (0, -1) | (0, 1) => Step::SameRow,
      (-1, -1) | (-1, 0) => Step::TowardsApex,
      (1, 0) | (1, 1) => Step::AwayFromApex,
      _ => Step::TooFar,
    }
  }
}

/// `floor(amount * percentage / 100)`; percentages above 100 saturate to 100.
pub fn percent_of(amount: u128, percentage: u8) -> u128 {
  Percent::from_percent(percentage).mul_floor(amount)
}

/// Relation between two cells, as seen by a player trying to move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Step {
  /// Source and target are the same cell.
  Stay,
  /// Horizontal neighbour.
  SameRow,
  /// Neighbour on the row closer to the apex.
  TowardsApex,
  /// Neighbour on the row further from the apex.
  AwayFromApex,
  /// Not a neighbour (different realm or more than one step away).
  TooFar,
}
