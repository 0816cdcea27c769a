#![cfg_attr(not(feature = "std"), no_std)]

pub mod ecosystem;
pub mod game;

pub use ecosystem::*;
pub use game::*;
