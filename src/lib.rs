//! Movements and scoring for duplicate bridge pair games.
//!
//! This crate generates [Howell][movement::howell] and
//! [Mitchell][movement::mitchell] movements, checks them with
//! [`validate`][validate::validate], keeps them in a JSON
//! [store][store::ArrangementStore], and scores the results entered on the
//! travelers with match points and cross-IMPs.
#![warn(missing_docs)]

mod arrangement;
mod contract;
mod scoring;
mod seating;

pub mod movement;
pub mod store;
pub mod validate;

pub use arrangement::*;
pub use contract::*;
pub use scoring::*;
pub use seating::*;
