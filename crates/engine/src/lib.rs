//! Reserve-accounting engine for a redeemable investment vault
//!
//! Depositors receive a position redeemable at original par value over a
//! decaying window; idle capital is swept between a liquid reserve and a
//! yield reserve; a performance fee is charged above a historical high-water
//! mark. The reserves and token ledgers are injected capabilities - see
//! [`adapters`] - and every reserve interaction goes through the verified
//! [`gateway`] chokepoint.

pub mod adapters;
pub mod error;
pub mod events;
pub mod gateway;
pub mod params;
pub mod state;
pub mod vault;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use adapters::*;
pub use error::*;
pub use events::Event;
pub use params::*;
pub use state::*;
pub use vault::*;

pub use pinocchio::pubkey::Pubkey;
