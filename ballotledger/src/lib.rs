#[macro_use]
extern crate serde;

#[macro_use]
mod serde_hex;

mod accumulator;
mod attestation;
mod batch;
mod config;
mod election;
mod error;
mod hash;
mod identifier;
mod ledger;
mod nullifier;
mod summary;
mod tally;
mod util;
mod voter;

pub use accumulator::*;
pub use attestation::*;
pub use batch::*;
pub use config::*;
pub use election::*;
pub use error::*;
pub use hash::*;
pub use identifier::*;
pub use ledger::*;
pub use nullifier::*;
pub use summary::*;
pub use tally::*;
pub use util::*;
pub use voter::*;
