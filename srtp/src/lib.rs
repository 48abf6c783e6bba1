#![warn(rust_2018_idioms)]
#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

pub mod backend;
mod cipher;
pub mod config;
pub mod context;
mod error;
pub mod header;
mod key_derivation;
pub mod option;
pub mod protection_profile;
pub mod session;

pub use error::{Error, Result};
pub use protection_profile::ProtectionProfile;
pub use session::{Direction, SrtpSession};
