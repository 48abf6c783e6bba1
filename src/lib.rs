#![warn(rust_2018_idioms)]
#![allow(dead_code)]

// re-export sub-crates
pub use srtp;
pub use util;

pub mod api;
pub mod certificate;
pub mod dtls_transport;
pub mod error;
pub mod ice_transport;
pub mod jsep_transport;
pub mod rtcp_mux_filter;
pub mod sdp;
pub mod srtp_filter;
pub mod stats;

pub use error::{Error, Result};

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";
