pub mod connection_role;
pub mod crypto_params;
pub mod sdp_type;
pub mod transport_description;

pub use connection_role::ConnectionRole;
pub use crypto_params::CryptoParams;
pub use sdp_type::SdpType;
pub use transport_description::{ContentSource, JsepTransportDescription, TransportDescription};
