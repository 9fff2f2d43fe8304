//! Payload types for anviz
//!
//! Fixed-layout decoders and encoders for the payloads carried by the
//! clock, network and record commands.

pub mod datetime;
pub mod error;
pub mod net_params;
pub mod record_info;

pub use error::{Error, Result};
pub use net_params::{MacAddress, NetParams};
pub use record_info::RecordInfo;
