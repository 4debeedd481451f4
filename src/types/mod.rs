//! Core type definitions using newtype patterns for type safety.
//!
//! Address and port input is validated here so the scanner only ever sees
//! well-formed targets.

mod port;
mod target;

pub use port::{Port, PortError, PortList, PortRange};
pub use target::{AddressError, AddressSpec, HostTarget};
