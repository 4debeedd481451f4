//! Configuration management for netsweep.
//!
//! Provides XDG-compliant settings storage for the probe binary, pool size
//! and timeouts.

mod settings;

pub use settings::{Paths, ScannerSettings};
