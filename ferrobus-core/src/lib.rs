//! Board-agnostic core of the Ferrobus I2C device-management layer
//!
//! This crate contains everything between the application and the raw I2C
//! controller driver:
//!
//! - Validated bus/device descriptors (addressing and throttling parameters)
//! - The bus registry, fixed at startup
//! - Path-based device resolution (`<driver>/<device>`)
//! - The per-bus transaction engine (range checks, address serialization,
//!   write throttling)
//! - The [`runtime::BusRuntime`] facade tying them together
//!
//! The physical controller driver is supplied through the
//! [`ferrobus_hal::RawI2c`] trait and is out of scope here.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod registry;
pub mod resolver;
pub mod runtime;

// Re-export the key types at crate root for convenience
pub use config::{BusDescriptor, BusRole, ConfigError, DeviceDescriptor, SlavePeerConfig};
pub use engine::{BusPort, PortState, TransferError};
pub use registry::BusRegistry;
pub use resolver::{resolve, resolve_by_id, Resolved, ResolveError};
pub use runtime::{BusRuntime, DeviceHandle};
