//! Configuration descriptors
//!
//! Immutable, validated records describing the static I2C topology: which
//! buses exist, their role, and the devices reachable on each master bus.
//! Everything here is checked once at construction; after that the
//! descriptors never change for the process lifetime.
//!
//! Parsing a configuration file into these types is an external loader's
//! job; this module only defines the validated forms (and, with the `serde`
//! feature, the raw input form loaders deserialize into).

pub mod bus;
pub mod device;

pub use bus::{BusDescriptor, BusRole, SlavePeerConfig, MAX_DEVICES_PER_BUS};
pub use device::{DeviceConfig, DeviceDescriptor};

/// Maximum length of a bus driver name or device name
pub const MAX_NAME_LEN: usize = 32;

/// Startup configuration errors
///
/// All of these are fatal: the offending descriptor is rejected and
/// initialization must not proceed with a partial table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `address_width` is 0, larger than 4, or too narrow for `max_address`
    InvalidAddressWidth,
    /// Two devices on the same bus share a name
    DuplicateDeviceName,
    /// Two devices on the same bus share a numeric id
    DuplicateDeviceId,
    /// `write_delay_ms` is set while `max_input_buffer` is 0
    InconsistentDelayPolicy,
    /// Two buses share a driver name
    DuplicateBusName,
    /// Declared bus count disagrees with the registered buses
    CountMismatch,
    /// Name exceeds [`MAX_NAME_LEN`]
    NameTooLong,
    /// More than [`MAX_DEVICES_PER_BUS`] devices on one bus
    TooManyDevices,
    /// More than [`crate::registry::MAX_BUSES`] buses registered
    TooManyBuses,
}
