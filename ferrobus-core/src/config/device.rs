//! Device descriptor
//!
//! One record per slave device reachable on a master bus: addressing range,
//! address encoding width, and write-throttling parameters.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ConfigError, MAX_NAME_LEN};

/// Raw device configuration as an external loader produces it
///
/// Unvalidated input form; convert with [`DeviceDescriptor::try_from`] to
/// get the checked, immutable descriptor the rest of the layer works with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Device name, unique within its bus (e.g. "eeprom")
    pub name: String<MAX_NAME_LEN>,
    /// Highest valid address offset; 0..=max_address is addressable, no gaps
    pub max_address: u32,
    /// Input buffer size in bytes; writes pause after this many bytes.
    /// 0 disables throttling entirely.
    pub max_input_buffer: usize,
    /// Pause in ms after each max_input_buffer-sized chunk
    pub write_delay_ms: u32,
    /// Numeric device id, unique within its bus (low-level addressing)
    pub id: u8,
    /// Bytes used to encode an in-device address (1..=4)
    pub address_width: u8,
}

/// Validated description of one slave device on a master bus
///
/// Construction enforces the descriptor invariants; fields are private so a
/// descriptor that exists is always consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceDescriptor {
    name: String<MAX_NAME_LEN>,
    max_address: u32,
    max_input_buffer: usize,
    write_delay_ms: u32,
    id: u8,
    address_width: u8,
}

impl DeviceDescriptor {
    /// Create a validated device descriptor
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NameTooLong`] if `name` exceeds [`MAX_NAME_LEN`]
    /// - [`ConfigError::InvalidAddressWidth`] if `address_width` is outside
    ///   1..=4 or cannot encode `max_address`
    /// - [`ConfigError::InconsistentDelayPolicy`] if a delay is configured
    ///   while `max_input_buffer` is 0
    pub fn new(
        name: &str,
        max_address: u32,
        max_input_buffer: usize,
        write_delay_ms: u32,
        id: u8,
        address_width: u8,
    ) -> Result<Self, ConfigError> {
        let name = String::try_from(name).map_err(|_| ConfigError::NameTooLong)?;

        if address_width == 0 || address_width > 4 {
            return Err(ConfigError::InvalidAddressWidth);
        }
        // address_width bytes must be able to encode the full range
        if address_width < 4 && (max_address >> (8 * u32::from(address_width))) != 0 {
            return Err(ConfigError::InvalidAddressWidth);
        }
        if max_input_buffer == 0 && write_delay_ms != 0 {
            return Err(ConfigError::InconsistentDelayPolicy);
        }

        Ok(Self {
            name,
            max_address,
            max_input_buffer,
            write_delay_ms,
            id,
            address_width,
        })
    }

    /// Device name, unique within its bus
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Highest valid address offset
    pub fn max_address(&self) -> u32 {
        self.max_address
    }

    /// Write chunk size in bytes; 0 means throttling is disabled
    pub fn max_input_buffer(&self) -> usize {
        self.max_input_buffer
    }

    /// Pause after each full chunk, in milliseconds
    pub fn write_delay_ms(&self) -> u32 {
        self.write_delay_ms
    }

    /// Numeric device id for low-level addressing
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Bytes used to encode an in-device address
    pub fn address_width(&self) -> u8 {
        self.address_width
    }
}

impl TryFrom<&DeviceConfig> for DeviceDescriptor {
    type Error = ConfigError;

    fn try_from(cfg: &DeviceConfig) -> Result<Self, ConfigError> {
        Self::new(
            &cfg.name,
            cfg.max_address,
            cfg.max_input_buffer,
            cfg.write_delay_ms,
            cfg.id,
            cfg.address_width,
        )
    }
}
