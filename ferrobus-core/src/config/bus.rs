//! Bus descriptor
//!
//! Groups one physical bus's driver handle name, its role, and either its
//! device list (master) or its peer configuration (slave). The role variants
//! are an enum, so a bus carrying both a device list and a slave peer config
//! is unrepresentable.

use heapless::{String, Vec};

use super::device::DeviceDescriptor;
use super::{ConfigError, MAX_NAME_LEN};

/// Maximum devices per master bus
pub const MAX_DEVICES_PER_BUS: usize = 8;

/// Role of a bus in the I2C topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRole {
    /// This node drives the bus and addresses slave devices on it
    Master,
    /// This node is itself addressed as a peripheral on the bus
    Slave,
}

/// Configuration of this node's behavior when addressed on a slave bus
///
/// The slave-side protocol is not defined yet, so this is an opaque
/// placeholder: it reserves the slot in the role enum without guessing at a
/// field set a future protocol may need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlavePeerConfig {
    _reserved: (),
}

impl SlavePeerConfig {
    /// Create the (currently empty) slave peer configuration
    pub const fn new() -> Self {
        Self { _reserved: () }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum BusKind {
    Master {
        devices: Vec<DeviceDescriptor, MAX_DEVICES_PER_BUS>,
    },
    Slave {
        peer: SlavePeerConfig,
    },
}

/// Validated description of one I2C bus
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusDescriptor {
    driver_name: String<MAX_NAME_LEN>,
    kind: BusKind,
}

impl BusDescriptor {
    /// Create a master bus descriptor with its device list
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NameTooLong`] if `driver_name` exceeds [`MAX_NAME_LEN`]
    /// - [`ConfigError::TooManyDevices`] if the list exceeds
    ///   [`MAX_DEVICES_PER_BUS`]
    /// - [`ConfigError::DuplicateDeviceName`] /
    ///   [`ConfigError::DuplicateDeviceId`] on a repeated name or id
    pub fn master(driver_name: &str, devices: &[DeviceDescriptor]) -> Result<Self, ConfigError> {
        let driver_name = String::try_from(driver_name).map_err(|_| ConfigError::NameTooLong)?;

        let mut list: Vec<DeviceDescriptor, MAX_DEVICES_PER_BUS> = Vec::new();
        for dev in devices {
            if list.iter().any(|d| d.name() == dev.name()) {
                return Err(ConfigError::DuplicateDeviceName);
            }
            if list.iter().any(|d| d.id() == dev.id()) {
                return Err(ConfigError::DuplicateDeviceId);
            }
            list.push(dev.clone())
                .map_err(|_| ConfigError::TooManyDevices)?;
        }

        Ok(Self {
            driver_name,
            kind: BusKind::Master { devices: list },
        })
    }

    /// Create a slave bus descriptor
    pub fn slave(driver_name: &str, peer: SlavePeerConfig) -> Result<Self, ConfigError> {
        let driver_name = String::try_from(driver_name).map_err(|_| ConfigError::NameTooLong)?;
        Ok(Self {
            driver_name,
            kind: BusKind::Slave { peer },
        })
    }

    /// Name of the underlying driver handle (e.g. "/dev/i2c/0")
    pub fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Role of this bus
    pub fn role(&self) -> BusRole {
        match self.kind {
            BusKind::Master { .. } => BusRole::Master,
            BusKind::Slave { .. } => BusRole::Slave,
        }
    }

    /// Devices on this bus, in declaration order (empty for a slave bus)
    pub fn devices(&self) -> &[DeviceDescriptor] {
        match &self.kind {
            BusKind::Master { devices } => devices,
            BusKind::Slave { .. } => &[],
        }
    }

    /// Slave peer configuration, if this is a slave bus
    pub fn peer(&self) -> Option<&SlavePeerConfig> {
        match &self.kind {
            BusKind::Master { .. } => None,
            BusKind::Slave { peer } => Some(peer),
        }
    }

    /// Look up a device on this bus by name
    pub fn find_device(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.devices().iter().find(|d| d.name() == name)
    }

    /// Look up a device on this bus by numeric id
    pub fn find_device_by_id(&self, id: u8) -> Option<&DeviceDescriptor> {
        self.devices().iter().find(|d| d.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(name: &str, id: u8) -> DeviceDescriptor {
        DeviceDescriptor::new(name, 255, 0, 0, id, 1).unwrap()
    }

    #[test]
    fn test_master_bus() {
        let bus =
            BusDescriptor::master("/dev/i2c/0", &[dev("eeprom", 20), dev("sensor", 10)]).unwrap();
        assert_eq!(bus.driver_name(), "/dev/i2c/0");
        assert_eq!(bus.role(), BusRole::Master);
        assert_eq!(bus.devices().len(), 2);
        assert!(bus.peer().is_none());
        assert_eq!(bus.find_device("sensor").unwrap().id(), 10);
        assert_eq!(bus.find_device_by_id(20).unwrap().name(), "eeprom");
    }

    #[test]
    fn test_slave_bus_has_no_devices() {
        let bus = BusDescriptor::slave("/dev/i2c/1", SlavePeerConfig::new()).unwrap();
        assert_eq!(bus.role(), BusRole::Slave);
        assert!(bus.devices().is_empty());
        assert!(bus.peer().is_some());
        assert!(bus.find_device("eeprom").is_none());
    }

    #[test]
    fn test_duplicate_device_name_rejected() {
        let result = BusDescriptor::master("/dev/i2c/0", &[dev("eeprom", 20), dev("eeprom", 21)]);
        assert_eq!(result.unwrap_err(), ConfigError::DuplicateDeviceName);
    }

    #[test]
    fn test_duplicate_device_id_rejected() {
        let result = BusDescriptor::master("/dev/i2c/0", &[dev("eeprom", 20), dev("sensor", 20)]);
        assert_eq!(result.unwrap_err(), ConfigError::DuplicateDeviceId);
    }

    #[test]
    fn test_too_many_devices() {
        let devices: heapless::Vec<DeviceDescriptor, 16> = (0..=MAX_DEVICES_PER_BUS as u8)
            .map(|i| {
                let mut name = String::<MAX_NAME_LEN>::try_from("dev").unwrap();
                name.push((b'a' + i) as char).unwrap();
                DeviceDescriptor::new(&name, 255, 0, 0, i, 1).unwrap()
            })
            .collect();
        let result = BusDescriptor::master("/dev/i2c/0", &devices);
        assert_eq!(result.unwrap_err(), ConfigError::TooManyDevices);
    }
}
