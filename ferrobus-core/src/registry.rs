//! Bus registry
//!
//! The fixed collection of all configured buses. Built once during startup,
//! cross-checked against the configuration's declared bus count, and
//! read-only afterwards.

use heapless::Vec;

use crate::config::{BusDescriptor, ConfigError};

/// Maximum buses in one registry
pub const MAX_BUSES: usize = 4;

/// Ordered, fixed set of bus descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusRegistry {
    buses: Vec<BusDescriptor, MAX_BUSES>,
}

impl BusRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { buses: Vec::new() }
    }

    /// Register a bus
    ///
    /// On any error the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DuplicateBusName`] if a bus with the same driver
    ///   name is already registered
    /// - [`ConfigError::TooManyBuses`] past [`MAX_BUSES`]
    pub fn register(&mut self, bus: BusDescriptor) -> Result<(), ConfigError> {
        if self.find_bus(bus.driver_name()).is_some() {
            return Err(ConfigError::DuplicateBusName);
        }
        self.buses.push(bus).map_err(|_| ConfigError::TooManyBuses)
    }

    /// Look up a bus by its driver name
    pub fn find_bus(&self, driver_name: &str) -> Option<&BusDescriptor> {
        self.buses.iter().find(|b| b.driver_name() == driver_name)
    }

    /// Index of a bus in registration order
    pub fn bus_index(&self, driver_name: &str) -> Option<usize> {
        self.buses
            .iter()
            .position(|b| b.driver_name() == driver_name)
    }

    /// Bus at the given registration index
    pub fn get(&self, index: usize) -> Option<&BusDescriptor> {
        self.buses.get(index)
    }

    /// Number of registered buses
    pub fn count(&self) -> usize {
        self.buses.len()
    }

    /// Iterate over buses in registration order
    pub fn iter(&self) -> impl Iterator<Item = &BusDescriptor> {
        self.buses.iter()
    }

    /// Cross-check against the configuration's declared bus count
    ///
    /// Called once at the end of startup; a mismatch means the static table
    /// and the registration calls drifted apart, and initialization must
    /// abort rather than run with a truncated topology.
    pub fn check_count(&self, expected: usize) -> Result<(), ConfigError> {
        if self.count() == expected {
            Ok(())
        } else {
            Err(ConfigError::CountMismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DeviceDescriptor, SlavePeerConfig};

    fn master(driver: &str) -> BusDescriptor {
        let eeprom = DeviceDescriptor::new("eeprom", 255, 16, 10, 20, 2).unwrap();
        BusDescriptor::master(driver, &[eeprom]).unwrap()
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = BusRegistry::new();
        registry.register(master("/dev/i2c/0")).unwrap();
        registry
            .register(BusDescriptor::slave("/dev/i2c/1", SlavePeerConfig::new()).unwrap())
            .unwrap();

        assert_eq!(registry.count(), 2);
        assert!(registry.find_bus("/dev/i2c/0").is_some());
        assert!(registry.find_bus("/dev/i2c/2").is_none());
        assert_eq!(registry.bus_index("/dev/i2c/1"), Some(1));
        assert_eq!(registry.get(0).unwrap().driver_name(), "/dev/i2c/0");
    }

    #[test]
    fn test_duplicate_bus_name_leaves_registry_unchanged() {
        let mut registry = BusRegistry::new();
        registry.register(master("/dev/i2c/0")).unwrap();

        let before = registry.clone();
        let result = registry.register(master("/dev/i2c/0"));
        assert_eq!(result, Err(ConfigError::DuplicateBusName));
        assert_eq!(registry, before);
    }

    #[test]
    fn test_capacity_limit() {
        let mut registry = BusRegistry::new();
        for i in 0..MAX_BUSES {
            let mut name = heapless::String::<32>::try_from("/dev/i2c/").unwrap();
            name.push((b'0' + i as u8) as char).unwrap();
            registry.register(master(&name)).unwrap();
        }
        let result = registry.register(master("/dev/i2c/9"));
        assert_eq!(result, Err(ConfigError::TooManyBuses));
        assert_eq!(registry.count(), MAX_BUSES);
    }

    #[test]
    fn test_count_check() {
        let mut registry = BusRegistry::new();
        registry.register(master("/dev/i2c/0")).unwrap();

        assert!(registry.check_count(1).is_ok());
        assert_eq!(registry.check_count(2), Err(ConfigError::CountMismatch));
    }
}
