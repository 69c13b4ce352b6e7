//! Device resolver
//!
//! Maps a path of the form `<driver_name>/<device_name>` to the descriptors
//! the transaction engine needs. Driver names may themselves contain `/`
//! (e.g. "/dev/i2c/0"), so the bus is matched as the longest registered
//! driver-name prefix and the remainder is the device name.
//!
//! Resolution is pure and never blocks.

use crate::config::{BusDescriptor, BusRole, DeviceDescriptor};
use crate::registry::BusRegistry;

/// Path resolution errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResolveError {
    /// No registered bus matches the path
    UnknownBus,
    /// The bus exists but has no device with that name (or id)
    UnknownDevice,
    /// The path addresses a device on a slave-role bus; device lookup is
    /// only defined for master buses
    BusIsSlave,
}

/// Result of a successful path resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolved<'a> {
    /// A device on a master bus
    Device(&'a BusDescriptor, &'a DeviceDescriptor),
    /// A slave-role bus addressed by its driver name alone; this node is the
    /// addressed peer, there is no device descriptor
    Peer(&'a BusDescriptor),
}

/// Locate a path as (bus index, device index); `None` device index means the
/// path named a slave bus itself.
pub(crate) fn locate(
    registry: &BusRegistry,
    path: &str,
) -> Result<(usize, Option<usize>), ResolveError> {
    // Longest-prefix match; an exact driver-name match is the longest
    // possible prefix and wins outright.
    let mut best: Option<(usize, &BusDescriptor, &str)> = None;
    for (index, bus) in registry.iter().enumerate() {
        if path == bus.driver_name() {
            return match bus.role() {
                BusRole::Slave => Ok((index, None)),
                // A master bus path without a device segment names nothing
                BusRole::Master => Err(ResolveError::UnknownDevice),
            };
        }
        let rest = path
            .strip_prefix(bus.driver_name())
            .and_then(|r| r.strip_prefix('/'));
        if let Some(rest) = rest {
            let longer = best
                .map(|(_, b, _)| bus.driver_name().len() > b.driver_name().len())
                .unwrap_or(true);
            if longer {
                best = Some((index, bus, rest));
            }
        }
    }

    let (index, bus, device_name) = best.ok_or(ResolveError::UnknownBus)?;
    match bus.role() {
        BusRole::Slave => Err(ResolveError::BusIsSlave),
        BusRole::Master => bus
            .devices()
            .iter()
            .position(|d| d.name() == device_name)
            .map(|dev_index| (index, Some(dev_index)))
            .ok_or(ResolveError::UnknownDevice),
    }
}

/// Resolve a `<driver_name>/<device_name>` path against the registry
pub fn resolve<'a>(registry: &'a BusRegistry, path: &str) -> Result<Resolved<'a>, ResolveError> {
    let (bus_index, dev_index) = locate(registry, path)?;
    // Indices come straight from the registry, so the lookups cannot miss
    let bus = registry.get(bus_index).ok_or(ResolveError::UnknownBus)?;
    match dev_index {
        None => Ok(Resolved::Peer(bus)),
        Some(d) => bus
            .devices()
            .get(d)
            .map(|dev| Resolved::Device(bus, dev))
            .ok_or(ResolveError::UnknownDevice),
    }
}

/// Resolve a device by `(driver_name, numeric id)` instead of by path
///
/// Secondary lookup for physical protocols that select devices numerically.
pub fn resolve_by_id<'a>(
    registry: &'a BusRegistry,
    driver_name: &str,
    id: u8,
) -> Result<(&'a BusDescriptor, &'a DeviceDescriptor), ResolveError> {
    let bus = registry
        .find_bus(driver_name)
        .ok_or(ResolveError::UnknownBus)?;
    if bus.role() == BusRole::Slave {
        return Err(ResolveError::BusIsSlave);
    }
    bus.find_device_by_id(id)
        .map(|dev| (bus, dev))
        .ok_or(ResolveError::UnknownDevice)
}
