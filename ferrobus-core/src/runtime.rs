//! Runtime facade
//!
//! Ties the registry, resolver, and per-bus transaction engines into the
//! open/read/write surface applications use. Each bus's [`BusPort`] sits
//! behind its own mutex, so requests to different buses proceed in parallel
//! while a second request to a busy bus is rejected with
//! [`TransferError::Busy`] rather than queued. Rejection keeps this layer
//! agnostic to whether callers run on threads or a cooperative scheduler; a
//! caller that wants queuing puts its own queue in front.

use embedded_hal::delay::DelayNs;
use ferrobus_hal::RawI2c;
use heapless::Vec;
use spin::Mutex;

use crate::config::{BusRole, ConfigError, DeviceDescriptor};
use crate::engine::{BusPort, TransferError};
use crate::registry::{BusRegistry, MAX_BUSES};
use crate::resolver::{self, Resolved, ResolveError};

/// An opened device
///
/// Produced by [`BusRuntime::open`]; carries the resolved bus/device
/// position so repeated transfers skip path parsing. A handle is only
/// meaningful with the runtime that opened it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceHandle {
    bus: usize,
    device: usize,
}

/// The I2C device-management runtime
///
/// Owns the bus registry and one transaction engine per registered bus, in
/// registration order. Built once at startup; the descriptor table never
/// changes afterwards.
pub struct BusRuntime<B, D> {
    registry: BusRegistry,
    ports: Vec<Mutex<BusPort<B, D>>, MAX_BUSES>,
}

impl<B: RawI2c, D: DelayNs> BusRuntime<B, D> {
    /// Create the runtime from a populated registry and one port per bus
    ///
    /// Ports must be supplied in registration order. A length mismatch is a
    /// startup configuration error ([`ConfigError::CountMismatch`]).
    pub fn new(
        registry: BusRegistry,
        ports: Vec<BusPort<B, D>, MAX_BUSES>,
    ) -> Result<Self, ConfigError> {
        if ports.len() != registry.count() {
            return Err(ConfigError::CountMismatch);
        }
        let ports = ports.into_iter().map(Mutex::new).collect();
        Ok(Self { registry, ports })
    }

    /// The descriptor table this runtime was built from
    pub fn registry(&self) -> &BusRegistry {
        &self.registry
    }

    /// Resolve a path to its descriptors without opening it
    pub fn resolve(&self, path: &str) -> Result<Resolved<'_>, ResolveError> {
        resolver::resolve(&self.registry, path)
    }

    /// Open a device by `<driver_name>/<device_name>` path
    pub fn open(&self, path: &str) -> Result<DeviceHandle, ResolveError> {
        match resolver::locate(&self.registry, path)? {
            (bus, Some(device)) => Ok(DeviceHandle { bus, device }),
            // A slave bus is a peer, not an openable device
            (_, None) => Err(ResolveError::BusIsSlave),
        }
    }

    /// Open a device by `(driver_name, numeric id)`
    pub fn open_by_id(&self, driver_name: &str, id: u8) -> Result<DeviceHandle, ResolveError> {
        let bus = self
            .registry
            .bus_index(driver_name)
            .ok_or(ResolveError::UnknownBus)?;
        let desc = self.registry.get(bus).ok_or(ResolveError::UnknownBus)?;
        if desc.role() == BusRole::Slave {
            return Err(ResolveError::BusIsSlave);
        }
        desc.devices()
            .iter()
            .position(|d| d.id() == id)
            .map(|device| DeviceHandle { bus, device })
            .ok_or(ResolveError::UnknownDevice)
    }

    /// Read `buf.len()` bytes from the device at `path`, starting at `address`
    pub fn read(
        &self,
        path: &str,
        address: u32,
        buf: &mut [u8],
    ) -> Result<(), TransferError<B::Error>> {
        let handle = self.open(path)?;
        self.read_at(&handle, address, buf)
    }

    /// Write `data` to the device at `path`, starting at `address`
    pub fn write(
        &self,
        path: &str,
        address: u32,
        data: &[u8],
    ) -> Result<(), TransferError<B::Error>> {
        let handle = self.open(path)?;
        self.write_at(&handle, address, data)
    }

    /// Read through an opened handle
    pub fn read_at(
        &self,
        handle: &DeviceHandle,
        address: u32,
        buf: &mut [u8],
    ) -> Result<(), TransferError<B::Error>> {
        let (device, port) = self.lookup(handle)?;
        let mut port = port.try_lock().ok_or(TransferError::Busy)?;
        port.read(device, address, buf)
    }

    /// Write through an opened handle
    pub fn write_at(
        &self,
        handle: &DeviceHandle,
        address: u32,
        data: &[u8],
    ) -> Result<(), TransferError<B::Error>> {
        let (device, port) = self.lookup(handle)?;
        let mut port = port.try_lock().ok_or(TransferError::Busy)?;
        port.write(device, address, data)
    }

    /// Whether a bus currently has a transaction in flight
    ///
    /// Reads the lock state without acquiring it, so polling this never
    /// contends with a transfer on the same bus.
    pub fn is_busy(&self, driver_name: &str) -> Result<bool, ResolveError> {
        let index = self
            .registry
            .bus_index(driver_name)
            .ok_or(ResolveError::UnknownBus)?;
        let busy = self
            .ports
            .get(index)
            .map(|p| p.is_locked())
            .unwrap_or(false);
        Ok(busy)
    }

    fn lookup(
        &self,
        handle: &DeviceHandle,
    ) -> Result<(&DeviceDescriptor, &Mutex<BusPort<B, D>>), TransferError<B::Error>> {
        let bus = self
            .registry
            .get(handle.bus)
            .ok_or(TransferError::Resolve(ResolveError::UnknownBus))?;
        let device = bus
            .devices()
            .get(handle.device)
            .ok_or(TransferError::Resolve(ResolveError::UnknownDevice))?;
        let port = self
            .ports
            .get(handle.bus)
            .ok_or(TransferError::Resolve(ResolveError::UnknownBus))?;
        Ok((device, port))
    }
}
