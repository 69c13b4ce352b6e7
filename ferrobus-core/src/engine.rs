//! Transaction engine
//!
//! Drives validated byte transfers against one bus: range checks against the
//! device descriptor, big-endian address serialization, and write throttling
//! (chunking with a blocking inter-chunk pause sized to the device's input
//! buffer absorption time).
//!
//! A [`BusPort`] is a single bus's engine state; serializing access to it is
//! the caller's job (see [`crate::runtime::BusRuntime`] for the mutex-guarded
//! facade).

use embedded_hal::delay::DelayNs;
use ferrobus_hal::RawI2c;

use crate::config::DeviceDescriptor;
use crate::resolver::ResolveError;

/// Transfer errors returned to the immediate caller
///
/// None of these are retried internally; whether an [`Io`](Self::Io) failure
/// warrants a retry is bus-specific and up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError<E> {
    /// The request path did not resolve to a device
    Resolve(ResolveError),
    /// Address range check failed; the raw primitive was never reached
    OutOfRange {
        /// Requested start address
        address: u32,
        /// Requested transfer length
        len: usize,
        /// Highest valid address for the device
        max_address: u32,
    },
    /// The raw transfer failed; propagated unmodified
    Io(E),
    /// The bus is mid-transaction; the request was rejected, not queued
    Busy,
}

impl<E> From<ResolveError> for TransferError<E> {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

/// Per-bus transfer state
///
/// `Delaying` is only entered during the inter-chunk pause of a throttled
/// write. The port returns to `Idle` on completion and on failure alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortState {
    /// No transaction in flight
    Idle,
    /// A raw transfer is being driven
    Transferring,
    /// Pausing between write chunks
    Delaying,
}

/// Device-internal address serialized big-endian into exactly
/// `address_width` bytes
struct AddressBytes {
    buf: [u8; 4],
    skip: usize,
}

impl AddressBytes {
    fn new(address: u32, width: u8) -> Self {
        Self {
            buf: address.to_be_bytes(),
            skip: 4 - usize::from(width),
        }
    }

    fn as_slice(&self) -> &[u8] {
        &self.buf[self.skip..]
    }
}

/// Transaction engine for one bus
///
/// Owns the bus's raw transfer handle and delay provider. All transfers
/// validate against the device descriptor before touching the hardware.
pub struct BusPort<B, D> {
    raw: B,
    delay: D,
    state: PortState,
}

impl<B: RawI2c, D: DelayNs> BusPort<B, D> {
    /// Create a port from a raw bus handle and a delay provider
    pub fn new(raw: B, delay: D) -> Self {
        Self {
            raw,
            delay,
            state: PortState::Idle,
        }
    }

    /// Current engine state
    pub fn state(&self) -> PortState {
        self.state
    }

    /// Direct access to the raw bus handle; bypasses descriptor validation
    pub(crate) fn raw_mut(&mut self) -> &mut B {
        &mut self.raw
    }

    /// Read `buf.len()` bytes starting at `address`
    ///
    /// Exactly one raw transfer on success. A zero-length read validates the
    /// address and returns without touching the bus.
    pub fn read(
        &mut self,
        device: &DeviceDescriptor,
        address: u32,
        buf: &mut [u8],
    ) -> Result<(), TransferError<B::Error>> {
        check_range(device, address, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }

        self.state = PortState::Transferring;
        let addr = AddressBytes::new(address, device.address_width());
        let result = self
            .raw
            .write_read(device.id(), addr.as_slice(), buf)
            .map_err(TransferError::Io);
        self.state = PortState::Idle;
        result
    }

    /// Write `data` starting at `address`
    ///
    /// With `max_input_buffer == 0` the whole payload goes out as one raw
    /// transfer. Otherwise the payload is sliced into chunks of at most
    /// `max_input_buffer` bytes; after every chunk except the last the port
    /// pauses `write_delay_ms` so the device can absorb its input buffer.
    /// Each chunk is prefixed with the device address advanced by the bytes
    /// already written.
    pub fn write(
        &mut self,
        device: &DeviceDescriptor,
        address: u32,
        data: &[u8],
    ) -> Result<(), TransferError<B::Error>> {
        check_range(device, address, data.len())?;
        if data.is_empty() {
            return Ok(());
        }

        self.state = PortState::Transferring;
        let result = self.write_chunks(device, address, data);
        self.state = PortState::Idle;
        result
    }

    fn write_chunks(
        &mut self,
        device: &DeviceDescriptor,
        address: u32,
        data: &[u8],
    ) -> Result<(), TransferError<B::Error>> {
        let chunk_len = match device.max_input_buffer() {
            0 => data.len(),
            n => n,
        };

        let mut sent = 0;
        for chunk in data.chunks(chunk_len) {
            let addr = AddressBytes::new(address + sent as u32, device.address_width());
            self.raw
                .write(device.id(), addr.as_slice(), chunk)
                .map_err(TransferError::Io)?;
            sent += chunk.len();

            if sent < data.len() && device.write_delay_ms() > 0 {
                self.state = PortState::Delaying;
                self.delay.delay_ms(device.write_delay_ms());
                self.state = PortState::Transferring;
            }
        }
        Ok(())
    }
}

/// Range gate: `address + len - 1` must stay within the device's declared
/// address range. Rejected requests never reach the raw primitive.
fn check_range<E>(
    device: &DeviceDescriptor,
    address: u32,
    len: usize,
) -> Result<(), TransferError<E>> {
    let max = u64::from(device.max_address());
    let last = u64::from(address) + (len as u64).saturating_sub(1);
    if last > max {
        return Err(TransferError::OutOfRange {
            address,
            len,
            max_address: device.max_address(),
        });
    }
    Ok(())
}
