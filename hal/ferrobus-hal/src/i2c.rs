//! Raw I2C transfer primitive
//!
//! Provides the trait that chip-specific I2C controller drivers implement.
//! One implementor instance corresponds to one physical bus handle; the
//! device-management layer never talks to the hardware except through it.
//!
//! Electrical-level concerns (clocking, ACK/NACK, arbitration) live entirely
//! inside the implementor. The layer above only deals in bytes.

/// Raw byte-level transfer operations for one I2C bus
///
/// `device` is the controller-level selector for the target peripheral
/// (the numeric id from its descriptor). `addr` is the already-serialized
/// device-internal address prefix; implementors send it on the wire ahead
/// of the payload without interpreting it.
pub trait RawI2c {
    /// Error type reported by the controller driver
    type Error;

    /// Write the address prefix followed by `data` in one transaction
    fn write(&mut self, device: u8, addr: &[u8], data: &[u8]) -> Result<(), Self::Error>;

    /// Write the address prefix, then read `buf.len()` bytes in the same
    /// transaction (repeated start)
    fn write_read(&mut self, device: u8, addr: &[u8], buf: &mut [u8]) -> Result<(), Self::Error>;
}
