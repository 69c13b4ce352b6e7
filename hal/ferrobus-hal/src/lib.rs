//! Ferrobus Hardware Abstraction Layer
//!
//! This crate defines the raw I2C transfer primitive that chip-specific
//! controller drivers implement. The device-management layer in
//! `ferrobus-core` is written against these traits only, so the same
//! registry/engine code runs on any platform with an I2C controller driver.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application / higher-level drivers     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrobus-core (registry + engine)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ferrobus-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip-specific I2C controller driver    │
//! └─────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;

// Re-export key traits at crate root for convenience
pub use i2c::RawI2c;
