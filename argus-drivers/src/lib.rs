//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in argus-core for real panel hardware:
//!
//! - SPI to MIPI-DSI bridge transport (SSD2825)
//! - Liveness probes (bus-turnaround acknowledge, power-mode register)
//! - GPIO-driven clock/power gate

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod gate;
pub mod probe;
