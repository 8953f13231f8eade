//! Weather station firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod alerts;
pub mod app;
pub mod calibration;
pub mod config;
pub mod error;
pub mod events;
pub mod net;
pub mod pins;
pub mod ui;

pub mod adapters;
pub mod drivers;
pub mod sensors;
