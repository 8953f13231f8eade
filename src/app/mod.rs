//! Application core: pure domain logic, no I/O.
//!
//! This module contains the control loop of the weather station: input
//! handling, the network phase, sensor acquisition, alert evaluation and
//! screen rendering.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
