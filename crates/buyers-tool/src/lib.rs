//! Deterministic decision engine for scratch-and-dent appliance purchases.
//!
//! [`compiler::compile`] turns a [`compiler::BuyerInput`] into a recommendation plus a complete
//! rule trace. The surrounding modules supply configuration, logging, errors, and an HTTP
//! surface for hosting the compiler as a service.

pub mod compiler;
pub mod config;
pub mod error;
pub mod telemetry;
