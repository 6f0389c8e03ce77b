//! Obuscope - AV1 OBU bitstream inspector
//!
//! This library crate exposes the configuration and reporting layers for
//! integration testing. Bitstream parsing lives in `obuscope-split`.

pub mod config;
pub mod report;
