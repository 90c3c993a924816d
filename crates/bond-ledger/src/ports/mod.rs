//! # Ports Layer
//!
//! Defines the port traits for the Bond Ledger.
//!
//! ## Hexagonal Architecture
//!
//! - `inbound.rs` - Driving ports (operations exposed to callers)
//! - `outbound.rs` - Driven ports (state store and clock the host provides)

pub mod inbound;
pub mod outbound;
