//! # Domain Layer
//!
//! Pure domain logic for the Bond Ledger.
//!
//! ## Modules
//!
//! - `entities` - Bond and Transaction records, ledger status
//! - `keys` - State store keys and identifier formats
//! - `config` - Ledger configuration and authorization policy
//! - `errors` - Domain error types
//! - `identity` - Caller certificate verification against the issuer

pub mod config;
pub mod entities;
pub mod errors;
pub mod identity;
pub mod keys;
