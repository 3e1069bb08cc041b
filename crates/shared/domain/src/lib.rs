//! # Domain Models
//!
//! Pure domain types shared by every Brigade slice. Keep this crate lean:
//! no I/O, no networking, no vendor SDKs. Just data and simple helpers.

pub mod config;
pub mod events;
pub mod money;
pub mod registry;
pub mod role;
pub mod vendor;
