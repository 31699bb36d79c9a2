//! Network layer - record API calls
//!
//! The Network actor receives API commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::RemoteClient;
