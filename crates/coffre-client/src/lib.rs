//! # coffre-client
//!
//! Client-side orchestration for Coffre safes: minting links, encrypting
//! store images and moving them through a [`Transport`].
//!
//! The crate holds no cryptographic or storage logic of its own; it wires
//! `coffre-shared` and `coffre-store` to a remote blob service and keeps
//! the create/open/save flows strictly ordered.

pub mod manager;
pub mod transport;

mod error;

pub use error::SafeError;
pub use manager::SafeManager;
pub use transport::{HttpTransport, MemoryTransport, Transport, TransportError};
