/// Flower Pin Relay
///
/// Receives owner artwork uploads, pins image and metadata to IPFS through
/// Pinata, and serves the availability registry the claim page mints from.

pub mod handlers;
pub mod pinata;
pub mod server;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use handlers::RelayState;
pub use pinata::{PinError, PinataClient, Pinner};
pub use server::{create_router, run_server};
pub use store::RegistryStore;
pub use types::*;
