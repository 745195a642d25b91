//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external capabilities. The core
//! depends only on these traits, not on concrete implementations.

mod session;
mod store;

pub use session::SessionProvider;
pub use store::ListStore;
