//! Session lifecycle and background cleanup.

pub mod cleanup;
pub mod manager;

pub use cleanup::SessionCleanup;
pub use manager::SessionManager;
