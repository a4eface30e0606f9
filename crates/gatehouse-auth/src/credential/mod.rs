//! Password hashing, credential validation, and the in-memory credential store.

pub mod hasher;
pub mod store;
pub mod validator;

pub use hasher::PasswordHasher;
pub use store::InMemoryCredentialStore;
pub use validator::CredentialValidator;
