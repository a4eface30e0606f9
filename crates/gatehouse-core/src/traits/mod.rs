//! Collaborator traits consumed by the token lifecycle core.

pub mod clock;
pub mod credential;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{CredentialSource, StoredCredential};
