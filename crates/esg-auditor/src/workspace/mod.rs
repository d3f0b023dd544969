//! Single-user session over an injected key-value store.
//!
//! Every mutation reads the full collection, transforms it in memory and
//! writes it back. Reads never fail; writes surface [`WorkspaceError`].

mod service;

pub use service::{AuditorWorkspace, WorkspaceError};
