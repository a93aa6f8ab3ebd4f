//! Session, connection, and query semantics for the passo prompt, kept
//! free of terminal and driver concerns behind the backend traits.

pub mod connection_manager;
pub mod credentials;
pub mod query_executor;
pub mod session;
pub mod value;
