//! Identity primitives shared by sessions, stores, and hooks.

pub mod id;
pub mod secret;

pub use id::*;
pub use secret::*;
