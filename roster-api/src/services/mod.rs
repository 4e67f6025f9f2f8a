//! Service Layer
//!
//! Multi-step operations that handlers and the startup path share.

mod load_service;

pub use load_service::*;
