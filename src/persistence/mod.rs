//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Atomic writes (tmp → rename)
//! - Missing file treated as "nothing saved yet"

pub mod envelope;

pub use envelope::{Envelope, load_json, save_json};
