//! Host-facing render data
//!
//! The simulation holds no drawing state; each frame the host builds a
//! [`RenderFrame`] and uploads its instances however it draws.

pub mod frame;

pub use frame::{Instance, InstanceKind, RenderFrame};
