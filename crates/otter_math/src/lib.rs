//! # otter_math
//!
//! Value-type math for the Otter entity-component core. Defines the
//! engine's own [`Vec3`] (a `#[repr(C)]` plain-old-data type that can live
//! inside component storage) and the [`Transform`] every entity owns.
//! Matrix work is delegated to [`glam`].

pub mod error;
pub mod transform;
pub mod vec;

// Re-export glam types used by transform matrices.
pub use glam::{EulerRot, Mat4, Quat};

pub use error::MathError;
pub use transform::Transform;
pub use vec::Vec3;
