//! Masking: user-drawn regions that hide tiles without deleting them.

mod engine;
pub mod intersection;
mod repository;
mod shape;

pub use engine::{MaskEvent, MaskEventKind, MaskingConfig, MaskingEngine};
pub use intersection::{Intersection, IntersectionType, DEFAULT_MINIMAL_OVERLAP_PERCENT};
pub use repository::MaskRepository;
pub use shape::{MaskGeometry, MaskId, MaskShape};
