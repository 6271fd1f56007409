//! # TileKit Core
//!
//! Core types and utilities shared by the TileKit layout engines:
//! exact micro-unit arithmetic, integer geometry, the error taxonomy, and
//! synchronous change notification.

pub mod error;
pub mod event;
pub mod geometry;
pub mod units;

pub use error::{
    CommandError, Error, InputField, LayoutError, Result, UnitError, ValidationCode,
    ValidationError, ValidationErrors,
};
pub use event::{ListenerRegistry, SubscriptionId};
pub use geometry::{Dimension, Point, Rect};
pub use units::Micro;
