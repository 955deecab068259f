//! Cadence Core
//!
//! Leaf helpers shared by the Cadence animation primitives and by UI code
//! that drives them:
//!
//! - **Math**: clamp, clamped linear interpolation, range mapping
//! - **Easing**: the usual sine/polynomial curves plus CSS cubic-bezier
//! - **Text**: character-safe truncation and slash handling for paths
//! - **Markup**: pull the first top-level node out of an HTML fragment
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{lerp, map_range, Easing};
//!
//! let eased = Easing::EaseInOutCubic.apply(0.5);
//! assert!((eased - 0.5).abs() < 1e-6);
//!
//! assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
//! assert_eq!(map_range(5.0, (0.0, 10.0), (0.0, 100.0)), 50.0);
//! ```

pub mod easing;
pub mod error;
pub mod markup;
pub mod math;
pub mod slash;
pub mod text;

pub use easing::Easing;
pub use error::{CadenceError, Result};
pub use markup::{first_node, Node};
pub use math::{clamp, lerp, map_range};
pub use slash::{leading_slash_it, trailing_slash_it, unleading_slash_it, untrailing_slash_it};
pub use text::{truncate, truncate_with, DEFAULT_ELLIPSIS};
