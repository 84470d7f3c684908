//! ct-core: shared foundation for the compressor train crates.
//!
//! Contains:
//! - units (uom SI types + engineering-unit constructors: bara, degC, kg/h)
//! - numeric (finite/non-negative guards, lerp)
//! - boundary (search ranges and tolerance-aware targets)
//! - ids (compact ids for process units)
//! - error (shared error types)

pub mod boundary;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use boundary::{Boundary, FloatConstraint};
pub use error::{CtError, CtResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
