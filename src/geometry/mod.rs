//! Geometry utilities over the geo ecosystem
//!
//! Buffering and boolean operations on arbitrary plot shapes routinely
//! produce invalid or multi-part results; everything in here is written to
//! degrade (empty result, largest part, skipped step) instead of aborting.

pub mod buffer;
pub mod codec;
pub mod repair;
pub mod subtract;

pub use buffer::{inset_largest, offset_polygon};
pub use codec::{decode_polygon, encode_polygon, PolygonRecord};
pub use repair::{flatten, largest_part, polygon_from_vertices, repair};
pub use subtract::robust_subtract;
