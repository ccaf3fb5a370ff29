//! Siteplan - Procedural site-layout generation engine
//!
//! Given a plot boundary, a regulatory envelope (setback, FAR, ground
//! coverage, height), and a set of desired building typologies, the engine
//! produces complete constraint-satisfying site layouts: building footprints,
//! parking, utility zones, and residual open space.

pub mod core;
pub mod geometry;
pub mod pipeline;
pub mod plot;
pub mod scenario;
