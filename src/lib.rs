#![doc = include_str!("../README.md")]

pub mod dcel;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod point;
pub mod voronoi;

#[cfg(feature = "ahash")]
pub mod lookup;

pub use driver::{build, BuildOutput};
pub use error::BuildError;
pub use geometry::Coord;
pub use hull::SiteId;
