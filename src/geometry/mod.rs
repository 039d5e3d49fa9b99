//! Exact 2-D region geometry for elliptical bodies.
//!
//! Ellipses are represented as inscribed convex polygons with a configurable
//! segment count, so every boolean area query (overlap, set difference)
//! reduces to exact convex polygon clipping. Rings between two concentric
//! ellipses decompose into a positive outer part and a negative inner part,
//! which keeps the area algebra exact: the areas of a body's rings telescope
//! to the area of its outer silhouette.

pub mod polygon;
pub mod region;

pub use polygon::ConvexPolygon;
pub use region::{Difference, GeometryError, Region, DEFAULT_SEGMENTS};
