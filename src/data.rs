mod aabb;
mod circle;
pub(crate) mod point;
mod triangle;

pub use aabb::Aabb;
pub use circle::Circle;
pub use point::Point;
pub use triangle::*;
