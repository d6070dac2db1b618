mod make_polygon;
mod make_triangle;

pub use make_polygon::MakePolygon;
pub use make_triangle::MakeTriangle;
