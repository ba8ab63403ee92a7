//! Serialization and debug export.
//!
//! [`PolygonRecord`] and the binary channel ([`write_polygon`],
//! [`read_polygon`]) move polygons between processes; SVG path export is
//! for looking at them.

mod record;
mod svg;

pub use record::{
    read_polygon, read_polygon_with, write_polygon, write_polygon_with, PolygonRecord,
    UserDataCodec, FORMAT_VERSION,
};
pub use svg::{polygon_to_svg_path, polyline_to_svg_path};
