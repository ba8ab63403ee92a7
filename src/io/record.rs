//! Flat polygon records and the binary channel.
//!
//! A [`PolygonRecord`] is the geometry of a polygon in the flat layout of
//! [`Polygon::from_flat`]: all vertices, the arcs, and the exclusive
//! cumulative end of every contour. Unlike `from_flat`, turning a record back
//! into a polygon keeps every coordinate and sweep bit-exact and keeps the
//! regularized status.
//!
//! The binary channel writes a record as little-endian sections:
//!
//! ```text
//! "RPLY" version:u16 flags:u16 regularized:u8 has_bounds:u8 [bounds:4*f64]
//! contours:u32 [end:u32]*  coords:u32 [x:f64 y:f64]*
//! arcs:u32 [begin:u32 end:u32 sweep:f64]*  tags_len:u32 [tags]
//! ```
//!
//! The tag section is written and read by a [`UserDataCodec`]; readers
//! without one skip it.
//!
//! # Example
//!
//! ```
//! use bytes::BytesMut;
//! use regpoly::io::{read_polygon, write_polygon};
//! use regpoly::{Point2, Polygon};
//!
//! let disk: Polygon = Polygon::circle(Point2::new(1.0, 2.0), 0.5).unwrap();
//! let mut buf = BytesMut::new();
//! write_polygon(&disk, &mut buf);
//!
//! let back: Polygon = read_polygon(&mut buf.freeze()).unwrap();
//! assert_eq!(back, disk);
//! ```

use crate::bounds::Aabb2;
use crate::error::{PolyError, Result};
use crate::polygon::{check_point, ArcDesc, Contour, Flags, Polygon, UserData};
use crate::primitives::Point2;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::f64::consts::TAU;

const MAGIC: &[u8; 4] = b"RPLY";

/// Version of the binary layout written by [`write_polygon`].
pub const FORMAT_VERSION: u16 = 1;

/// Flat geometry of a polygon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolygonRecord {
    /// Bounding box; `None` for an empty polygon. Checked against the
    /// geometry on decode.
    pub bounds: Option<Aabb2<f64>>,
    /// Behaviour flags.
    pub flags: Flags,
    /// Whether the polygon was regularized.
    pub regularized: bool,
    /// All vertices, contour after contour.
    pub coords: Vec<Point2<f64>>,
    /// The arc edges; every other edge is straight.
    pub arcs: Vec<ArcDesc>,
    /// Exclusive cumulative end of each contour in `coords`.
    pub contour_ends: Vec<usize>,
}

fn decode_error(reason: impl Into<String>) -> PolyError {
    PolyError::Decode {
        reason: reason.into(),
    }
}

impl PolygonRecord {
    /// Records the geometry of `polygon`; tags are left out.
    pub fn from_polygon<U: UserData>(polygon: &Polygon<U>) -> Self {
        let mut coords = Vec::with_capacity(polygon.vertex_count());
        let mut arcs = Vec::new();
        let mut contour_ends = Vec::with_capacity(polygon.contour_count());
        for contour in &polygon.contours {
            let start = coords.len();
            let n = contour.len();
            for (i, (&p, &sweep)) in contour.points.iter().zip(&contour.sweeps).enumerate() {
                coords.push(p);
                if sweep != 0.0 {
                    arcs.push(ArcDesc {
                        begin: start + i,
                        end: start + (i + 1) % n,
                        sweep,
                    });
                }
            }
            contour_ends.push(coords.len());
        }
        Self {
            bounds: polygon.bounding_box(),
            flags: polygon.flags(),
            regularized: polygon.is_regularized(),
            coords,
            arcs,
            contour_ends,
        }
    }

    /// Rebuilds the polygon, without tags.
    ///
    /// Fails with [`PolyError::Decode`] if the record is inconsistent:
    /// contour ends out of order, arcs not joining neighbouring vertices,
    /// contours that enclose nothing, coordinates or sweeps out of range, or
    /// bounds that do not match the geometry.
    pub fn to_polygon<U: UserData>(&self) -> Result<Polygon<U>> {
        let mut contours = Vec::with_capacity(self.contour_ends.len());
        let mut start = 0;
        for &end in &self.contour_ends {
            if end <= start || end > self.coords.len() {
                return Err(decode_error(format!("contour end {end} out of order")));
            }
            let points = self.coords[start..end].to_vec();
            for &p in &points {
                check_point(p).map_err(|e| decode_error(e.to_string()))?;
            }
            contours.push(Contour::from_parts(points, vec![0.0; end - start]));
            start = end;
        }
        if start != self.coords.len() {
            return Err(decode_error(format!(
                "{} coordinates but contours end at {start}",
                self.coords.len()
            )));
        }

        for arc in &self.arcs {
            let Some(c) = self.contour_ends.iter().position(|&e| arc.begin < e) else {
                return Err(decode_error(format!("arc begins at vertex {}", arc.begin)));
            };
            let first = if c == 0 { 0 } else { self.contour_ends[c - 1] };
            let n = self.contour_ends[c] - first;
            let local = arc.begin - first;
            if arc.end != first + (local + 1) % n {
                return Err(decode_error(format!(
                    "arc {} -> {} does not join neighbouring vertices",
                    arc.begin, arc.end
                )));
            }
            if !arc.sweep.is_finite() || arc.sweep == 0.0 || arc.sweep.abs() >= TAU {
                return Err(decode_error(format!("arc sweep {}", arc.sweep)));
            }
            contours[c].sweeps[local] = arc.sweep;
        }

        for (c, contour) in contours.iter().enumerate() {
            let arcs = contour.sweeps.iter().any(|&s| s != 0.0);
            if contour.len() < 2 || (contour.len() == 2 && !arcs) {
                return Err(decode_error(format!("contour {c} encloses nothing")));
            }
        }

        let polygon = Polygon::from_raw(contours, self.flags, self.regularized);
        if polygon.bounding_box() != self.bounds {
            return Err(decode_error("bounds do not match the geometry"));
        }
        Ok(polygon)
    }
}

impl<U: UserData> From<&Polygon<U>> for PolygonRecord {
    fn from(polygon: &Polygon<U>) -> Self {
        Self::from_polygon(polygon)
    }
}

/// Writes and reads user tags for the binary channel.
///
/// Each `decode_*` reads exactly what the matching `encode_*` wrote.
pub trait UserDataCodec<U: UserData> {
    /// Writes a vertex tag.
    fn encode_vertex(&self, tag: &U::Vertex, buf: &mut BytesMut);
    /// Reads a vertex tag.
    fn decode_vertex(&self, buf: &mut Bytes) -> Result<U::Vertex>;
    /// Writes an edge tag.
    fn encode_edge(&self, tag: &U::Edge, buf: &mut BytesMut);
    /// Reads an edge tag.
    fn decode_edge(&self, buf: &mut Bytes) -> Result<U::Edge>;
    /// Writes a contour tag.
    fn encode_contour(&self, tag: &U::Contour, buf: &mut BytesMut);
    /// Reads a contour tag.
    fn decode_contour(&self, buf: &mut Bytes) -> Result<U::Contour>;
    /// Writes a polygon tag.
    fn encode_polygon(&self, tag: &U::Polygon, buf: &mut BytesMut);
    /// Reads a polygon tag.
    fn decode_polygon(&self, buf: &mut Bytes) -> Result<U::Polygon>;
}

fn put_len(buf: &mut BytesMut, len: usize) {
    // Lengths beyond u32 cannot occur below the coordinate limit
    buf.put_u32_le(u32::try_from(len).unwrap_or(u32::MAX));
}

fn put_tag<T>(buf: &mut BytesMut, tag: Option<&T>, encode: impl FnOnce(&T, &mut BytesMut)) {
    match tag {
        Some(t) => {
            buf.put_u8(1);
            encode(t, buf);
        }
        None => buf.put_u8(0),
    }
}

/// Writes `polygon` without tags.
pub fn write_polygon<U: UserData>(polygon: &Polygon<U>, buf: &mut BytesMut) {
    write_record(&PolygonRecord::from_polygon(polygon), buf);
    put_len(buf, 0);
}

/// Writes `polygon` with its tags encoded by `codec`.
pub fn write_polygon_with<U: UserData, C: UserDataCodec<U>>(
    polygon: &Polygon<U>,
    codec: &C,
    buf: &mut BytesMut,
) {
    write_record(&PolygonRecord::from_polygon(polygon), buf);

    let mut tags = BytesMut::new();
    for contour in &polygon.contours {
        for tag in &contour.vertex_tags {
            put_tag(&mut tags, tag.as_ref(), |t, b| codec.encode_vertex(t, b));
        }
    }
    for contour in &polygon.contours {
        for tag in &contour.edge_tags {
            put_tag(&mut tags, tag.as_ref(), |t, b| codec.encode_edge(t, b));
        }
    }
    for contour in &polygon.contours {
        put_tag(&mut tags, contour.tag.as_ref(), |t, b| codec.encode_contour(t, b));
    }
    put_tag(&mut tags, polygon.tag.as_ref(), |t, b| codec.encode_polygon(t, b));

    put_len(buf, tags.len());
    buf.put(tags);
}

fn write_record(record: &PolygonRecord, buf: &mut BytesMut) {
    buf.put_slice(MAGIC);
    buf.put_u16_le(FORMAT_VERSION);
    buf.put_u16_le(record.flags.to_bits());
    buf.put_u8(u8::from(record.regularized));
    match record.bounds {
        Some(b) => {
            buf.put_u8(1);
            for v in [b.min.x, b.min.y, b.max.x, b.max.y] {
                buf.put_f64_le(v);
            }
        }
        None => buf.put_u8(0),
    }
    put_len(buf, record.contour_ends.len());
    for &end in &record.contour_ends {
        put_len(buf, end);
    }
    put_len(buf, record.coords.len());
    for p in &record.coords {
        buf.put_f64_le(p.x);
        buf.put_f64_le(p.y);
    }
    put_len(buf, record.arcs.len());
    for arc in &record.arcs {
        put_len(buf, arc.begin);
        put_len(buf, arc.end);
        buf.put_f64_le(arc.sweep);
    }
}

/// Fails unless `buf` holds at least `n` more bytes.
fn need(buf: &Bytes, n: usize, what: &str) -> Result<()> {
    if buf.remaining() < n {
        return Err(decode_error(format!(
            "truncated {what}: need {n} bytes, {} left",
            buf.remaining()
        )));
    }
    Ok(())
}

/// Reads a count whose items take `item_size` bytes each.
fn get_count(buf: &mut Bytes, item_size: usize, what: &str) -> Result<usize> {
    need(buf, 4, what)?;
    let count = buf.get_u32_le() as usize;
    need(buf, count.saturating_mul(item_size), what)?;
    Ok(count)
}

fn read_record(buf: &mut Bytes) -> Result<PolygonRecord> {
    need(buf, 10, "header")?;
    let magic = buf.split_to(4);
    if magic.as_ref() != MAGIC {
        return Err(decode_error("not a polygon record"));
    }
    let version = buf.get_u16_le();
    if version != FORMAT_VERSION {
        return Err(decode_error(format!("unsupported version {version}")));
    }
    let bits = buf.get_u16_le();
    if bits & !Flags::ALL_BITS != 0 {
        return Err(decode_error(format!("unknown flag bits {bits:#06x}")));
    }
    let flags = Flags::from_bits(bits);
    let regularized = match buf.get_u8() {
        0 => false,
        1 => true,
        b => return Err(decode_error(format!("regularized byte {b}"))),
    };
    let bounds = match buf.get_u8() {
        0 => None,
        1 => {
            need(buf, 32, "bounds")?;
            let min = Point2::new(buf.get_f64_le(), buf.get_f64_le());
            let max = Point2::new(buf.get_f64_le(), buf.get_f64_le());
            Some(Aabb2::new(min, max))
        }
        b => return Err(decode_error(format!("bounds byte {b}"))),
    };

    let contours = get_count(buf, 4, "contour ends")?;
    let contour_ends = (0..contours).map(|_| buf.get_u32_le() as usize).collect();
    let coords = get_count(buf, 16, "coordinates")?;
    let coords = (0..coords)
        .map(|_| Point2::new(buf.get_f64_le(), buf.get_f64_le()))
        .collect();
    let arcs = get_count(buf, 16, "arcs")?;
    let arcs = (0..arcs)
        .map(|_| ArcDesc {
            begin: buf.get_u32_le() as usize,
            end: buf.get_u32_le() as usize,
            sweep: buf.get_f64_le(),
        })
        .collect();

    Ok(PolygonRecord {
        bounds,
        flags,
        regularized,
        coords,
        arcs,
        contour_ends,
    })
}

/// Splits off the length-prefixed tag section.
fn tag_section(buf: &mut Bytes) -> Result<Bytes> {
    let len = get_count(buf, 1, "tag section")?;
    Ok(buf.split_to(len))
}

/// Reads one polygon; its tag section is skipped.
///
/// Advances `buf` past the polygon, so consecutive polygons can be read
/// from one buffer.
pub fn read_polygon<U: UserData>(buf: &mut Bytes) -> Result<Polygon<U>> {
    let record = read_record(buf)?;
    tag_section(buf)?;
    record.to_polygon()
}

/// Reads one polygon and decodes its tags with `codec`.
///
/// A polygon written without tags reads back untagged.
pub fn read_polygon_with<U: UserData, C: UserDataCodec<U>>(buf: &mut Bytes, codec: &C) -> Result<Polygon<U>> {
    let record = read_record(buf)?;
    let mut tags = tag_section(buf)?;
    let mut polygon: Polygon<U> = record.to_polygon()?;
    if tags.is_empty() {
        return Ok(polygon);
    }

    fn get_tag<T>(
        tags: &mut Bytes,
        decode: impl FnOnce(&mut Bytes) -> Result<T>,
    ) -> Result<Option<T>> {
        need(tags, 1, "tag marker")?;
        match tags.get_u8() {
            0 => Ok(None),
            1 => decode(tags).map(Some),
            b => Err(decode_error(format!("tag marker {b}"))),
        }
    }

    for contour in &mut polygon.contours {
        for tag in &mut contour.vertex_tags {
            *tag = get_tag(&mut tags, |b| codec.decode_vertex(b))?;
        }
    }
    for contour in &mut polygon.contours {
        for tag in &mut contour.edge_tags {
            *tag = get_tag(&mut tags, |b| codec.decode_edge(b))?;
        }
    }
    for contour in &mut polygon.contours {
        contour.tag = get_tag(&mut tags, |b| codec.decode_contour(b))?;
    }
    polygon.tag = get_tag(&mut tags, |b| codec.decode_polygon(b))?;
    if tags.has_remaining() {
        return Err(decode_error(format!("{} unread tag bytes", tags.remaining())));
    }
    Ok(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::{ContourDesc, VertexDesc};
    use std::f64::consts::PI;

    #[derive(Debug, Clone, PartialEq)]
    struct Named;

    impl UserData for Named {
        type Vertex = u32;
        type Edge = u32;
        type Contour = ();
        type Polygon = String;
    }

    struct NamedCodec;

    impl UserDataCodec<Named> for NamedCodec {
        fn encode_vertex(&self, tag: &u32, buf: &mut BytesMut) {
            buf.put_u32_le(*tag);
        }
        fn decode_vertex(&self, buf: &mut Bytes) -> Result<u32> {
            need(buf, 4, "vertex tag")?;
            Ok(buf.get_u32_le())
        }
        fn encode_edge(&self, tag: &u32, buf: &mut BytesMut) {
            buf.put_u32_le(*tag);
        }
        fn decode_edge(&self, buf: &mut Bytes) -> Result<u32> {
            need(buf, 4, "edge tag")?;
            Ok(buf.get_u32_le())
        }
        fn encode_contour(&self, _tag: &(), _buf: &mut BytesMut) {}
        fn decode_contour(&self, _buf: &mut Bytes) -> Result<()> {
            Ok(())
        }
        fn encode_polygon(&self, tag: &String, buf: &mut BytesMut) {
            put_len(buf, tag.len());
            buf.put_slice(tag.as_bytes());
        }
        fn decode_polygon(&self, buf: &mut Bytes) -> Result<String> {
            let len = get_count(buf, 1, "polygon tag")?;
            String::from_utf8(buf.split_to(len).to_vec()).map_err(|e| decode_error(e.to_string()))
        }
    }

    fn tagged() -> Polygon<Named> {
        let mut v0 = VertexDesc::new(Point2::new(0.0, 0.0), 0.0);
        v0.vertex_tag = Some(7);
        let mut v1 = VertexDesc::new(Point2::new(3.0, 0.1), 0.3);
        v1.edge_tag = Some(11);
        let v2 = VertexDesc::new(Point2::new(1.0 / 3.0, 2.0), 0.0);
        let hole = ContourDesc::from_points(&[
            Point2::new(0.5, 0.5),
            Point2::new(0.6, 1.0),
            Point2::new(1.0, 0.5),
        ]);
        let mut p = Polygon::from_contours(&[
            ContourDesc {
                vertices: vec![v0, v1, v2],
                tag: None,
            },
            hole,
        ])
        .unwrap();
        p.set_tag(Some("part".to_string()));
        p
    }

    #[test]
    fn test_record_is_bit_exact() {
        let p = tagged();
        let record = PolygonRecord::from_polygon(&p);
        assert_eq!(record.contour_ends, vec![3, 6]);
        assert_eq!(record.arcs.len(), 1);
        assert_eq!(record.arcs[0].begin, 1);
        assert_eq!(record.arcs[0].end, 2);

        let back: Polygon = record.to_polygon().unwrap();
        for (a, b) in p.vertices().zip(back.vertices()) {
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
        }
        assert_eq!(back.arc_angle(1).unwrap().to_bits(), 0.3f64.to_bits());
        assert_eq!(back.is_regularized(), p.is_regularized());
        assert_eq!(back.flags(), p.flags());
    }

    #[test]
    fn test_binary_round_trip_with_tags() {
        let p = tagged();
        let mut buf = BytesMut::new();
        write_polygon_with(&p, &NamedCodec, &mut buf);
        let mut bytes = buf.freeze();
        let back = read_polygon_with(&mut bytes, &NamedCodec).unwrap();
        assert_eq!(back, p);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_tags_skipped_without_codec() {
        let p = tagged();
        let mut buf = BytesMut::new();
        write_polygon_with(&p, &NamedCodec, &mut buf);
        write_polygon(&p, &mut buf);
        let mut bytes = buf.freeze();

        let first: Polygon<Named> = read_polygon(&mut bytes).unwrap();
        assert_eq!(first.tag(), None);
        assert_eq!(first.vertex_tag(0).unwrap(), None);
        assert!(first.compare_geometry(&p, &Default::default()));

        let second = read_polygon_with(&mut bytes, &NamedCodec).unwrap();
        assert_eq!(second.tag(), None);
        assert!(bytes.is_empty());
    }

    #[test]
    fn test_empty_polygon_round_trip() {
        let empty: Polygon = Polygon::new();
        let mut buf = BytesMut::new();
        write_polygon(&empty, &mut buf);
        let back: Polygon = read_polygon(&mut buf.freeze()).unwrap();
        assert!(back.is_empty());
        assert!(back.is_regularized());
    }

    #[test]
    fn test_decode_errors() {
        let disk: Polygon = Polygon::circle(Point2::new(0.0, 0.0), 1.0).unwrap();
        let mut buf = BytesMut::new();
        write_polygon(&disk, &mut buf);
        let bytes = buf.freeze();

        let mut truncated = bytes.slice(..bytes.len() - 9);
        assert!(matches!(
            read_polygon::<()>(&mut truncated),
            Err(PolyError::Decode { .. })
        ));

        let mut bad_magic = BytesMut::from(&bytes[..]);
        bad_magic[0] = b'X';
        assert!(matches!(
            read_polygon::<()>(&mut bad_magic.freeze()),
            Err(PolyError::Decode { .. })
        ));

        let mut bad_version = BytesMut::from(&bytes[..]);
        bad_version[4] = 9;
        assert!(read_polygon::<()>(&mut bad_version.freeze()).is_err());
    }

    #[test]
    fn test_inconsistent_records() {
        let mut record = PolygonRecord::from_polygon(&Polygon::<()>::circle(Point2::new(0.0, 0.0), 1.0).unwrap());
        record.arcs[0].sweep = 2.0 * PI;
        assert!(record.to_polygon::<()>().is_err());

        let mut record = PolygonRecord::from_polygon(&Polygon::<()>::circle(Point2::new(0.0, 0.0), 1.0).unwrap());
        record.bounds = None;
        assert!(record.to_polygon::<()>().is_err());

        let mut record = PolygonRecord::from_polygon(&Polygon::<()>::circle(Point2::new(0.0, 0.0), 1.0).unwrap());
        record.arcs.clear();
        assert!(record.to_polygon::<()>().is_err());

        let mut record = PolygonRecord::from_polygon(&Polygon::<()>::circle(Point2::new(0.0, 0.0), 1.0).unwrap());
        record.contour_ends = vec![1, 2];
        assert!(record.to_polygon::<()>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_serde_json() {
        let record = PolygonRecord::from_polygon(&tagged());
        let json = serde_json::to_string(&record).unwrap();
        let back: PolygonRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
