//! STL mesh reading and writing.
//!
//! Both flavours of the format are supported for reading; ASCII and binary
//! can be written.
//!
//! ## Binary layout
//!
//! ```text
//! [header: 80 bytes]
//! [triangle_count: u32 LE]
//! for each triangle:
//!   [normal: 3 x f32 LE]
//!   [v1: 3 x f32 LE] [v2: 3 x f32 LE] [v3: 3 x f32 LE]
//!   [attribute_byte_count: u16 LE]
//! ```
//!
//! ## ASCII layout
//!
//! ```text
//! solid <name>
//!  facet normal nx ny nz
//!   outer loop
//!    vertex x y z   (three times)
//!   endloop
//!  endfacet
//! endsolid <name>
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geom::{Point3, Triangle};

/// Size of the free-form binary header.
const HEADER_SIZE: usize = 80;
/// Header plus the triangle count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;
/// normal(12) + 3 vertices(36) + attribute count(2) = 50
const FACET_SIZE: usize = 50;

/// Errors produced while reading an STL mesh.
#[derive(Debug, Error)]
pub enum StlError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("binary STL is {len} bytes, shorter than the 84-byte preamble")]
    Truncated { len: usize },
    #[error("binary STL declares {count} triangles ({expected} bytes) but is {actual} bytes")]
    SizeMismatch {
        count: u32,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}: expected {expected}, found `{found}`")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    #[error("line {line}: invalid number `{token}`")]
    InvalidNumber { line: usize, token: String },
    #[error("facet {facet} has a non-finite vertex ({point})")]
    NonFiniteVertex { facet: usize, point: Point3 },
}

/// Which flavour of STL a mesh was read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StlFormat {
    Ascii,
    Binary,
}

/// A parsed STL file.
#[derive(Clone, Debug)]
pub struct StlMesh {
    /// Solid name for ASCII files, trimmed header text for binary files.
    pub name: String,
    pub format: StlFormat,
    pub triangles: Vec<Triangle>,
}

/// Read and parse an STL file from disk.
pub fn read_stl(path: impl AsRef<Path>) -> Result<StlMesh, StlError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| StlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_stl(&bytes)
}

/// Parse an in-memory STL file, detecting the flavour.
///
/// A buffer whose size matches its own binary triangle count is binary even
/// when its header starts with `solid`, which many exporters write.
pub fn parse_stl(bytes: &[u8]) -> Result<StlMesh, StlError> {
    if binary_size_matches(bytes) || !looks_ascii(bytes) {
        parse_binary(bytes)
    } else {
        parse_ascii(&String::from_utf8_lossy(bytes))
    }
}

fn looks_ascii(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..]
        .get(..5)
        .is_some_and(|word| word.eq_ignore_ascii_case(b"solid"))
}

fn binary_size_matches(bytes: &[u8]) -> bool {
    if bytes.len() < PREAMBLE_SIZE {
        return false;
    }
    let count = read_u32(bytes, HEADER_SIZE) as usize;
    count
        .checked_mul(FACET_SIZE)
        .and_then(|n| n.checked_add(PREAMBLE_SIZE))
        == Some(bytes.len())
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

/// Parse a binary STL buffer.
pub fn parse_binary(bytes: &[u8]) -> Result<StlMesh, StlError> {
    if bytes.len() < PREAMBLE_SIZE {
        return Err(StlError::Truncated { len: bytes.len() });
    }
    let count = read_u32(bytes, HEADER_SIZE);
    let expected = (count as usize)
        .checked_mul(FACET_SIZE)
        .and_then(|n| n.checked_add(PREAMBLE_SIZE));
    if expected != Some(bytes.len()) {
        return Err(StlError::SizeMismatch {
            count,
            expected: expected.unwrap_or(usize::MAX),
            actual: bytes.len(),
        });
    }

    let name = String::from_utf8_lossy(&bytes[..HEADER_SIZE])
        .trim_end_matches('\0')
        .trim()
        .to_string();

    let mut triangles = Vec::with_capacity(count as usize);
    let mut offset = PREAMBLE_SIZE;
    for facet in 0..count as usize {
        let normal = read_point(bytes, offset);
        let a = finite(read_point(bytes, offset + 12), facet)?;
        let b = finite(read_point(bytes, offset + 24), facet)?;
        let c = finite(read_point(bytes, offset + 36), facet)?;
        triangles.push(Triangle::with_normal(normal, a, b, c));
        offset += FACET_SIZE;
    }

    Ok(StlMesh {
        name,
        format: StlFormat::Binary,
        triangles,
    })
}

// Callers check bounds before reading.
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    f32::from_le_bytes(buf)
}

// Edge weights are distances between vertices; NaN or infinite corners
// would poison every search that reaches them.
fn finite(p: Point3, facet: usize) -> Result<Point3, StlError> {
    if p.is_finite() {
        Ok(p)
    } else {
        Err(StlError::NonFiniteVertex { facet, point: p })
    }
}

fn read_point(bytes: &[u8], offset: usize) -> Point3 {
    Point3::from([
        read_f32(bytes, offset),
        read_f32(bytes, offset + 4),
        read_f32(bytes, offset + 8),
    ])
}

/// Write triangles as a binary STL. Coordinates are narrowed to `f32`.
pub fn write_binary_stl<W: Write>(
    mut writer: W,
    header: &str,
    triangles: &[Triangle],
) -> io::Result<()> {
    let count = u32::try_from(triangles.len()).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "too many triangles for binary STL")
    })?;

    let mut head = [0u8; HEADER_SIZE];
    let text = header.as_bytes();
    let n = text.len().min(HEADER_SIZE);
    head[..n].copy_from_slice(&text[..n]);
    writer.write_all(&head)?;
    writer.write_all(&count.to_le_bytes())?;

    for t in triangles {
        write_point_f32(&mut writer, t.normal)?;
        for v in t.vertices {
            write_point_f32(&mut writer, v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

fn write_point_f32<W: Write>(writer: &mut W, p: Point3) -> io::Result<()> {
    writer.write_all(&(p.x as f32).to_le_bytes())?;
    writer.write_all(&(p.y as f32).to_le_bytes())?;
    writer.write_all(&(p.z as f32).to_le_bytes())
}

// ---------------------------------------------------------------------------
// ASCII
// ---------------------------------------------------------------------------

/// Whitespace tokenizer that remembers line numbers for error messages.
struct Tokens<'a> {
    iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(lines: impl Iterator<Item = (usize, &'a str)> + 'a) -> Self {
        Self {
            iter: Box::new(
                lines.flat_map(|(n, line)| line.split_whitespace().map(move |t| (n, t))),
            ),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<(usize, &'a str), StlError> {
        self.iter.next().ok_or(StlError::UnexpectedEof { expected })
    }

    fn keyword(&mut self, word: &'static str) -> Result<(), StlError> {
        let (line, tok) = self.next(word)?;
        if tok.eq_ignore_ascii_case(word) {
            Ok(())
        } else {
            Err(StlError::UnexpectedToken {
                line,
                expected: word,
                found: tok.to_string(),
            })
        }
    }

    fn number(&mut self) -> Result<f64, StlError> {
        let (line, tok) = self.next("a number")?;
        tok.parse::<f64>().map_err(|_| StlError::InvalidNumber {
            line,
            token: tok.to_string(),
        })
    }

    fn point(&mut self) -> Result<Point3, StlError> {
        Ok(Point3::new(self.number()?, self.number()?, self.number()?))
    }
}

/// Parse an ASCII STL document.
pub fn parse_ascii(text: &str) -> Result<StlMesh, StlError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .skip_while(|(_, l)| l.trim().is_empty());

    let (first_no, first) = lines.next().ok_or(StlError::UnexpectedEof { expected: "solid" })?;
    let first = first.trim();
    let name = match first.get(..5) {
        Some(word) if word.eq_ignore_ascii_case("solid") => first[5..].trim().to_string(),
        _ => {
            return Err(StlError::UnexpectedToken {
                line: first_no,
                expected: "solid",
                found: first.split_whitespace().next().unwrap_or("").to_string(),
            });
        }
    };

    let mut tokens = Tokens::new(lines);
    let mut triangles = Vec::new();
    loop {
        let (line, tok) = tokens.next("facet or endsolid")?;
        if tok.eq_ignore_ascii_case("endsolid") {
            break;
        }
        if !tok.eq_ignore_ascii_case("facet") {
            return Err(StlError::UnexpectedToken {
                line,
                expected: "facet or endsolid",
                found: tok.to_string(),
            });
        }
        tokens.keyword("normal")?;
        let normal = tokens.point()?;
        tokens.keyword("outer")?;
        tokens.keyword("loop")?;
        let mut corners = [Point3::ZERO; 3];
        for corner in corners.iter_mut() {
            tokens.keyword("vertex")?;
            *corner = finite(tokens.point()?, triangles.len())?;
        }
        tokens.keyword("endloop")?;
        tokens.keyword("endfacet")?;
        let [a, b, c] = corners;
        triangles.push(Triangle::with_normal(normal, a, b, c));
    }

    Ok(StlMesh {
        name,
        format: StlFormat::Ascii,
        triangles,
    })
}

/// Write triangles as an ASCII STL solid called `name`.
pub fn write_ascii_stl<W: Write>(
    mut writer: W,
    name: &str,
    triangles: &[Triangle],
) -> io::Result<()> {
    writeln!(writer, "solid {name}")?;
    for t in triangles {
        writeln!(writer, " facet normal {}", t.normal)?;
        writeln!(writer, "  outer loop")?;
        for v in t.vertices {
            writeln!(writer, "  vertex {v}")?;
        }
        writeln!(writer, "  endloop")?;
        writeln!(writer, " endfacet")?;
    }
    writeln!(writer, "endsolid {name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA_FACE: &str = "\
solid tetra
  facet normal 0 0 -1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
  FACET NORMAL 0 -1 0
    OUTER LOOP
      VERTEX 0 0 0
      VERTEX 1 0 0
      VERTEX 0 0 1.5e0
    ENDLOOP
  ENDFACET
endsolid tetra
";

    fn sample() -> Vec<Triangle> {
        vec![
            Triangle::with_normal(
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ),
            Triangle::new(
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.25),
            ),
        ]
    }

    #[test]
    fn parse_ascii_document() {
        let mesh = parse_stl(TETRA_FACE.as_bytes()).unwrap();
        assert_eq!(mesh.format, StlFormat::Ascii);
        assert_eq!(mesh.name, "tetra");
        assert_eq!(mesh.triangles.len(), 2);
        assert_eq!(mesh.triangles[0].normal, Point3::new(0.0, 0.0, -1.0));
        assert_eq!(mesh.triangles[1].vertices[2], Point3::new(0.0, 0.0, 1.5));
    }

    #[test]
    fn ascii_write_then_read() {
        let mut buf = Vec::new();
        write_ascii_stl(&mut buf, "PathScene", &sample()).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with(
            "solid PathScene\n facet normal 0 0 1\n  outer loop\n  vertex 0 0 0\n"
        ));
        assert!(text.ends_with("endsolid PathScene\n"));

        let mesh = parse_stl(&buf).unwrap();
        assert_eq!(mesh.name, "PathScene");
        assert_eq!(mesh.triangles, sample());
    }

    #[test]
    fn binary_write_then_read() {
        let mut buf = Vec::new();
        write_binary_stl(&mut buf, "solid but really binary", &sample()).unwrap();
        assert_eq!(buf.len(), PREAMBLE_SIZE + 2 * FACET_SIZE);

        // The header starts with "solid" yet the size check wins.
        let mesh = parse_stl(&buf).unwrap();
        assert_eq!(mesh.format, StlFormat::Binary);
        assert_eq!(mesh.name, "solid but really binary");
        assert_eq!(mesh.triangles, sample());
    }

    #[test]
    fn empty_ascii_solid() {
        let mesh = parse_stl(b"solid empty\nendsolid empty\n").unwrap();
        assert_eq!(mesh.format, StlFormat::Ascii);
        assert!(mesh.triangles.is_empty());
    }

    #[test]
    fn binary_too_short() {
        let err = parse_stl(&[0u8; 10]).unwrap_err();
        assert!(matches!(err, StlError::Truncated { len: 10 }));
    }

    #[test]
    fn binary_count_mismatch() {
        let mut buf = Vec::new();
        write_binary_stl(&mut buf, "", &sample()).unwrap();
        buf.truncate(buf.len() - 1);
        let err = parse_binary(&buf).unwrap_err();
        assert!(matches!(err, StlError::SizeMismatch { count: 2, .. }));
    }

    #[test]
    fn ascii_bad_number_reports_line() {
        let text = TETRA_FACE.replacen("vertex 1 0 0", "vertex 1 zero 0", 1);
        let err = parse_ascii(&text).unwrap_err();
        match err {
            StlError::InvalidNumber { line, token } => {
                assert_eq!(line, 5);
                assert_eq!(token, "zero");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn ascii_missing_endsolid() {
        let text = TETRA_FACE.replace("endsolid tetra\n", "");
        let err = parse_ascii(&text).unwrap_err();
        assert!(matches!(err, StlError::UnexpectedEof { .. }));
    }

    #[test]
    fn ascii_unexpected_keyword() {
        let text = TETRA_FACE.replacen("outer loop", "inner loop", 1);
        let err = parse_ascii(&text).unwrap_err();
        assert!(matches!(
            err,
            StlError::UnexpectedToken {
                expected: "outer",
                ..
            }
        ));
    }

    #[test]
    fn ascii_rejects_nan_and_inf() {
        let text = TETRA_FACE.replacen("VERTEX 0 0 1.5e0", "VERTEX 0 0 inf", 1);
        let err = parse_ascii(&text).unwrap_err();
        assert!(matches!(err, StlError::NonFiniteVertex { facet: 1, .. }));

        let text = TETRA_FACE.replacen("vertex 1 0 0", "vertex nan 0 0", 1);
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(matches!(err, StlError::NonFiniteVertex { facet: 0, .. }));
    }

    #[test]
    fn binary_rejects_non_finite_vertices() {
        let mut tris = sample();
        tris[1].vertices[0].y = f64::INFINITY;
        let mut buf = Vec::new();
        write_binary_stl(&mut buf, "", &tris).unwrap();
        let err = parse_binary(&buf).unwrap_err();
        assert!(matches!(err, StlError::NonFiniteVertex { facet: 1, .. }));
        assert!(err.to_string().starts_with("facet 1 has a non-finite vertex"));
    }

    #[test]
    fn read_missing_file_keeps_path() {
        let err = read_stl("/definitely/not/here.stl").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.stl"));
    }
}
