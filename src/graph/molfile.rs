//! Mol-string codec.
//!
//! Serializes a sketch to a private line-based text format and parses it
//! back. The format is opaque to the editor core; it exists so the
//! clear-graph action can snapshot and restore a whole document. It is
//! not MDL molfile compatible.
//!
//! Layout: a header line, a counts line, one line per atom
//! (`label x y charge`, `*` for the empty label), one line per bond
//! (1-based atom ordinals and a shape code).

use std::fmt;

use super::types::{Edge, EdgeShape, Vertex};
use crate::math::Vec2;

const HEADER: &str = "sketchem-mol";
const VERSION: u32 = 1;

/// Errors that can occur while parsing a mol string.
#[derive(Debug)]
pub enum MolFileError {
    /// The document does not start with the `sketchem-mol` header.
    MissingHeader,
    /// The header names a format version this parser does not read.
    UnsupportedVersion(String),
    /// The counts line is absent or malformed.
    BadCounts(String),
    /// An atom line could not be parsed.
    BadAtomLine {
        /// 1-based line number within the document.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// A bond line could not be parsed.
    BadBondLine {
        /// 1-based line number within the document.
        line: usize,
        /// What went wrong.
        reason: String,
    },
    /// A bond references an atom ordinal outside the atom count.
    AtomOutOfRange {
        /// 1-based line number within the document.
        line: usize,
        /// The offending ordinal.
        ordinal: usize,
    },
    /// The document ends before the promised atom/bond lines.
    Truncated,
}

impl fmt::Display for MolFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => write!(f, "missing {HEADER} header"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported format version: {v}"),
            Self::BadCounts(msg) => write!(f, "bad counts line: {msg}"),
            Self::BadAtomLine { line, reason } => {
                write!(f, "bad atom line {line}: {reason}")
            }
            Self::BadBondLine { line, reason } => {
                write!(f, "bad bond line {line}: {reason}")
            }
            Self::AtomOutOfRange { line, ordinal } => {
                write!(f, "bond line {line} references missing atom {ordinal}")
            }
            Self::Truncated => write!(f, "document ends before all atoms/bonds were read"),
        }
    }
}

impl std::error::Error for MolFileError {}

/// Parsed atom record.
#[derive(Debug)]
pub(crate) struct MolAtom {
    pub(crate) label: String,
    pub(crate) coords: Vec2,
    pub(crate) charge: i32,
}

/// Parsed bond record. Ordinals are 0-based after validation.
#[derive(Debug)]
pub(crate) struct MolBond {
    pub(crate) a: usize,
    pub(crate) b: usize,
    pub(crate) shape: EdgeShape,
}

/// Parsed document, ready to be loaded into a graph.
#[derive(Debug)]
pub(crate) struct MolDocument {
    pub(crate) atoms: Vec<MolAtom>,
    pub(crate) bonds: Vec<MolBond>,
}

fn shape_code(shape: EdgeShape) -> &'static str {
    match shape {
        EdgeShape::Single => "1",
        EdgeShape::Double => "2",
        EdgeShape::Triple => "3",
        EdgeShape::WedgedUp => "w",
        EdgeShape::WedgedDown => "h",
    }
}

fn shape_from_code(code: &str) -> Option<EdgeShape> {
    match code {
        "1" => Some(EdgeShape::Single),
        "2" => Some(EdgeShape::Double),
        "3" => Some(EdgeShape::Triple),
        "w" => Some(EdgeShape::WedgedUp),
        "h" => Some(EdgeShape::WedgedDown),
        _ => None,
    }
}

/// Serialize vertices and edges to the mol-string format.
///
/// Atom ordinals follow the iteration order of `vertices`.
pub(crate) fn write_mol_string(vertices: &[Vertex], edges: &[Edge]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{HEADER} {VERSION}\n"));
    out.push_str(&format!("{} {}\n", vertices.len(), edges.len()));

    for v in vertices {
        let label = if v.label.is_empty() { "*" } else { &v.label };
        out.push_str(&format!(
            "{} {:.3} {:.3} {}\n",
            label, v.coords.x, v.coords.y, v.charge
        ));
    }

    for e in edges {
        // Ordinals are resolved against the vertex list; an edge whose
        // endpoint is missing from the document cannot be serialized.
        let a = vertices.iter().position(|v| v.id == e.v1);
        let b = vertices.iter().position(|v| v.id == e.v2);
        debug_assert!(a.is_some() && b.is_some(), "edge endpoint missing from document");
        if let (Some(a), Some(b)) = (a, b) {
            out.push_str(&format!("{} {} {}\n", a + 1, b + 1, shape_code(e.shape)));
        }
    }
    out
}

/// Parse a mol string produced by [`write_mol_string`].
pub(crate) fn parse_mol_string(input: &str) -> Result<MolDocument, MolFileError> {
    let mut lines = input.lines().enumerate();

    let (_, header) = lines.next().ok_or(MolFileError::MissingHeader)?;
    let mut parts = header.split_whitespace();
    if parts.next() != Some(HEADER) {
        return Err(MolFileError::MissingHeader);
    }
    match parts.next() {
        Some(v) if v == VERSION.to_string() => {}
        Some(v) => return Err(MolFileError::UnsupportedVersion(v.to_string())),
        None => return Err(MolFileError::UnsupportedVersion("<none>".into())),
    }

    let (_, counts) = lines
        .next()
        .ok_or_else(|| MolFileError::BadCounts("missing".into()))?;
    let mut parts = counts.split_whitespace();
    let natoms: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| MolFileError::BadCounts(counts.to_string()))?;
    let nbonds: usize = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| MolFileError::BadCounts(counts.to_string()))?;

    let mut atoms = Vec::with_capacity(natoms);
    for _ in 0..natoms {
        let (idx, line) = lines.next().ok_or(MolFileError::Truncated)?;
        let lineno = idx + 1;
        let mut parts = line.split_whitespace();
        let label = parts.next().ok_or_else(|| MolFileError::BadAtomLine {
            line: lineno,
            reason: "empty line".into(),
        })?;
        let x: f32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MolFileError::BadAtomLine {
                line: lineno,
                reason: "bad x coordinate".into(),
            })?;
        let y: f32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MolFileError::BadAtomLine {
                line: lineno,
                reason: "bad y coordinate".into(),
            })?;
        let charge: i32 = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MolFileError::BadAtomLine {
                line: lineno,
                reason: "bad charge".into(),
            })?;
        atoms.push(MolAtom {
            label: if label == "*" {
                String::new()
            } else {
                label.to_string()
            },
            coords: Vec2::new(x, y),
            charge,
        });
    }

    let mut bonds = Vec::with_capacity(nbonds);
    for _ in 0..nbonds {
        let (idx, line) = lines.next().ok_or(MolFileError::Truncated)?;
        let lineno = idx + 1;
        let mut parts = line.split_whitespace();
        let a: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MolFileError::BadBondLine {
                line: lineno,
                reason: "bad first ordinal".into(),
            })?;
        let b: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| MolFileError::BadBondLine {
                line: lineno,
                reason: "bad second ordinal".into(),
            })?;
        let shape = parts
            .next()
            .and_then(shape_from_code)
            .ok_or_else(|| MolFileError::BadBondLine {
                line: lineno,
                reason: "bad shape code".into(),
            })?;
        for ordinal in [a, b] {
            if ordinal == 0 || ordinal > atoms.len() {
                return Err(MolFileError::AtomOutOfRange {
                    line: lineno,
                    ordinal,
                });
            }
        }
        bonds.push(MolBond {
            a: a - 1,
            b: b - 1,
            shape,
        });
    }

    Ok(MolDocument { atoms, bonds })
}
