//! Wavefront OBJ reader and writer.
//!
//! # Supported format
//! - `v x y z` vertex positions.
//! - `vt u v` texture coordinates, stored per halfedge in `h:texcoord` with
//!   a trailing `1.0` component.
//! - `f` corner lists with 1-based `i`, `i/t`, `i/t/n` or `i//n` references.
//!
//! # Limitations
//! - `vn` records are parsed but ignored; a normal can be a vertex or a
//!   halfedge quantity depending on smoothing, so recomputing is safer.
//! - Negative (relative) indices are not supported.
//! - Malformed records and faces the connectivity kernel rejects are
//!   skipped with a warning; only file-level failures are fatal.

use crate::Vec3;
use crate::mesh::PolygonMesh;
use crate::mesh_error::MeshHedgeError;
use crate::topology::handle::Vertex;
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

struct ObjCorner {
    vertex: usize,
    texcoord: Option<usize>,
}

/// Parses one `i[/t[/n]]` face corner, 1-based as in the file.
fn parse_corner(token: &str) -> Option<ObjCorner> {
    let mut fields = token.split('/');
    let vertex = fields.next()?.parse::<usize>().ok()?;
    let texcoord = match fields.next() {
        None | Some("") => None,
        Some(t) => Some(t.parse::<usize>().ok()?),
    };
    // a trailing normal index is valid but ignored
    if let Some(n) = fields.next() {
        if !n.is_empty() {
            n.parse::<usize>().ok()?;
        }
    }
    Some(ObjCorner { vertex, texcoord })
}

fn parse_floats<const N: usize>(rest: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut fields = rest.split_whitespace();
    for slot in &mut out {
        *slot = fields.next()?.parse().ok()?;
    }
    Some(out)
}

/// Replaces the contents of `mesh` with an OBJ file.
///
/// # Errors
///
/// [`MeshHedgeError::FileOpen`] when the file cannot be opened and
/// [`MeshHedgeError::FileIo`] when reading fails midway. Bad records are
/// skipped, not reported.
pub fn read_obj(mesh: &mut PolygonMesh, path: &Path) -> Result<(), MeshHedgeError> {
    let file = File::open(path).map_err(|source| MeshHedgeError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    mesh.clear();
    let texcoords = mesh.halfedge_attr_or_add("h:texcoord", Vec3::zeros())?;

    let mut all_texcoords: Vec<Vec3> = Vec::new();
    let mut corners: Vec<Vertex> = Vec::new();
    let mut corner_texcoords: Vec<Option<usize>> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| MeshHedgeError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        // leading whitespace marks a continuation we do not support
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with(char::is_whitespace)
        {
            continue;
        }

        if let Some(rest) = line.strip_prefix("v ") {
            match parse_floats::<3>(rest) {
                Some([x, y, z]) => {
                    mesh.add_vertex(Vec3::new(x, y, z));
                }
                None => warn!("line {}: malformed vertex record", lineno + 1),
            }
        } else if let Some(rest) = line.strip_prefix("vt ") {
            match parse_floats::<2>(rest) {
                Some([u, v]) => all_texcoords.push(Vec3::new(u, v, 1.0)),
                None => warn!("line {}: malformed texcoord record", lineno + 1),
            }
        } else if line.starts_with("vn ") {
            // ignored, see module docs
        } else if let Some(rest) = line.strip_prefix("f ") {
            corners.clear();
            corner_texcoords.clear();
            let mut ok = true;
            for token in rest.split_whitespace() {
                match parse_corner(token) {
                    Some(c) if c.vertex >= 1 && c.vertex <= mesh.vertices_size() => {
                        corners.push(Vertex::new(c.vertex - 1));
                        corner_texcoords.push(c.texcoord.map(|t| t - 1));
                    }
                    _ => {
                        ok = false;
                        break;
                    }
                }
            }
            if !ok {
                warn!("line {}: malformed face record", lineno + 1);
                continue;
            }

            let f = match mesh.try_add_face(&corners) {
                Ok(f) => f,
                Err(e) => {
                    warn!("line {}: skipping face: {e}", lineno + 1);
                    continue;
                }
            };

            if corner_texcoords.iter().all(Option::is_some) && !corner_texcoords.is_empty() {
                let loop_halfedges: Vec<_> = mesh.halfedges_of_face(f).collect();
                let mut column = mesh.halfedge_attr_mut(texcoords);
                for (h, t) in loop_halfedges.into_iter().zip(&corner_texcoords) {
                    match t.and_then(|t| all_texcoords.get(t)) {
                        Some(&uv) => column[h] = uv,
                        None => warn!("line {}: texcoord index out of range", lineno + 1),
                    }
                }
            }
        }
    }

    Ok(())
}

/// Writes `mesh` as an OBJ file.
///
/// Tombstoned elements are dropped on the way out, so the file never
/// mentions garbage; a remap table keeps face records consistent.
///
/// # Errors
///
/// [`MeshHedgeError::FileOpen`] when the file cannot be created and
/// [`MeshHedgeError::FileIo`] when writing fails midway.
pub fn write_obj(mesh: &PolygonMesh, path: &Path) -> Result<(), MeshHedgeError> {
    let file = File::create(path).map_err(|source| MeshHedgeError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    let io_err = |source| MeshHedgeError::FileIo {
        path: path.to_path_buf(),
        source,
    };

    let mut remap = vec![0usize; mesh.vertices_size()];
    let mut next = 1usize;
    for v in mesh.vertices() {
        let p = mesh.position(v);
        writeln!(out, "v {} {} {}", p.x, p.y, p.z).map_err(io_err)?;
        remap[v.idx()] = next;
        next += 1;
    }

    for f in mesh.faces() {
        write!(out, "f").map_err(io_err)?;
        for v in mesh.vertices_of_face(f) {
            write!(out, " {}", remap[v.idx()]).map_err(io_err)?;
        }
        writeln!(out).map_err(io_err)?;
    }

    out.flush().map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{read_mesh, write_mesh};
    use std::fs;

    fn read_str(content: &str) -> PolygonMesh {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mesh.obj");
        fs::write(&path, content).unwrap();
        let mut mesh = PolygonMesh::new();
        read_mesh(&mut mesh, &path).unwrap();
        mesh
    }

    #[test]
    fn reads_vertices_and_faces() {
        let mesh = read_str(
            "# a square\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             f 1 2 3 4\n",
        );
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        let f = mesh.faces().next().unwrap();
        assert_eq!(mesh.face_degree(f), 4);
        assert_eq!(mesh.position(Vertex::new(2)), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn reads_texcoords_onto_halfedges() {
        let mesh = read_str(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vt 0 0\n\
             vt 1 0\n\
             vt 0 1\n\
             vn 0 0 1\n\
             f 1/1/1 2/2/1 3/3/1\n",
        );
        assert_eq!(mesh.face_count(), 1);
        let texcoords = mesh.get_halfedge_attr::<Vec3>("h:texcoord").unwrap();
        let f = mesh.faces().next().unwrap();
        let column = mesh.halfedge_attr(texcoords);
        let mut uvs: Vec<Vec3> = mesh.halfedges_of_face(f).map(|h| column[h]).collect();
        uvs.sort_by(|a, b| (a.x, a.y).partial_cmp(&(b.x, b.y)).unwrap());
        assert_eq!(
            uvs,
            vec![
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
            ]
        );
    }

    #[test]
    fn corner_texcoords_follow_the_face_loop() {
        let mesh = read_str(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vt 0.25 0\n\
             vt 0.5 0\n\
             vt 0.75 0\n\
             f 1/1 2/2 3/3\n",
        );
        let texcoords = mesh.get_halfedge_attr::<Vec3>("h:texcoord").unwrap();
        let column = mesh.halfedge_attr(texcoords);
        let f = mesh.faces().next().unwrap();
        // the halfedge arriving at corner k carries that corner's texcoord
        let expected = [0.25, 0.5, 0.75];
        for (h, corner) in mesh
            .halfedges_of_face(f)
            .zip(mesh.vertices_of_face(f))
        {
            assert_eq!(column[h].x, expected[corner.idx()]);
            assert_eq!(mesh.to_vertex(h), corner);
        }
    }

    #[test]
    fn skips_malformed_and_non_manifold_records() {
        let mesh = read_str(
            "v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             v nope 0 0\n\
             f 1 2 3\n\
             f 1 2 3\n\
             f 1 2\n\
             f 7 8 9\n",
        );
        // the bad vertex and the duplicate, short, and out-of-range faces
        // are all dropped
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn roundtrip_preserves_geometry_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tet.obj");

        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 0.0, 1.0));
        mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, d, b).unwrap();
        mesh.add_triangle(b, d, c).unwrap();
        mesh.add_triangle(c, d, a).unwrap();
        write_mesh(&mesh, &path).unwrap();

        let mut back = PolygonMesh::new();
        read_mesh(&mut back, &path).unwrap();
        assert_eq!(back.vertex_count(), 4);
        assert_eq!(back.edge_count(), 6);
        assert_eq!(back.face_count(), 4);
        assert_eq!(back.position(Vertex::new(3)), Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn writer_drops_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.obj");

        let mut mesh = PolygonMesh::new();
        let a = mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        let b = mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        let c = mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        let d = mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        let f0 = mesh.add_triangle(a, b, c).unwrap();
        mesh.add_triangle(a, c, d).unwrap();
        mesh.delete_face(f0);
        // no garbage_collection on purpose
        write_mesh(&mesh, &path).unwrap();

        let mut back = PolygonMesh::new();
        read_mesh(&mut back, &path).unwrap();
        assert_eq!(back.vertex_count(), 3);
        assert_eq!(back.face_count(), 1);
    }
}
