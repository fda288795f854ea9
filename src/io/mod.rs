//! Mesh file codecs.
//!
//! [`read_mesh`] and [`write_mesh`] dispatch on the lowercased file
//! extension. Only Wavefront OBJ is wired at the moment.

pub mod obj;

use crate::mesh::PolygonMesh;
use crate::mesh_error::MeshHedgeError;
use std::path::Path;

fn extension_of(path: &Path) -> Result<String, MeshHedgeError> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| MeshHedgeError::UnsupportedExtension(path.display().to_string()))
}

/// Replaces the contents of `mesh` with the file at `path`.
///
/// # Errors
///
/// [`MeshHedgeError::UnsupportedExtension`] when no codec matches the
/// extension, otherwise whatever the codec reports.
pub fn read_mesh(mesh: &mut PolygonMesh, path: impl AsRef<Path>) -> Result<(), MeshHedgeError> {
    let path = path.as_ref();
    match extension_of(path)?.as_str() {
        "obj" => obj::read_obj(mesh, path),
        ext => Err(MeshHedgeError::UnsupportedExtension(ext.to_string())),
    }
}

/// Writes `mesh` to the file at `path`.
///
/// # Errors
///
/// [`MeshHedgeError::UnsupportedExtension`] when no codec matches the
/// extension, otherwise whatever the codec reports.
pub fn write_mesh(mesh: &PolygonMesh, path: impl AsRef<Path>) -> Result<(), MeshHedgeError> {
    let path = path.as_ref();
    match extension_of(path)?.as_str() {
        "obj" => obj::write_obj(mesh, path),
        ext => Err(MeshHedgeError::UnsupportedExtension(ext.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_extensions_are_rejected() {
        let mut mesh = PolygonMesh::new();
        assert!(matches!(
            read_mesh(&mut mesh, "mesh.stl"),
            Err(MeshHedgeError::UnsupportedExtension(ext)) if ext == "stl"
        ));
        assert!(matches!(
            write_mesh(&mesh, "mesh"),
            Err(MeshHedgeError::UnsupportedExtension(_))
        ));
        // the extension comparison is case-insensitive, so this fails on
        // the missing file instead
        assert!(matches!(
            read_mesh(&mut mesh, "no-such-file.OBJ"),
            Err(MeshHedgeError::FileOpen { .. })
        ));
    }
}
