//! Structural invariant checks.
//!
//! `validate_invariants` walks every live element and verifies the cross
//! references the rest of the crate assumes: halfedge loops chain and close,
//! `prev` mirrors `next`, outgoing halfedges emanate from their vertex, and
//! a boundary vertex stores a boundary halfedge. All walks are bounded so a
//! corrupted mesh reports an error instead of spinning.

use crate::debug_invariants::DebugInvariants;
use crate::mesh::PolygonMesh;
use crate::mesh_error::MeshHedgeError;

impl DebugInvariants for PolygonMesh {
    fn validate_invariants(&self) -> Result<(), MeshHedgeError> {
        let bound = self.halfedges_size() + 1;

        for h in self.halfedges() {
            let v = self.to_vertex(h);
            if !self.is_valid_vertex(v) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{h} points to out-of-range vertex {v}"
                )));
            }
            if self.is_deleted_vertex(v) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{h} points to deleted vertex {v}"
                )));
            }
            let nxt = self.next_halfedge(h);
            if !self.is_valid_halfedge(nxt) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{h} has no successor"
                )));
            }
            if self.prev_halfedge(nxt) != h {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "prev of {nxt} does not mirror next of {h}"
                )));
            }
            if self.from_vertex(nxt) != v {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{nxt} does not emanate from the target of {h}"
                )));
            }
            if self.face(nxt) != self.face(h) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{h} and its successor {nxt} disagree on their face"
                )));
            }
        }

        for v in self.vertices() {
            let h = self.outgoing_halfedge(v);
            if !h.is_valid() {
                continue;
            }
            if !self.is_valid_halfedge(h) || self.is_deleted_halfedge(h) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{v} stores dead outgoing halfedge {h}"
                )));
            }
            if self.from_vertex(h) != v {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "outgoing halfedge {h} does not emanate from {v}"
                )));
            }
            // a vertex on the boundary must expose a boundary halfedge, the
            // circulators rely on it
            let mut cur = h;
            let mut steps = 0usize;
            loop {
                if self.is_boundary_halfedge(cur) && !self.is_boundary_halfedge(h) {
                    return Err(MeshHedgeError::InvariantViolation(format!(
                        "{v} lies on the boundary but stores interior halfedge {h}"
                    )));
                }
                cur = self.cw_rotated_halfedge(cur);
                steps += 1;
                if cur == h {
                    break;
                }
                if steps > bound {
                    return Err(MeshHedgeError::InvariantViolation(format!(
                        "halfedge star of {v} does not close"
                    )));
                }
            }
        }

        for f in self.faces() {
            let h0 = self.face_halfedge(f);
            if !self.is_valid_halfedge(h0) || self.is_deleted_halfedge(h0) {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{f} stores dead halfedge {h0}"
                )));
            }
            let mut cur = h0;
            let mut steps = 0usize;
            loop {
                if self.face(cur) != f {
                    return Err(MeshHedgeError::InvariantViolation(format!(
                        "{cur} in the loop of {f} belongs to another face"
                    )));
                }
                cur = self.next_halfedge(cur);
                steps += 1;
                if cur == h0 {
                    break;
                }
                if steps > bound {
                    return Err(MeshHedgeError::InvariantViolation(format!(
                        "halfedge loop of {f} does not close"
                    )));
                }
            }
            if steps < 3 {
                return Err(MeshHedgeError::InvariantViolation(format!(
                    "{f} has a loop of length {steps}"
                )));
            }
        }

        Ok(())
    }
}
