//! # Mesh Data
//!
//! The shared output buffers every generator appends to: positions,
//! normals, tangents, UV channels, per-submesh triangle lists, boundary
//! edges and the vertex span of every polygon ring.
//!
//! All geometry is kept in f64. Conversion to f32 only happens in the
//! `*_f32` exports handed to the render layer.

use crate::error::{MeshError, Result};
use crate::geometry::UP;
use glam::{DVec2, DVec3, DVec4};
use std::ops::Range;

/// Default tangent of flat geometry: `+Z` with a positive handedness.
pub const FORWARD_TANGENT: DVec4 = DVec4::new(0.0, 0.0, 1.0, 1.0);

/// One vertex with every attribute the buffers carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in tile-local units.
    pub position: DVec3,
    /// Unit normal.
    pub normal: DVec3,
    /// Tangent, `w` holding the bitangent sign.
    pub tangent: DVec4,
    /// UV for channel 0.
    pub uv: DVec2,
}

impl Vertex {
    /// Creates an upward facing vertex with a forward tangent and zero UV.
    pub fn new(position: DVec3) -> Self {
        Self {
            position,
            normal: UP,
            tangent: FORWARD_TANGENT,
            uv: DVec2::ZERO,
        }
    }

    /// Sets the normal.
    pub fn with_normal(mut self, normal: DVec3) -> Self {
        self.normal = normal;
        self
    }

    /// Sets the tangent from a direction, `w = 1`.
    pub fn with_tangent(mut self, tangent: DVec3) -> Self {
        self.tangent = tangent.extend(1.0);
        self
    }

    /// Sets the channel 0 UV.
    pub fn with_uv(mut self, uv: DVec2) -> Self {
        self.uv = uv;
        self
    }
}

/// Growable mesh buffers for one feature, or one batch of wall stamps.
///
/// Parallel arrays (positions, normals, tangents, every UV channel) always
/// have the same length after each public mutation.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use tile_mesh::{MeshData, Vertex};
///
/// let mut md = MeshData::new();
/// let a = md.push_vertex(Vertex::new(DVec3::ZERO));
/// let b = md.push_vertex(Vertex::new(DVec3::Z));
/// let c = md.push_vertex(Vertex::new(DVec3::X));
/// md.add_triangle(0, a, b, c);
/// md.add_edge(b, a);
/// assert!(md.validate().is_ok());
/// assert_eq!(md.indices_u32(0), Some(vec![0, 1, 2]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    vertices: Vec<DVec3>,
    normals: Vec<DVec3>,
    tangents: Vec<DVec4>,
    /// Channel 0 always exists.
    uvs: Vec<Vec<DVec2>>,
    submeshes: Vec<Vec<u32>>,
    edges: Vec<[u32; 2]>,
    contours: Vec<Range<usize>>,
}

impl Default for MeshData {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshData {
    /// Creates empty buffers with one UV channel and no submeshes.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            tangents: Vec::new(),
            uvs: vec![Vec::new()],
            submeshes: Vec::new(),
            edges: Vec::new(),
            contours: Vec::new(),
        }
    }

    /// Creates buffers with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        let mut md = Self::new();
        md.reserve(vertex_count, index_count);
        md
    }

    /// Reserves room for `vertex_count` more vertices and `index_count` more
    /// indices in submesh 0.
    pub fn reserve(&mut self, vertex_count: usize, index_count: usize) {
        self.vertices.reserve(vertex_count);
        self.normals.reserve(vertex_count);
        self.tangents.reserve(vertex_count);
        for channel in &mut self.uvs {
            channel.reserve(vertex_count);
        }
        if index_count > 0 {
            self.submesh_mut(0).reserve(index_count);
        }
    }

    /// Empties every buffer, keeping allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.tangents.clear();
        self.uvs.truncate(1);
        self.uvs[0].clear();
        self.submeshes.clear();
        self.edges.clear();
        self.contours.clear();
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total triangle count across submeshes.
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    /// Vertex positions.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Vertex normals.
    #[inline]
    pub fn normals(&self) -> &[DVec3] {
        &self.normals
    }

    /// Vertex tangents.
    #[inline]
    pub fn tangents(&self) -> &[DVec4] {
        &self.tangents
    }

    /// A UV channel.
    #[inline]
    pub fn uvs(&self, channel: usize) -> Option<&[DVec2]> {
        self.uvs.get(channel).map(Vec::as_slice)
    }

    /// Number of UV channels.
    #[inline]
    pub fn uv_channel_count(&self) -> usize {
        self.uvs.len()
    }

    /// Triangle index lists, one per submesh.
    #[inline]
    pub fn submeshes(&self) -> &[Vec<u32>] {
        &self.submeshes
    }

    /// Boundary edges eligible for wall extrusion.
    #[inline]
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Vertex span of every polygon ring pushed so far.
    #[inline]
    pub fn contours(&self) -> &[Range<usize>] {
        &self.contours
    }

    /// Mutable positions. The slice length cannot change.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut [DVec3] {
        &mut self.vertices
    }

    /// Mutable UV channel.
    #[inline]
    pub fn uvs_mut(&mut self, channel: usize) -> Option<&mut [DVec2]> {
        self.uvs.get_mut(channel).map(Vec::as_mut_slice)
    }

    // =========================================================================
    // APPENDING
    // =========================================================================

    /// Appends a vertex to every parallel array and returns its index.
    ///
    /// Channels other than 0 receive a zero UV.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex.position);
        self.normals.push(vertex.normal);
        self.tangents.push(vertex.tangent);
        self.uvs[0].push(vertex.uv);
        for channel in &mut self.uvs[1..] {
            channel.push(DVec2::ZERO);
        }
        index
    }

    /// Returns a submesh's index list, creating empty submeshes up to it.
    pub fn submesh_mut(&mut self, submesh: usize) -> &mut Vec<u32> {
        if self.submeshes.len() <= submesh {
            self.submeshes.resize_with(submesh + 1, Vec::new);
        }
        &mut self.submeshes[submesh]
    }

    /// Starts a new submesh and returns its index.
    pub fn push_submesh(&mut self) -> usize {
        self.submeshes.push(Vec::new());
        self.submeshes.len() - 1
    }

    /// Adds a triangle to a submesh.
    pub fn add_triangle(&mut self, submesh: usize, a: u32, b: u32, c: u32) {
        self.submesh_mut(submesh).extend_from_slice(&[a, b, c]);
    }

    /// Records a boundary edge.
    #[inline]
    pub fn add_edge(&mut self, a: u32, b: u32) {
        self.edges.push([a, b]);
    }

    /// Drops every boundary edge.
    pub fn clear_edges(&mut self) {
        self.edges.clear();
    }

    /// Records the vertex span of a polygon ring.
    pub fn add_contour(&mut self, span: Range<usize>) {
        self.contours.push(span);
    }

    /// Adds a UV channel, returning its index.
    pub fn add_uv_channel(&mut self, values: Vec<DVec2>) -> Result<usize> {
        if values.len() != self.vertices.len() {
            return Err(MeshError::UvChannelLength {
                expected: self.vertices.len(),
                actual: values.len(),
            });
        }
        self.uvs.push(values);
        Ok(self.uvs.len() - 1)
    }

    /// Appends another mesh, offsetting its indices.
    ///
    /// Submeshes are merged by position; UV channels missing on either side
    /// are zero filled.
    pub fn append(&mut self, other: &MeshData) {
        let offset = self.vertices.len() as u32;
        let base = self.vertices.len();

        while self.uvs.len() < other.uvs.len() {
            self.uvs.push(vec![DVec2::ZERO; base]);
        }

        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.tangents.extend_from_slice(&other.tangents);
        for (n, channel) in self.uvs.iter_mut().enumerate() {
            match other.uvs.get(n) {
                Some(values) => channel.extend_from_slice(values),
                None => channel.resize(base + other.vertices.len(), DVec2::ZERO),
            }
        }

        for (n, indices) in other.submeshes.iter().enumerate() {
            let target = self.submesh_mut(n);
            target.extend(indices.iter().map(|i| i + offset));
        }
        self.edges
            .extend(other.edges.iter().map(|[a, b]| [a + offset, b + offset]));
        self.contours
            .extend(other.contours.iter().map(|r| r.start + base..r.end + base));
    }

    /// Replaces every buffer that describes vertices and boundaries.
    ///
    /// Used by passes that rebuild the vertex layout wholesale. Triangles
    /// are left to the caller.
    pub(crate) fn replace_vertices(
        &mut self,
        vertices: Vec<DVec3>,
        normals: Vec<DVec3>,
        tangents: Vec<DVec4>,
        uvs: Vec<Vec<DVec2>>,
    ) {
        self.vertices = vertices;
        self.normals = normals;
        self.tangents = tangents;
        self.uvs = if uvs.is_empty() { vec![Vec::new()] } else { uvs };
    }

    /// Mutable access to submeshes, for index remapping passes.
    pub(crate) fn submeshes_mut(&mut self) -> &mut [Vec<u32>] {
        &mut self.submeshes
    }

    /// Mutable access to contours, for passes that rebuild vertices.
    pub(crate) fn contours_mut(&mut self) -> &mut Vec<Range<usize>> {
        &mut self.contours
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Checks buffer invariants.
    ///
    /// - Parallel arrays and every UV channel match the vertex count
    /// - Triangle lists hold whole triangles
    /// - Triangle and edge indices reference existing vertices
    /// - Contours lie inside the vertex range
    pub fn validate(&self) -> Result<()> {
        let n = self.vertices.len();
        if self.normals.len() != n || self.tangents.len() != n {
            return Err(MeshError::validation(format!(
                "parallel arrays disagree: {} vertices, {} normals, {} tangents",
                n,
                self.normals.len(),
                self.tangents.len()
            )));
        }
        for channel in &self.uvs {
            if channel.len() != n {
                return Err(MeshError::UvChannelLength {
                    expected: n,
                    actual: channel.len(),
                });
            }
        }

        for (s, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(MeshError::validation(format!(
                    "submesh {s} has {} indices, not a multiple of 3",
                    indices.len()
                )));
            }
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= n) {
                return Err(MeshError::validation(format!(
                    "submesh {s} references vertex {bad} of {n}"
                )));
            }
        }

        if let Some(bad) = self.edges.iter().find(|e| e.iter().any(|&i| i as usize >= n)) {
            return Err(MeshError::validation(format!(
                "edge {bad:?} references a vertex outside 0..{n}"
            )));
        }

        if let Some(bad) = self.contours.iter().find(|r| r.start > r.end || r.end > n) {
            return Err(MeshError::validation(format!(
                "contour {bad:?} lies outside 0..{n}"
            )));
        }

        Ok(())
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Exports positions as a flat f32 array `[x, y, z, ...]`.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
        }
        result
    }

    /// Exports normals as a flat f32 array.
    pub fn normals_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.normals.len() * 3);
        for n in &self.normals {
            result.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }
        result
    }

    /// Exports tangents as a flat f32 array `[x, y, z, w, ...]`.
    pub fn tangents_f32(&self) -> Vec<f32> {
        self.tangents
            .iter()
            .flat_map(|t| [t.x as f32, t.y as f32, t.z as f32, t.w as f32])
            .collect()
    }

    /// Exports a UV channel as a flat f32 array `[u, v, ...]`.
    pub fn uvs_f32(&self, channel: usize) -> Option<Vec<f32>> {
        self.uvs
            .get(channel)
            .map(|uvs| uvs.iter().flat_map(|uv| [uv.x as f32, uv.y as f32]).collect())
    }

    /// Exports a submesh's triangle indices.
    pub fn indices_u32(&self, submesh: usize) -> Option<Vec<u32>> {
        self.submeshes.get(submesh).cloned()
    }
}

#[cfg(test)]
mod tests;
