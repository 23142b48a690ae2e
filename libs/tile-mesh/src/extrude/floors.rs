//! # Floor Walls
//!
//! Builds walls storey by storey from reusable wall segment templates
//! instead of one flat quad per edge.
//!
//! ## Sections
//!
//! Each boundary edge is cut into sections of the preferred length, at most
//! `max_edge_sections` of them. With centering enabled, a leftover longer
//! than [`CENTERING_MIN_REMAINDER`] is split between both ends so corner
//! sections never end up as slivers.
//!
//! ## Stamping
//!
//! A template is authored with `x` along the wall, `y` up and `z` out of the
//! wall, spanning `0..size` on each axis. Per section it is scaled to the
//! section length (with [`TEMPLATE_OVERLAP`]) and one storey of height,
//! rotated so local `+Z` follows the outward wall normal, and anchored at
//! the section's far end. Upper floors use one module, the ground floor
//! another; a missing template falls back to a flat quad.
//!
//! ## Batches
//!
//! Output is split into [`WallBatch`]es so each stays addressable by 16-bit
//! indices: a batch is closed before a stamp would push it past
//! [`MeshConfig::max_batch_vertices`].

use super::push_wall_quad;
use crate::error::{require_positive, MeshError, Result};
use crate::feature::Feature;
use crate::geometry::{wall_normal, UP};
use crate::mesh_data::{MeshData, Vertex};
use config::constants::{
    MeshConfig, CENTERING_MIN_REMAINDER, DEFAULT_EDGE_SECTION_LENGTH, DEFAULT_FIRST_FLOOR_HEIGHT,
    DEFAULT_FLOOR_HEIGHT, DEFAULT_MAX_EDGE_SECTIONS, MIN_SEGMENT_SECTION_LENGTH, TEMPLATE_OVERLAP,
};
use glam::{DMat3, DVec2, DVec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Property holding the building height read by the floor extruder.
const HEIGHT_PROPERTY: &str = "height";

// =============================================================================
// OPTIONS AND TEMPLATES
// =============================================================================

/// Floor wall options. Lengths are in world units and multiplied by the
/// tile scale at build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloorOptions {
    /// Upper bound on sections per edge.
    pub max_edge_sections: usize,
    /// Target section length.
    pub preferred_section_length: f64,
    /// Split the leftover between both edge ends.
    pub center_segments: bool,
    /// Height of every upper floor.
    pub floor_height: f64,
    /// Minimum height of the ground floor.
    pub first_floor_height: f64,
    /// Building height when the feature has none.
    pub default_height: f64,
}

impl Default for FloorOptions {
    fn default() -> Self {
        Self {
            max_edge_sections: DEFAULT_MAX_EDGE_SECTIONS,
            preferred_section_length: DEFAULT_EDGE_SECTION_LENGTH,
            center_segments: true,
            floor_height: DEFAULT_FLOOR_HEIGHT,
            first_floor_height: DEFAULT_FIRST_FLOOR_HEIGHT,
            default_height: 0.0,
        }
    }
}

impl FloorOptions {
    /// Checks that every numeric option is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_edge_sections == 0 {
            return Err(MeshError::invalid_options("max_edge_sections must be at least 1"));
        }
        require_positive("preferred_section_length", self.preferred_section_length)?;
        require_positive("floor_height", self.floor_height)?;
        for (name, value) in [
            ("first_floor_height", self.first_floor_height),
            ("default_height", self.default_height),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MeshError::invalid_options(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// A wall segment mesh authored in its own frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WallTemplate {
    /// Positions inside `0..size`.
    pub vertices: Vec<DVec3>,
    /// One normal per vertex.
    pub normals: Vec<DVec3>,
    /// One UV per vertex.
    pub uvs: Vec<DVec2>,
    /// Triangle list into `vertices`.
    pub triangles: Vec<u32>,
    /// Extent of the template, every axis positive.
    pub size: DVec3,
}

impl WallTemplate {
    /// Number of template vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Checks buffer consistency and that one stamp fits in a batch.
    pub fn validate(&self, max_batch_vertices: usize) -> Result<()> {
        let n = self.vertices.len();
        if self.normals.len() != n || self.uvs.len() != n {
            return Err(MeshError::invalid_template(format!(
                "{n} vertices but {} normals and {} uvs",
                self.normals.len(),
                self.uvs.len()
            )));
        }
        if self.triangles.len() % 3 != 0 {
            return Err(MeshError::invalid_template(format!(
                "triangle list length {} is not a multiple of 3",
                self.triangles.len()
            )));
        }
        if let Some(&bad) = self.triangles.iter().find(|&&i| i as usize >= n) {
            return Err(MeshError::invalid_template(format!(
                "triangle index {bad} out of range for {n} vertices"
            )));
        }
        if !(self.size.is_finite() && self.size.min_element() > 0.0) {
            return Err(MeshError::invalid_template(format!(
                "size {} must be positive on every axis",
                self.size
            )));
        }
        if n > max_batch_vertices {
            return Err(MeshError::invalid_template(format!(
                "{n} vertices exceed the batch limit of {max_batch_vertices}"
            )));
        }
        Ok(())
    }
}

/// Templates for one band of floors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingModule {
    /// Used for sections long enough to hold it.
    pub segment: Option<WallTemplate>,
    /// Used for short sections.
    pub alternative: Option<WallTemplate>,
}

impl BuildingModule {
    fn pick(&self, long: bool) -> Option<&WallTemplate> {
        if long {
            self.segment.as_ref()
        } else {
            self.alternative.as_ref()
        }
    }

    fn templates(&self) -> impl Iterator<Item = &WallTemplate> {
        self.segment.iter().chain(self.alternative.iter())
    }
}

/// One render batch of floor walls.
#[derive(Debug, Clone, PartialEq)]
pub struct WallBatch {
    /// Wall geometry, triangles in submesh 0.
    pub mesh: MeshData,
    /// Material slot shared by every batch of a feature.
    pub material: usize,
}

// =============================================================================
// SECTIONS
// =============================================================================

/// Appends the cut points of the edge `from -> to`, both ends included.
///
/// Consecutive points bound one section.
pub(crate) fn split_edge(
    from: DVec3,
    to: DVec3,
    section_length: f64,
    max_sections: usize,
    center: bool,
    min_remainder: f64,
    out: &mut Vec<DVec3>,
) {
    out.push(from);
    let distance = from.distance(to);
    if distance > 0.0 && section_length > 0.0 {
        let dir = (to - from) / distance;
        let count = ((distance / section_length).floor() as usize).min(max_sections);
        if count > 0 {
            let leftover = distance - count as f64 * section_length;
            if center && leftover > min_remainder {
                for s in 0..=count {
                    out.push(from + dir * (leftover / 2.0 + s as f64 * section_length));
                }
            } else {
                for s in 1..count {
                    out.push(from + dir * (s as f64 * section_length));
                }
            }
        }
    }
    out.push(to);
}

// =============================================================================
// BATCHING
// =============================================================================

struct BatchWriter {
    batches: Vec<WallBatch>,
    current: MeshData,
    material: usize,
    limit: usize,
}

impl BatchWriter {
    fn new(material: usize, limit: usize) -> Self {
        Self {
            batches: Vec::new(),
            current: MeshData::new(),
            material,
            limit,
        }
    }

    /// Returns the open batch, closing it first when `vertices` more would
    /// not fit.
    fn room_for(&mut self, vertices: usize) -> &mut MeshData {
        if !self.current.is_empty() && self.current.vertex_count() + vertices > self.limit {
            self.flush();
        }
        &mut self.current
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        tracing::debug!(
            vertices = self.current.vertex_count(),
            batch = self.batches.len(),
            "wall batch flushed"
        );
        self.batches.push(WallBatch {
            mesh: std::mem::take(&mut self.current),
            material: self.material,
        });
    }

    fn finish(mut self) -> Vec<WallBatch> {
        self.flush();
        self.batches
    }
}

// =============================================================================
// FLOOR EXTRUDER
// =============================================================================

/// One section being walled, shared by every floor stamped on it.
struct Section {
    /// End nearer the edge start.
    near: DVec3,
    /// End nearer the edge end; templates are anchored here.
    far: DVec3,
    rotation: DMat3,
    length: f64,
}

/// Builds storeyed walls from wall templates.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use rand::{rngs::StdRng, SeedableRng};
/// use tile_mesh::extrude::{BuildingModule, FloorExtruder, FloorOptions};
/// use tile_mesh::polygon::{PolygonBuilder, PolygonScratch};
/// use tile_mesh::{Feature, GeometryKind, MeshData, TileContext};
///
/// let feature = Feature::new(1, GeometryKind::Polygon)
///     .with_ring(vec![
///         DVec3::new(0.0, 0.0, 0.0),
///         DVec3::new(0.0, 0.0, 10.0),
///         DVec3::new(10.0, 0.0, 10.0),
///         DVec3::new(10.0, 0.0, 0.0),
///     ])
///     .with_property("height", 10.0);
///
/// let mut rng = StdRng::seed_from_u64(3);
/// let mut md = MeshData::new();
/// PolygonBuilder::new(Default::default(), &Default::default()).build(
///     &feature.rings,
///     &TileContext::default(),
///     &mut rng,
///     &mut md,
///     &mut PolygonScratch::default(),
/// );
///
/// let floors = FloorExtruder::new(
///     FloorOptions::default(),
///     BuildingModule::default(),
///     BuildingModule::default(),
///     1,
///     &Default::default(),
/// )
/// .unwrap();
/// let batches = floors.extrude(&feature, &mut md, 1.0, &mut rng);
/// assert_eq!(batches.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FloorExtruder {
    options: FloorOptions,
    upper: BuildingModule,
    ground: BuildingModule,
    material_count: usize,
    max_batch_vertices: usize,
}

impl FloorExtruder {
    /// Creates a floor extruder, validating options and every template.
    pub fn new(
        options: FloorOptions,
        upper: BuildingModule,
        ground: BuildingModule,
        material_count: usize,
        config: &MeshConfig,
    ) -> Result<Self> {
        options.validate()?;
        for template in upper.templates().chain(ground.templates()) {
            template.validate(config.max_batch_vertices)?;
        }
        Ok(Self {
            options,
            upper,
            ground,
            material_count,
            max_batch_vertices: config.max_batch_vertices,
        })
    }

    /// Returns the options in use.
    pub fn options(&self) -> &FloorOptions {
        &self.options
    }

    /// Raises the roof in `md` to the feature height and returns the walls
    /// under its boundary edges.
    ///
    /// The material index is drawn from `rng` once per call. Walls always
    /// start at ground level: `min_height` and forced heights are not read.
    pub fn extrude<R: Rng>(&self, feature: &Feature, md: &mut MeshData, scale: f64, rng: &mut R) -> Vec<WallBatch> {
        let material = if self.material_count > 0 {
            rng.gen_range(0..self.material_count)
        } else {
            0
        };
        if md.is_empty() {
            return Vec::new();
        }

        let height = feature
            .number(HEIGHT_PROPERTY)
            .unwrap_or(self.options.default_height)
            * scale;
        for v in md.vertices_mut() {
            v.y += height;
        }
        if height <= 0.0 {
            return Vec::new();
        }

        let floor_height = self.options.floor_height * scale;
        let first_floor = self.options.first_floor_height * scale;
        let upper_floors = ((height - first_floor) / floor_height).floor().max(0.0) as usize;
        let ground_height = height - upper_floors as f64 * floor_height;

        let mut writer = BatchWriter::new(material, self.max_batch_vertices);
        let mut cuts = Vec::new();
        let mut depth_scale = None;
        let mut warned = false;

        for &[a, b] in md.edges() {
            let (v1, v2) = (md.vertices()[a as usize], md.vertices()[b as usize]);
            let normal = wall_normal(v1, v2);
            if normal == DVec3::ZERO {
                continue;
            }
            let rotation = DMat3::from_cols(UP.cross(normal), UP, normal);

            cuts.clear();
            split_edge(
                v1,
                v2,
                self.options.preferred_section_length * scale,
                self.options.max_edge_sections,
                self.options.center_segments,
                CENTERING_MIN_REMAINDER * scale,
                &mut cuts,
            );

            for pair in cuts.windows(2) {
                let section = Section {
                    near: pair[0],
                    far: pair[1],
                    rotation,
                    length: pair[0].distance(pair[1]),
                };
                if section.length <= 0.0 {
                    continue;
                }
                let long = section.length > MIN_SEGMENT_SECTION_LENGTH * scale;

                for floor in 1..=upper_floors {
                    let top = floor as f64 - 1.0;
                    self.place(
                        &mut writer,
                        self.upper.pick(long),
                        &section,
                        top * floor_height,
                        floor_height,
                        &mut depth_scale,
                        &mut warned,
                    );
                }
                if ground_height > 0.0 {
                    self.place(
                        &mut writer,
                        self.ground.pick(long),
                        &section,
                        upper_floors as f64 * floor_height,
                        ground_height,
                        &mut depth_scale,
                        &mut warned,
                    );
                }
            }
        }

        let batches = writer.finish();
        tracing::trace!(
            id = feature.id,
            batches = batches.len(),
            upper_floors,
            material,
            "floor walls built"
        );
        batches
    }

    /// Places one storey of one section, `drop` below the roof.
    #[allow(clippy::too_many_arguments)]
    fn place(
        &self,
        writer: &mut BatchWriter,
        template: Option<&WallTemplate>,
        section: &Section,
        drop: f64,
        storey: f64,
        depth_scale: &mut Option<f64>,
        warned: &mut bool,
    ) {
        let Some(template) = template else {
            if !*warned {
                tracing::warn!("wall segment template missing, using flat walls");
                *warned = true;
            }
            let lower = DVec3::new(0.0, drop, 0.0);
            let md = writer.room_for(4);
            push_wall_quad(md, 0, section.near - lower, section.far - lower, storey, drop);
            return;
        };

        let x_scale = section.length / template.size.x * TEMPLATE_OVERLAP;
        let z_scale = *depth_scale.get_or_insert(x_scale);
        let stretch = DVec3::new(x_scale, storey / template.size.y, z_scale);
        let anchor = section.far - DVec3::new(0.0, drop + storey, 0.0);
        let tangent = section.rotation.x_axis;

        let md = writer.room_for(template.vertex_count());
        let base = md.vertex_count() as u32;
        md.reserve(template.vertex_count(), template.triangles.len());
        for ((&position, &normal), &uv) in template
            .vertices
            .iter()
            .zip(&template.normals)
            .zip(&template.uvs)
        {
            md.push_vertex(
                Vertex::new(anchor + section.rotation * (position * stretch))
                    .with_normal((section.rotation * normal).normalize_or_zero())
                    .with_tangent(tangent)
                    .with_uv(uv),
            );
        }
        md.submesh_mut(0)
            .extend(template.triangles.iter().map(|&i| base + i));
    }
}
