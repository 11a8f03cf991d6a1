//! Geometry factory - turns catalog descriptors into mesh descriptions
//!
//! The factory is pure: it produces a [`MeshSpec`] that the renderer turns
//! into engine meshes and materials. Sizes are derived from the descriptor's
//! `scale` with per-kind multipliers. The three polyhedra are generated here
//! as explicit triangle lists because the engine has no primitive for them.

use glam::Vec3;

use crate::catalog::{GeometryKind, ModelDescriptor, Rgb};

/// Edge length of the placeholder cube used for unknown geometry kinds
pub const FALLBACK_CUBE_SIZE: f32 = 0.1;

/// Color of the placeholder cube
pub const FALLBACK_COLOR: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

/// Opacity of every model material
pub const MATERIAL_OPACITY: f32 = 0.85;

const PHI: f32 = 1.618_034;

/// Which regular polyhedron a [`Polyhedron`] holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolyhedronKind {
    Icosahedron,
    Dodecahedron,
    Octahedron,
}

/// Triangulated polyhedron centered on the origin
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    pub kind: PolyhedronKind,
    pub vertices: Vec<[f32; 3]>,
    /// Triangle list, counter-clockwise when seen from outside
    pub indices: Vec<u32>,
}

impl Polyhedron {
    /// Build a polyhedron whose vertices lie on a sphere of `radius`
    pub fn new(kind: PolyhedronKind, radius: f32) -> Self {
        let (unit_vertices, faces) = match kind {
            PolyhedronKind::Icosahedron => icosahedron(),
            PolyhedronKind::Dodecahedron => dodecahedron(),
            PolyhedronKind::Octahedron => octahedron(),
        };

        let scaled: Vec<Vec3> = unit_vertices.iter().map(|v| *v * radius).collect();
        let indices = faces
            .into_iter()
            .flat_map(|face| orient_outward(&scaled, face))
            .collect();
        let vertices = scaled.iter().map(|v| v.to_array()).collect();

        Self {
            kind,
            vertices,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Shape with its final dimensions
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere { radius: f32 },
    /// Apex along +Y
    Cone { radius: f32, height: f32 },
    Cuboid { size: [f32; 3] },
    Cylinder { radius: f32, height: f32 },
    /// Ring in the XZ plane
    Torus { major_radius: f32, minor_radius: f32 },
    /// `length` is the straight section between the two hemispheres
    Capsule { radius: f32, length: f32 },
    Polyhedron(Polyhedron),
}

impl Shape {
    /// Axis-aligned extents (x, y, z)
    pub fn extents(&self) -> [f32; 3] {
        match self {
            Shape::Sphere { radius } => [2.0 * radius; 3],
            Shape::Cone { radius, height } => [2.0 * radius, *height, 2.0 * radius],
            Shape::Cuboid { size } => *size,
            Shape::Cylinder { radius, height } => [2.0 * radius, *height, 2.0 * radius],
            Shape::Torus {
                major_radius,
                minor_radius,
            } => {
                let outer = 2.0 * (major_radius + minor_radius);
                [outer, 2.0 * minor_radius, outer]
            }
            Shape::Capsule { radius, length } => {
                [2.0 * radius, length + 2.0 * radius, 2.0 * radius]
            }
            Shape::Polyhedron(poly) => {
                let mut min = [f32::MAX; 3];
                let mut max = [f32::MIN; 3];
                for v in &poly.vertices {
                    for axis in 0..3 {
                        min[axis] = min[axis].min(v[axis]);
                        max[axis] = max[axis].max(v[axis]);
                    }
                }
                [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
            }
        }
    }
}

/// Flat, unlit, alpha-blended material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSpec {
    pub color: Rgb,
    pub opacity: f32,
    pub unlit: bool,
}

impl MaterialSpec {
    pub fn flat(color: Rgb) -> Self {
        Self {
            color,
            opacity: MATERIAL_OPACITY,
            unlit: true,
        }
    }

    /// Color with alpha as floats in 0.0-1.0
    pub fn rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.color.to_f32();
        [r, g, b, self.opacity]
    }
}

/// Everything the renderer needs to show one model
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSpec {
    pub shape: Shape,
    pub material: MaterialSpec,
    /// True when the descriptor's kind was unknown and a placeholder was built
    pub fallback: bool,
}

impl MeshSpec {
    pub fn extents(&self) -> [f32; 3] {
        self.shape.extents()
    }

    /// Largest axis-aligned extent
    pub fn bounding_size(&self) -> f32 {
        let [x, y, z] = self.extents();
        x.max(y).max(z)
    }
}

/// Build the mesh description for a catalog entry
pub fn build_mesh(descriptor: &ModelDescriptor) -> MeshSpec {
    let s = descriptor.scale;
    let shape = match descriptor.geometry {
        GeometryKind::Sphere => Shape::Sphere { radius: 0.5 * s },
        GeometryKind::Cone => Shape::Cone {
            radius: 0.5 * s,
            height: 1.5 * s,
        },
        GeometryKind::Box => Shape::Cuboid { size: [s; 3] },
        GeometryKind::Cylinder => Shape::Cylinder {
            radius: 0.4 * s,
            height: 1.2 * s,
        },
        GeometryKind::Torus => Shape::Torus {
            major_radius: 0.4 * s,
            minor_radius: 0.15 * s,
        },
        GeometryKind::Icosahedron => {
            Shape::Polyhedron(Polyhedron::new(PolyhedronKind::Icosahedron, 0.6 * s))
        }
        GeometryKind::Capsule => Shape::Capsule {
            radius: 0.3 * s,
            length: 0.6 * s,
        },
        GeometryKind::Dodecahedron => {
            Shape::Polyhedron(Polyhedron::new(PolyhedronKind::Dodecahedron, 0.6 * s))
        }
        GeometryKind::Octahedron => {
            Shape::Polyhedron(Polyhedron::new(PolyhedronKind::Octahedron, 0.6 * s))
        }
        GeometryKind::Unknown => {
            tracing::warn!(id = %descriptor.id, "Unknown geometry, using placeholder cube");
            return MeshSpec {
                shape: Shape::Cuboid {
                    size: [FALLBACK_CUBE_SIZE; 3],
                },
                material: MaterialSpec::flat(FALLBACK_COLOR),
                fallback: true,
            };
        }
    };

    MeshSpec {
        shape,
        material: MaterialSpec::flat(descriptor.color),
        fallback: false,
    }
}

fn icosahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let t = PHI;
    let vertices = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let faces = vec![
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];

    (vertices, faces)
}

/// Dual of the icosahedron: one vertex per icosahedron face, one pentagon
/// per icosahedron vertex
fn dodecahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let (ico_vertices, ico_faces) = icosahedron();

    let vertices: Vec<Vec3> = ico_faces
        .iter()
        .map(|f| f.iter().map(|&i| ico_vertices[i as usize]).sum::<Vec3>().normalize())
        .collect();

    let mut faces = Vec::with_capacity(36);
    for (corner, axis) in ico_vertices.iter().enumerate() {
        let mut ring: Vec<u32> = ico_faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.contains(&(corner as u32)))
            .map(|(i, _)| i as u32)
            .collect();

        // Sort the pentagon's corners by angle around the icosahedron vertex
        let first = vertices[ring[0] as usize];
        let u = first.reject_from_normalized(*axis).normalize();
        let w = axis.cross(u);
        ring.sort_by(|a, b| {
            let angle = |i: &u32| {
                let d = vertices[*i as usize];
                d.dot(w).atan2(d.dot(u))
            };
            angle(a).total_cmp(&angle(b))
        });

        for k in 1..ring.len() - 1 {
            faces.push([ring[0], ring[k], ring[k + 1]]);
        }
    }

    (vertices, faces)
}

fn octahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    let vertices = vec![
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];

    let mut faces = Vec::with_capacity(8);
    for x in [0, 1] {
        for y in [2, 3] {
            for z in [4, 5] {
                faces.push([x, y, z]);
            }
        }
    }

    (vertices, faces)
}

/// Outward face normal (unnormalized) of a triangle
fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
    (b - a).cross(c - a)
}

/// Flip a triangle if its normal points toward the origin
fn orient_outward(vertices: &[Vec3], face: [u32; 3]) -> [u32; 3] {
    let corners = face.map(|i| vertices[i as usize]);
    let centroid: Vec3 = corners.iter().sum();
    if face_normal(corners).dot(centroid) < 0.0 {
        [face[0], face[2], face[1]]
    } else {
        face
    }
}
