//! AR scene: camera, anchor entities and the per-frame render step

use bevy::prelude::*;
use bevy::render::alpha::AlphaMode;
use bevy::window::RequestRedraw;
use markerview_core::{FrameSink, MeshSpec, Polyhedron, SessionState, Shape};

use crate::app::{ArSession, FrameCounter};
use crate::tracker::AnchorPoses;

pub struct ScenePlugin;

/// Marker for the AR camera
#[derive(Component)]
pub struct ArCamera;

/// Root entity following tracked marker `index`
#[derive(Component)]
pub struct AnchorRoot {
    pub index: usize,
}

/// Mesh attached to an anchor root; carries the object's yaw
#[derive(Component)]
pub struct ModelMesh {
    pub index: usize,
}

/// Session generation whose anchors are currently spawned
#[derive(Resource, Default)]
struct SpawnedAnchors {
    generation: Option<u64>,
}

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpawnedAnchors>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (sync_anchor_entities, apply_camera_fov, apply_anchor_poses, render_step)
                    .chain()
                    .after(crate::tracker::poll_anchor_poses),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    // The tracker reports poses relative to a camera at the origin looking down -Z
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::NONE),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            near: 0.01,
            far: 1000.0,
            ..default()
        }),
        Transform::IDENTITY,
        ArCamera,
    ));
}

/// Match the render camera to the tracking camera once it is known
fn apply_camera_fov(session: Res<ArSession>, mut cameras: Query<&mut Projection, With<ArCamera>>) {
    let Some(info) = session.0.tracker_info() else {
        return;
    };
    for mut projection in cameras.iter_mut() {
        if let Projection::Perspective(perspective) = &*projection {
            if (perspective.fov - info.fov_y).abs() < f32::EPSILON {
                continue;
            }
        }
        if let Projection::Perspective(perspective) = &mut *projection {
            tracing::debug!(fov = info.fov_y, "Camera field of view updated");
            perspective.fov = info.fov_y;
        }
    }
}

/// Spawn one anchor entity per catalog model when a session activates and
/// remove them when it ends
fn sync_anchor_entities(
    mut commands: Commands,
    session: Res<ArSession>,
    mut spawned: ResMut<SpawnedAnchors>,
    roots: Query<Entity, With<AnchorRoot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let wanted = (session.0.state() == SessionState::Active).then(|| session.0.generation());
    if spawned.generation == wanted {
        return;
    }

    for entity in roots.iter() {
        commands.entity(entity).despawn();
    }

    if wanted.is_some() {
        for anchor in session.0.anchors() {
            let mesh = meshes.add(shape_mesh(&anchor.mesh.shape));
            let material = materials.add(model_material(&anchor.mesh));
            commands
                .spawn((
                    AnchorRoot { index: anchor.index },
                    Transform::default(),
                    Visibility::Hidden,
                ))
                .with_children(|parent| {
                    parent.spawn((
                        ModelMesh { index: anchor.index },
                        Mesh3d(mesh),
                        MeshMaterial3d(material),
                        Transform::default(),
                    ));
                });
        }
        tracing::info!(anchors = session.0.anchors().len(), "Anchor entities spawned");
    }
    spawned.generation = wanted;
}

/// Place each anchor on its marker; hidden while the marker is out of view
fn apply_anchor_poses(
    session: Res<ArSession>,
    poses: Res<AnchorPoses>,
    mut roots: Query<(&AnchorRoot, &mut Transform, &mut Visibility)>,
) {
    let anchors = session.0.anchors();
    for (root, mut transform, mut visibility) in roots.iter_mut() {
        let tracked = anchors.get(root.index).is_some_and(|a| a.visible);
        let pose = poses.poses.get(&root.index).filter(|_| tracked);
        let target = match pose {
            Some(matrix) => {
                *transform = Transform::from_matrix(*matrix);
                Visibility::Inherited
            }
            None => Visibility::Hidden,
        };
        if *visibility != target {
            *visibility = target;
        }
    }
}

/// Output of one render step, applied to the ECS afterwards
#[derive(Default)]
struct FrameUpdate {
    yaw: Option<(usize, f32)>,
    draws: u32,
}

impl FrameSink for FrameUpdate {
    fn apply_yaw(&mut self, index: usize, yaw: f32) {
        self.yaw = Some((index, yaw));
    }

    fn draw(&mut self) {
        self.draws += 1;
    }
}

/// Per-frame step: rotate the visible active object and keep frames coming
/// while a session runs
fn render_step(
    mut session: ResMut<ArSession>,
    mut counter: ResMut<FrameCounter>,
    mut models: Query<(&ModelMesh, &mut Transform)>,
    mut redraw: MessageWriter<RequestRedraw>,
) {
    let mut frame = FrameUpdate::default();
    if !counter.0.step(&mut session.0, &mut frame) {
        return;
    }

    if let Some((index, yaw)) = frame.yaw {
        for (model, mut transform) in models.iter_mut() {
            if model.index == index {
                transform.rotation = Quat::from_rotation_y(yaw);
            }
        }
    }
    for _ in 0..frame.draws {
        redraw.write(RequestRedraw);
    }
}

/// Engine mesh for a model shape
fn shape_mesh(shape: &Shape) -> Mesh {
    match shape {
        Shape::Sphere { radius } => Sphere::new(*radius).mesh().uv(32, 16),
        Shape::Cone { radius, height } => Mesh::from(Cone::new(*radius, *height)),
        Shape::Cuboid { size } => Mesh::from(Cuboid::new(size[0], size[1], size[2])),
        Shape::Cylinder { radius, height } => Mesh::from(Cylinder::new(*radius, *height)),
        Shape::Torus {
            major_radius,
            minor_radius,
        } => Mesh::from(Torus {
            minor_radius: *minor_radius,
            major_radius: *major_radius,
        }),
        Shape::Capsule { radius, length } => Mesh::from(Capsule3d::new(*radius, *length)),
        Shape::Polyhedron(poly) => polyhedron_mesh(poly),
    }
}

/// Flat-shaded triangle mesh for a polyhedron
fn polyhedron_mesh(poly: &Polyhedron) -> Mesh {
    use bevy::asset::RenderAssetUsages;
    use bevy::mesh::Indices;
    use bevy::render::render_resource::PrimitiveTopology;

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, poly.vertices.clone())
        .with_inserted_indices(Indices::U32(poly.indices.clone()));
    mesh.duplicate_vertices();
    mesh.compute_flat_normals();
    mesh
}

fn model_material(mesh: &MeshSpec) -> StandardMaterial {
    let [r, g, b, a] = mesh.material.rgba();
    StandardMaterial {
        base_color: Color::srgba(r, g, b, a),
        unlit: mesh.material.unlit,
        alpha_mode: AlphaMode::Blend,
        ..default()
    }
}
