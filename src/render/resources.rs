use super::components::ChartId;
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;
use std::collections::{HashMap, VecDeque};

#[derive(Resource, Clone)]
pub struct ShowcaseRes(pub crate::core::Showcase);

impl ShowcaseRes {
    pub fn new(showcase: crate::core::Showcase) -> Self {
        Self(showcase)
    }
}

#[derive(Resource, Default)]
pub struct TileRegistry {
    pub by_chart: HashMap<ChartId, Entity>,
    pub camera_of: HashMap<ChartId, Entity>,
    pub dirty: VecDeque<ChartId>,
}

#[derive(Resource, Default)]
pub struct HoveredTile(pub Option<usize>);

#[derive(Resource, Default)]
pub struct CursorWorldPos {
    /// World position of cursor (if inside the window)
    pub position: Option<Vec2>,
    /// Which tile the cursor is over
    pub tile_index: Option<usize>,
}

#[derive(Resource)]
pub struct UnitMeshes {
    pub quad: Handle<Mesh>,
}

pub fn setup_global_scene(mut commands: Commands) {
    // Main UI camera for elements outside tile viewports (layer 0).
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: 100, // Render after tile cameras (which use order 10+)
            ..default()
        },
        RenderLayers::layer(0),
    ));
}

pub fn setup_unit_meshes(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let quad = meshes.add(Mesh::from(Rectangle::new(1.0, 1.0)));
    commands.insert_resource(UnitMeshes { quad });
}
