pub mod components;
pub mod draw;
pub mod resources;
pub mod systems;

pub use components::*;
pub use resources::*;
use systems::*;

use bevy::prelude::*;

#[derive(Default)]
pub struct ChartRenderPlugin;

impl Plugin for ChartRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TileRegistry>()
            .init_resource::<HoveredTile>()
            .init_resource::<CursorWorldPos>()
            .add_systems(Startup, (setup_global_scene, setup_unit_meshes))
            .add_systems(
                Update,
                (
                    sync_charts_to_tiles,
                    update_tile_layout,
                    sync_tile_cameras,
                    update_cursor_world,
                    handle_toggle_clicks,
                    draw_dirty_tiles,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    tick_transitions,
                    apply_bar_grow,
                    apply_slice_sweep,
                    apply_point_fade,
                    apply_label_fade,
                )
                    .chain()
                    .after(draw_dirty_tiles),
            )
            .add_systems(
                Update,
                (
                    update_bar_hover,
                    update_slice_hover,
                    update_point_hover,
                    update_tooltips,
                )
                    .after(draw_dirty_tiles),
            );
    }
}
