use super::*;
use crate::core::Chart;
use crate::render::draw::{annulus_mesh, draw_bar_chart, draw_donut_chart, draw_embedding_chart};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_camera::visibility::RenderLayers;
use bevy_camera::{OrthographicProjection, Projection, ScalingMode, Viewport};
use bevy_math::UVec2;
use std::collections::HashSet;

/// Core system: sync showcase charts to tile entities.
pub fn sync_charts_to_tiles(
    mut commands: Commands,
    showcase: Res<ShowcaseRes>,
    mut registry: ResMut<TileRegistry>,
    existing: Query<(Entity, &ChartTile)>,
) {
    let chart_ids: Vec<ChartId> = showcase.0.charts.iter().map(|c| c.id()).collect();

    // Remove tiles for charts that no longer exist.
    for (entity, tile) in existing.iter() {
        if !chart_ids.contains(&tile.id) {
            cleanup_tile(&mut commands, &mut registry, entity, tile.id);
        }
    }

    // Create missing tiles.
    for (i, chart) in showcase.0.charts.iter().enumerate() {
        let id = chart.id();
        if !registry.by_chart.contains_key(&id) {
            let tile = spawn_tile(&mut commands, id, i, chart);
            registry.by_chart.insert(id, tile);
            registry.dirty.push_back(id);
        }
    }
}

fn spawn_tile(commands: &mut Commands, id: ChartId, index: usize, chart: &Chart) -> Entity {
    let kind = match chart {
        Chart::Bars(_) => ChartKind::Bars,
        Chart::Donut(_) => ChartKind::Donut,
        Chart::Embedding(_) => ChartKind::Embedding,
    };

    let tile = commands
        .spawn((
            ChartTile { id, index, kind },
            kind,
            TileRect {
                world_center: Vec2::ZERO,
                world_size: Vec2::new(100.0, 100.0),
                content: Rect::from_center_size(Vec2::ZERO, Vec2::new(70.0, 70.0)),
                viewport: Viewport {
                    physical_position: UVec2::ZERO,
                    physical_size: UVec2::new(100, 100),
                    depth: 0.0..1.0,
                },
            },
            Transform::default(),
            Visibility::default(),
        ))
        .id();

    // View state lives on the tile, not the render root, so it survives
    // redraws and dies with the tile.
    match chart {
        Chart::Bars(_) => {
            commands.entity(tile).insert(BarViewState::default());
        }
        Chart::Embedding(c) => {
            commands
                .entity(tile)
                .insert(EmbeddingViewState::new(c.first_category().unwrap_or_default()));
        }
        Chart::Donut(_) => {}
    }

    let root = commands
        .spawn((TileRenderRoot, Transform::default(), Visibility::default()))
        .id();
    commands.entity(tile).add_child(root);

    tile
}

/// Update tile layout when the window resizes.
pub fn update_tile_layout(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut registry: ResMut<TileRegistry>,
    mut tiles: Query<(&ChartTile, &mut TileRect)>,
    showcase: Res<ShowcaseRes>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let n = showcase.0.charts.len();
    if n == 0 {
        return;
    }

    let (cols, rows) = match showcase.0.columns {
        Some(cols) => {
            let cols = cols.clamp(1, n);
            (cols, n.div_ceil(cols))
        }
        None => grid_dims(n, window.width() / window.height()),
    };

    let margin = 20.0;
    let gap = 10.0;

    let avail_w = window.width() - 2.0 * margin;
    let avail_h = window.height() - 2.0 * margin;

    let tile_w = (avail_w - (cols - 1) as f32 * gap) / cols as f32;
    let tile_h = (avail_h - (rows - 1) as f32 * gap) / rows as f32;

    for (tile, mut rect) in tiles.iter_mut() {
        let col = tile.index % cols;
        let row = tile.index / cols;

        // Viewport in physical pixels.
        let vp_x = margin + col as f32 * (tile_w + gap);
        let vp_y = margin + row as f32 * (tile_h + gap);

        let scale = window.resolution.scale_factor() as f32;
        let phys_pos = UVec2::new((vp_x * scale).round() as u32, (vp_y * scale).round() as u32);
        let phys_size = UVec2::new(
            (tile_w * scale).round() as u32,
            (tile_h * scale).round() as u32,
        );

        // World coordinates (centered origin).
        let world_center = Vec2::new(
            vp_x + tile_w * 0.5 - window.width() * 0.5,
            window.height() * 0.5 - vp_y - tile_h * 0.5,
        );

        let new_size = Vec2::new(tile_w, tile_h);

        // Only mark dirty if the layout actually changed; a resize is the
        // one event that forces a full redraw at the new size.
        let changed = rect.world_center != world_center
            || rect.world_size != new_size
            || rect.viewport.physical_position != phys_pos
            || rect.viewport.physical_size != phys_size;

        if changed {
            rect.world_center = world_center;
            rect.world_size = new_size;
            rect.content =
                Rect::from_center_size(world_center, Vec2::new(tile_w - 30.0, tile_h - 30.0));
            rect.viewport = Viewport {
                physical_position: phys_pos,
                physical_size: phys_size,
                depth: 0.0..1.0,
            };

            registry.dirty.push_back(tile.id);
        }
    }
}

/// Create/update cameras for each tile.
pub fn sync_tile_cameras(
    mut commands: Commands,
    mut registry: ResMut<TileRegistry>,
    tiles: Query<(&ChartTile, &TileRect)>,
    existing: Query<Entity, With<TileCamera>>,
) {
    let mut used = HashSet::new();

    for (tile, rect) in tiles.iter() {
        // One layer per tile index (0..31). This is a hard RenderLayers limitation.
        let layers = RenderLayers::layer(tile.index % 32);

        let cam_entity = if let Some(&cam) = registry.camera_of.get(&tile.id) {
            cam
        } else {
            let cam = commands.spawn((TileCamera, Transform::default())).id();
            registry.camera_of.insert(tile.id, cam);
            cam
        };

        used.insert(cam_entity);

        let mut ortho = OrthographicProjection::default_2d();
        ortho.scaling_mode = ScalingMode::FixedVertical {
            viewport_height: rect.world_size.y,
        };

        commands.entity(cam_entity).insert((
            Camera2d::default(),
            Camera {
                viewport: Some(rect.viewport.clone()),
                order: 10 + tile.index as isize,
                ..default()
            },
            Projection::from(ortho),
            Transform::from_translation(rect.world_center.extend(1000.0)),
            layers,
        ));
    }

    for cam_entity in existing.iter() {
        if !used.contains(&cam_entity) {
            commands.entity(cam_entity).despawn();
        }
    }
}

/// Track the cursor in world coordinates and which tile it is over.
pub fn update_cursor_world(
    windows: Query<&Window, With<PrimaryWindow>>,
    tiles: Query<(&ChartTile, &TileRect)>,
    mut cursor: ResMut<CursorWorldPos>,
    mut hovered: ResMut<HoveredTile>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(screen) = window.cursor_position() else {
        cursor.position = None;
        cursor.tile_index = None;
        hovered.0 = None;
        return;
    };

    let world = Vec2::new(
        screen.x - window.width() * 0.5,
        window.height() * 0.5 - screen.y,
    );
    cursor.position = Some(world);

    hovered.0 = tiles
        .iter()
        .find(|(_, rect)| {
            let half = rect.world_size * 0.5;
            let min = rect.world_center - half;
            let max = rect.world_center + half;
            world.x >= min.x && world.x <= max.x && world.y >= min.y && world.y <= max.y
        })
        .map(|(tile, _)| tile.index);
    cursor.tile_index = hovered.0;
}

/// Apply toggle-button clicks to the owning tile's view state and queue a
/// redraw. View state is the only thing that survives; everything drawn is
/// rebuilt from it.
pub fn handle_toggle_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    cursor: Res<CursorWorldPos>,
    buttons: Query<&ToggleButton>,
    mut registry: ResMut<TileRegistry>,
    mut tiles: Query<(
        &ChartTile,
        Option<&mut BarViewState>,
        Option<&mut EmbeddingViewState>,
    )>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(pos) = cursor.position else {
        return;
    };

    let Some(button) = buttons.iter().find(|b| b.area.contains(pos)) else {
        return;
    };

    for (tile, bar_view, embedding_view) in tiles.iter_mut() {
        if tile.index != button.tile_index {
            continue;
        }

        let mut changed = false;
        match (&button.action, bar_view, embedding_view) {
            (ToggleAction::Facet(mode), Some(mut view), _) => {
                if view.facet != *mode {
                    view.facet = *mode;
                    changed = true;
                }
            }
            (ToggleAction::Categories(mode), Some(mut view), _) => {
                if view.categories != *mode {
                    view.categories = *mode;
                    changed = true;
                }
            }
            (ToggleAction::SelectCategory(cat), _, Some(mut view)) => {
                if view.category != *cat {
                    view.select_category(cat.clone());
                    changed = true;
                }
            }
            (ToggleAction::SelectState(state), _, Some(mut view)) => {
                if view.state != *state {
                    view.select_state(*state);
                    changed = true;
                }
            }
            _ => {}
        }

        if changed {
            registry.dirty.push_back(tile.id);
        }
    }
}

/// Redraw only dirty tiles: tear down the old render root and rebuild the
/// whole display list from data plus view state.
pub fn draw_dirty_tiles(
    mut commands: Commands,
    mut registry: ResMut<TileRegistry>,
    tiles: Query<(
        Entity,
        &ChartTile,
        &TileRect,
        Option<&BarViewState>,
        Option<&EmbeddingViewState>,
    )>,
    children_q: Query<&Children>,
    is_root_q: Query<(), With<TileRenderRoot>>,
    showcase: Res<ShowcaseRes>,
    unit: Res<UnitMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    while let Some(id) = registry.dirty.pop_front() {
        let Some(&tile_entity) = registry.by_chart.get(&id) else {
            continue;
        };
        let Ok((_e, tile, rect, bar_view, embedding_view)) = tiles.get(tile_entity) else {
            continue;
        };

        // Remove previous render root(s) under this tile, keeping the tile.
        if let Ok(children) = children_q.get(tile_entity) {
            for child in children.iter() {
                if is_root_q.get(child).is_ok() {
                    commands.entity(child).try_despawn();
                }
            }
        }

        let root = commands
            .spawn((TileRenderRoot, Transform::default(), Visibility::default()))
            .id();
        commands.entity(tile_entity).add_child(root);

        let Some(chart) = showcase.0.charts.get(tile.index) else {
            warn!("no chart for tile index {}", tile.index);
            continue;
        };
        debug!("redrawing tile {} ({:?})", tile.index, tile.id);
        let layer = RenderLayers::layer(tile.index % 32);

        match chart {
            Chart::Bars(bars) => {
                let view = bar_view.copied().unwrap_or_default();
                draw_bar_chart(
                    &mut commands,
                    root,
                    bars,
                    &view,
                    tile.index,
                    rect,
                    &unit,
                    &mut materials,
                    layer,
                );
            }
            Chart::Donut(donut) => {
                draw_donut_chart(
                    &mut commands,
                    root,
                    donut,
                    rect,
                    &unit,
                    &mut meshes,
                    &mut materials,
                    layer,
                );
            }
            Chart::Embedding(embedding) => {
                let view = embedding_view.cloned().unwrap_or_else(|| {
                    EmbeddingViewState::new(embedding.first_category().unwrap_or_default())
                });
                draw_embedding_chart(
                    &mut commands,
                    root,
                    embedding,
                    &view,
                    tile.index,
                    rect,
                    &unit,
                    &mut materials,
                    layer,
                );
            }
        }
    }
}

/* -------------------- TRANSITIONS -------------------- */

/// Advance every running transition by the frame delta.
pub fn tick_transitions(time: Res<Time>, mut transitions: Query<&mut Transition>) {
    let dt = time.delta_secs();
    for mut t in transitions.iter_mut() {
        t.elapsed += dt;
    }
}

/// Grow bars from the baseline to their full height.
pub fn apply_bar_grow(
    mut commands: Commands,
    mut bars: Query<(Entity, &Transition, &BarGrow, &mut Transform)>,
) {
    for (entity, transition, grow, mut transform) in bars.iter_mut() {
        let height = grow.full_height * transition.progress();
        transform.translation.x = grow.x;
        transform.translation.y = grow.base_y + height * 0.5;
        transform.scale = Vec3::new(grow.width, height.max(0.001), 1.0);

        if transition.finished() {
            commands.entity(entity).remove::<Transition>();
        }
    }
}

/// Sweep donut slices open by rebuilding their annulus mesh each tick.
pub fn apply_slice_sweep(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    slices: Query<(Entity, &Transition, &SliceSweep, &Mesh2d)>,
) {
    for (entity, transition, sweep, mesh_handle) in slices.iter() {
        if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
            *mesh = annulus_mesh(
                sweep.center,
                sweep.inner,
                sweep.outer,
                sweep.start_angle,
                sweep.full_sweep * transition.progress(),
            );
        }

        if transition.finished() {
            commands.entity(entity).remove::<Transition>();
        }
    }
}

/// Grow scatter points in from nothing.
pub fn apply_point_fade(
    mut commands: Commands,
    mut points: Query<(Entity, &Transition, &PointFade, &mut Transform)>,
) {
    for (entity, transition, fade, mut transform) in points.iter_mut() {
        transform.scale = Vec3::splat(fade.full_size * transition.progress());

        if transition.finished() {
            commands.entity(entity).remove::<Transition>();
        }
    }
}

/// Fade text labels up to their target alpha.
pub fn apply_label_fade(
    mut commands: Commands,
    mut labels: Query<(Entity, &Transition, &LabelFade, &mut TextColor)>,
) {
    for (entity, transition, fade, mut color) in labels.iter_mut() {
        let alpha = fade.target_alpha * transition.progress();
        color.0 = color.0.with_alpha(alpha);

        if transition.finished() {
            commands.entity(entity).remove::<Transition>();
        }
    }
}

/* -------------------- HOVER -------------------- */

/// Dim the hovered bar for feedback. Siblings keep their fill.
pub fn update_bar_hover(
    cursor: Res<CursorWorldPos>,
    mut bars: Query<(&mut BarHover, &MeshMaterial2d<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (mut hover, mat_handle) in bars.iter_mut() {
        let now = cursor
            .position
            .map(|pos| hover.area.contains(pos))
            .unwrap_or(false);
        if hover.hovered == now {
            continue;
        }
        hover.hovered = now;

        if let Some(mat) = materials.get_mut(&mat_handle.0) {
            mat.color = mat.color.with_alpha(hover.fill_alpha());
        }
    }
}

/// Pop the hovered slice out to an emphasized radius at full opacity. The
/// entry sweep owns the mesh while it runs, so hover waits for it.
pub fn update_slice_hover(
    cursor: Res<CursorWorldPos>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut slices: Query<
        (&mut SliceHover, &Mesh2d, &MeshMaterial2d<ColorMaterial>),
        Without<Transition>,
    >,
) {
    for (mut hover, mesh_handle, mat_handle) in slices.iter_mut() {
        let now = cursor
            .position
            .map(|pos| hover.contains(pos))
            .unwrap_or(false);
        if hover.hovered == now {
            continue;
        }
        hover.hovered = now;

        let outer = if now { hover.outer * 1.08 } else { hover.outer };
        if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
            *mesh = annulus_mesh(
                hover.center,
                hover.inner,
                outer,
                hover.start_angle,
                hover.sweep,
            );
        }
        if let Some(mat) = materials.get_mut(&mat_handle.0) {
            mat.color = mat.color.with_alpha(hover.fill_alpha());
        }
    }
}

/// Scale the hovered scatter point up for emphasis.
pub fn update_point_hover(
    cursor: Res<CursorWorldPos>,
    mut points: Query<(&mut PointHover, &PointFade, &mut Transform), Without<Transition>>,
) {
    for (mut hover, fade, mut transform) in points.iter_mut() {
        let now = cursor
            .position
            .map(|pos| pos.distance(hover.center) <= hover.radius)
            .unwrap_or(false);
        if hover.hovered == now {
            continue;
        }
        hover.hovered = now;

        let factor = if now { 1.5 } else { 1.0 };
        transform.scale = Vec3::splat(fade.full_size * factor);
    }
}

/// Recreate the tooltip each frame for whatever is hovered. Parenting it
/// under the tile means a redraw or removal can never leave one behind.
pub fn update_tooltips(
    mut commands: Commands,
    cursor: Res<CursorWorldPos>,
    tooltips: Query<Entity, With<Tooltip>>,
    tiles: Query<(Entity, &ChartTile)>,
    bars: Query<&BarHover>,
    slices: Query<&SliceHover>,
    points: Query<&PointHover>,
) {
    for entity in tooltips.iter() {
        commands.entity(entity).try_despawn();
    }

    let (Some(pos), Some(tile_index)) = (cursor.position, cursor.tile_index) else {
        return;
    };

    // Scatter tooltips carry a header line colored like the point's type.
    let (header, text) = if let Some(bar) = bars.iter().find(|b| b.hovered) {
        (None, bar.tooltip_text())
    } else if let Some(slice) = slices.iter().find(|s| s.hovered) {
        (None, slice.tooltip_text())
    } else if let Some(point) = points.iter().find(|p| p.hovered) {
        let (label, color) = point.header();
        (
            Some((label.to_string(), Color::from(color))),
            point.body(),
        )
    } else {
        return;
    };
    let Some((tile_entity, _)) = tiles.iter().find(|(_, t)| t.index == tile_index) else {
        return;
    };

    let layers = RenderLayers::layer(tile_index % 32);
    let tooltip = commands
        .spawn((
            Tooltip { tile_index },
            Text2d::new(text),
            TextFont {
                font_size: 10.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.95)),
            Transform::from_translation(Vec3::new(pos.x + 14.0, pos.y + 14.0, 9.0)),
            layers.clone(),
        ))
        .id();
    commands.entity(tile_entity).add_child(tooltip);

    if let Some((label, color)) = header {
        let header_entity = commands
            .spawn((
                Tooltip { tile_index },
                Text2d::new(label),
                TextFont {
                    font_size: 10.0,
                    ..default()
                },
                TextColor(color),
                Transform::from_translation(Vec3::new(pos.x + 14.0, pos.y + 28.0, 9.0)),
                layers,
            ))
            .id();
        commands.entity(tile_entity).add_child(header_entity);
    }
}

/* -------------------- HELPERS -------------------- */

fn grid_dims(n: usize, aspect: f32) -> (usize, usize) {
    match n {
        0 => (0, 0),
        1 => (1, 1),
        2 => {
            if aspect > 1.35 {
                (2, 1)
            } else {
                (1, 2)
            }
        }
        3 => {
            if aspect > 1.35 {
                (3, 1)
            } else {
                (2, 2)
            }
        }
        _ => {
            let cols = (n as f32).sqrt().ceil() as usize;
            let rows = n.div_ceil(cols);
            (cols, rows)
        }
    }
}

fn cleanup_tile(commands: &mut Commands, registry: &mut TileRegistry, entity: Entity, id: ChartId) {
    commands.entity(entity).despawn();
    registry.by_chart.remove(&id);
    registry.camera_of.remove(&id);
}
