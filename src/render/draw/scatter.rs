//! Embedding explorer rendering: per-selection rescaled scatter plot with
//! category and model-state selectors and staggered point entry.

#![allow(clippy::too_many_arguments)]

use super::common::{
    draw_axis_frame, draw_chart_title, draw_legend_row, draw_tile_border, draw_toggle_row,
    PlotArea, ToggleItem,
};
use crate::core::{EmbeddingChart, ModelState, PointKind};
use crate::render::components::{
    EmbeddingViewState, PointFade, PointHover, ToggleAction, Transition,
};
use crate::render::{TileRect, UnitMeshes};
use crate::scale::{extent, LinearScale};
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

const POINT_SIZE: f32 = 7.0;

pub fn draw_embedding_chart(
    commands: &mut Commands,
    root: Entity,
    chart: &EmbeddingChart,
    view: &EmbeddingViewState,
    tile_index: usize,
    rect: &TileRect,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: RenderLayers,
) {
    draw_tile_border(
        commands,
        root,
        rect,
        unit,
        materials,
        layers.clone(),
        Color::srgb(0.3, 0.3, 0.4),
        1.0,
    );

    let title_height = draw_chart_title(commands, root, &chart.meta, rect, layers.clone());

    let row_height = 22.0;
    let top = rect.world_center.y + rect.world_size.y * 0.5;
    let category_row_y = top - title_height - row_height * 0.5 - 4.0;
    let state_row_y = category_row_y - row_height;
    let selection_title_y = state_row_y - row_height;

    draw_toggle_row(
        commands,
        root,
        tile_index,
        chart
            .categories()
            .into_iter()
            .map(|cat| ToggleItem {
                active: cat == view.category,
                action: ToggleAction::SelectCategory(cat.clone()),
                label: cat,
            })
            .collect(),
        rect.world_center.x,
        category_row_y,
        unit,
        materials,
        layers.clone(),
    );
    draw_toggle_row(
        commands,
        root,
        tile_index,
        [ModelState::Baseline, ModelState::Trained]
            .into_iter()
            .map(|state| ToggleItem {
                label: format!("{} Model", state.label()),
                action: ToggleAction::SelectState(state),
                active: state == view.state,
            })
            .collect(),
        rect.world_center.x,
        state_row_y,
        unit,
        materials,
        layers.clone(),
    );

    // Selection title names the active pair.
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Text2d::new(format!(
                "{} Bias: {} Model",
                view.category,
                view.state.label()
            )),
            TextFont {
                font_size: 12.0,
                ..default()
            },
            TextColor(Color::srgba(0.9, 0.9, 0.95, 0.95)),
            Transform::from_translation(Vec3::new(rect.world_center.x, selection_title_y, 1.0)),
            layers.clone(),
        ));
    });

    let header = title_height + 3.0 * row_height + 12.0;
    let mut area = PlotArea::of(rect, header);

    // Plot stays shorter than wide, capped for very tall tiles.
    let max_height = (area.width * 0.6).min(450.0);
    if area.height > max_height {
        let excess = area.height - max_height;
        area.height = max_height;
        area.bottom += excess * 0.5;
    }

    let points = chart.points_for(&view.category, view.state);

    // Scales refit to the active selection alone, so every selection fills
    // the plot.
    let x_extent = extent(points.iter().map(|p| p.x)).unwrap_or((0.0, 1.0));
    let y_extent = extent(points.iter().map(|p| p.y)).unwrap_or((0.0, 1.0));
    let x = LinearScale::fit(x_extent, 0.1, (area.left, area.right())).nice(6);
    let y = LinearScale::fit(y_extent, 0.1, (area.bottom, area.top())).nice(6);

    // Grid.
    let grid_mat = materials.add(ColorMaterial::from(Color::srgba(0.35, 0.35, 0.42, 0.3)));
    commands.entity(root).with_children(|parent| {
        for tick in x.ticks(6) {
            let tx = x.px(tick);
            if tx < area.left || tx > area.right() {
                continue;
            }
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(grid_mat.clone()),
                Transform {
                    translation: Vec3::new(tx, area.center_y(), 0.2),
                    scale: Vec3::new(1.0, area.height, 1.0),
                    ..default()
                },
                layers.clone(),
            ));
        }
        for tick in y.ticks(6) {
            let ty = y.px(tick);
            if ty < area.bottom || ty > area.top() {
                continue;
            }
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(grid_mat.clone()),
                Transform {
                    translation: Vec3::new(area.center_x(), ty, 0.2),
                    scale: Vec3::new(area.width, 1.0, 1.0),
                    ..default()
                },
                layers.clone(),
            ));
        }

        if let Some(ref x_label) = chart.x_label {
            parent.spawn((
                Text2d::new(x_label.clone()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.85, 0.9)),
                Transform::from_translation(Vec3::new(area.center_x(), area.bottom - 20.0, 1.0)),
                layers.clone(),
            ));
        }
        if let Some(ref y_label) = chart.y_label {
            parent.spawn((
                Text2d::new(y_label.clone()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.85, 0.9)),
                Transform {
                    translation: Vec3::new(area.left - 24.0, area.center_y(), 1.0),
                    rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                    ..default()
                },
                layers.clone(),
            ));
        }
    });

    draw_axis_frame(commands, root, &area, unit, materials, layers.clone());

    // Empty selection renders the frame alone.
    if points.is_empty() {
        return;
    }

    let border_mat = materials.add(ColorMaterial::from(Color::srgba(1.0, 1.0, 1.0, 0.9)));
    let stereo_mat = materials.add(ColorMaterial::from(bevy::prelude::Color::from(
        PointKind::Stereotype.color(),
    )));
    let anti_mat = materials.add(ColorMaterial::from(bevy::prelude::Color::from(
        PointKind::AntiStereotype.color(),
    )));

    for (i, point) in points.iter().enumerate() {
        let world = Vec2::new(x.px(point.x), y.px(point.y));
        let fill = match point.kind {
            PointKind::Stereotype => stereo_mat.clone(),
            PointKind::AntiStereotype => anti_mat.clone(),
        };

        commands.entity(root).with_children(|parent| {
            // Parent carries the hover payload and the entry transition;
            // children give the point a white rim around its fill.
            parent
                .spawn((
                    Transform {
                        translation: world.extend(1.5),
                        scale: Vec3::splat(0.0),
                        ..default()
                    },
                    Visibility::default(),
                    PointFade {
                        full_size: POINT_SIZE,
                    },
                    Transition::new(0.8).with_delay(0.002 * i as f32),
                    PointHover {
                        kind: point.kind,
                        text: point.text.clone(),
                        center: world,
                        radius: POINT_SIZE * 0.75,
                        hovered: false,
                    },
                    layers.clone(),
                ))
                .with_children(|point_parent| {
                    point_parent.spawn((
                        Mesh2d(unit.quad.clone()),
                        MeshMaterial2d(border_mat.clone()),
                        Transform::from_scale(Vec3::splat(1.0)),
                        layers.clone(),
                    ));
                    point_parent.spawn((
                        Mesh2d(unit.quad.clone()),
                        MeshMaterial2d(fill),
                        Transform {
                            translation: Vec3::new(0.0, 0.0, 0.1),
                            scale: Vec3::splat(0.72),
                            ..default()
                        },
                        layers.clone(),
                    ));
                });
        });
    }

    // Legend for the two point kinds.
    let legend_x = area.right() - 90.0;
    let mut legend_y = area.top() - 6.0;
    for kind in [PointKind::Stereotype, PointKind::AntiStereotype] {
        draw_legend_row(
            commands,
            root,
            kind.label().to_string(),
            bevy::prelude::Color::from(kind.color()),
            legend_x,
            legend_y,
            unit,
            materials,
            layers.clone(),
        );
        legend_y -= 14.0;
    }
}
