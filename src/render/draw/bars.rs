//! Grouped bar chart rendering: faceted columns, grouped bars, axis ticks,
//! toggle rows and the conditional legend.

#![allow(clippy::too_many_arguments)]

use super::common::{
    draw_axis_frame, draw_chart_title, draw_legend_row, draw_tile_border, draw_toggle_row,
    PlotArea, ToggleItem,
};
use crate::core::{BarChart, CategoryMode, FacetMode};
use crate::render::components::{BarGrow, BarHover, BarViewState, ToggleAction, Transition};
use crate::render::{TileRect, UnitMeshes};
use crate::scale::{format_tick, BandScale, CategoryColors, LinearScale};
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

pub fn draw_bar_chart(
    commands: &mut Commands,
    root: Entity,
    chart: &BarChart,
    view: &BarViewState,
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

    // Two control rows under the title: facet mode, then category filter.
    let row_height = 22.0;
    let top = rect.world_center.y + rect.world_size.y * 0.5;
    let facet_row_y = top - title_height - row_height * 0.5 - 4.0;
    let category_row_y = facet_row_y - row_height;

    draw_toggle_row(
        commands,
        root,
        tile_index,
        vec![
            ToggleItem {
                label: "Per Model".into(),
                action: ToggleAction::Facet(FacetMode::PerModel),
                active: view.facet == FacetMode::PerModel,
            },
            ToggleItem {
                label: "Average".into(),
                action: ToggleAction::Facet(FacetMode::Averaged),
                active: view.facet == FacetMode::Averaged,
            },
        ],
        rect.world_center.x,
        facet_row_y,
        unit,
        materials,
        layers.clone(),
    );
    draw_toggle_row(
        commands,
        root,
        tile_index,
        vec![
            ToggleItem {
                label: "All Categories".into(),
                action: ToggleAction::Categories(CategoryMode::AllCategories),
                active: view.categories == CategoryMode::AllCategories,
            },
            ToggleItem {
                label: "Overall Only".into(),
                action: ToggleAction::Categories(CategoryMode::OverallOnly),
                active: view.categories == CategoryMode::OverallOnly,
            },
        ],
        rect.world_center.x,
        category_row_y,
        unit,
        materials,
        layers.clone(),
    );

    let header = title_height + 2.0 * row_height + 8.0;
    let area = PlotArea::of(rect, header);

    let facets = chart.facets(view.facet, view.categories);
    let filtered = chart.filtered(view.categories);
    let active_types = BarChart::active_bias_types(&filtered);

    // Color domain is the full category set, so colors survive filtering.
    let colors = CategoryColors::new(chart.bias_types());

    // Shared scales: loss order and the y domain span every facet.
    let losses = chart.loss_order();
    let max_value = filtered.iter().fold(0.0f32, |m, r| m.max(r.value));
    let y = LinearScale::new((0.0, max_value), (area.bottom, area.top())).nice(5);

    // Horizontal grid lines and y tick labels span the whole plot area.
    let grid_mat = materials.add(ColorMaterial::from(Color::srgba(0.35, 0.35, 0.42, 0.35)));
    commands.entity(root).with_children(|parent| {
        for tick in y.ticks(5) {
            let ty = y.px(tick);
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
            parent.spawn((
                Text2d::new(format_tick(tick)),
                TextFont {
                    font_size: 9.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.75, 0.9)),
                Transform::from_translation(Vec3::new(area.left - 16.0, ty, 1.0)),
                layers.clone(),
            ));
        }

        if let Some(ref unit_label) = chart.unit_label {
            parent.spawn((
                Text2d::new(unit_label.clone()),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(0.8, 0.8, 0.85, 0.9)),
                Transform {
                    translation: Vec3::new(area.left - 38.0, area.center_y(), 1.0),
                    rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                    ..default()
                },
                layers.clone(),
            ));
        }
    });

    if facets.is_empty() {
        // Nothing to plot; leave the axes and controls standing.
        draw_axis_frame(commands, root, &area, unit, materials, layers);
        return;
    }

    let n = facets.len();
    let facet_gap = if n > 1 { 14.0 } else { 0.0 };
    let facet_width = (area.width - facet_gap * (n as f32 - 1.0)) / n as f32;

    let axis_mat = materials.add(ColorMaterial::from(Color::srgba(0.61, 0.64, 0.69, 0.9)));

    for (fi, facet) in facets.iter().enumerate() {
        let left = area.left + fi as f32 * (facet_width + facet_gap);
        let right = left + facet_width;

        let x0 = BandScale::new(&losses, (left, right), 0.2);
        let x1 = BandScale::new(&active_types, (0.0, x0.bandwidth()), 0.05);

        commands.entity(root).with_children(|parent| {
            // Facet subtitle sits just above its column.
            if n > 1 || view.facet == FacetMode::Averaged {
                parent.spawn((
                    Text2d::new(facet.title.clone()),
                    TextFont {
                        font_size: 11.0,
                        ..default()
                    },
                    TextColor(Color::srgba(0.85, 0.85, 0.9, 0.95)),
                    Transform::from_translation(Vec3::new(
                        (left + right) * 0.5,
                        area.top() + 10.0,
                        1.0,
                    )),
                    layers.clone(),
                ));
            }

            // Per-facet baseline.
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(axis_mat.clone()),
                Transform {
                    translation: Vec3::new((left + right) * 0.5, area.bottom, 0.5),
                    scale: Vec3::new(facet_width, 1.0, 1.0),
                    ..default()
                },
                layers.clone(),
            ));

            // Loss labels, rotated so long names stay readable.
            for loss in x0.keys() {
                if let Some(off) = x0.offset(loss) {
                    parent.spawn((
                        Text2d::new(loss.clone()),
                        TextFont {
                            font_size: 9.0,
                            ..default()
                        },
                        TextColor(Color::srgba(0.7, 0.7, 0.75, 0.9)),
                        Transform {
                            translation: Vec3::new(
                                off + x0.bandwidth() * 0.5,
                                area.bottom - 16.0,
                                1.0,
                            ),
                            rotation: Quat::from_rotation_z(-std::f32::consts::FRAC_PI_4),
                            ..default()
                        },
                        layers.clone(),
                    ));
                }
            }
        });

        for record in &facet.records {
            let Some(group_left) = x0.offset(&record.loss) else {
                continue;
            };
            let Some(inner) = x1.offset(&record.bias_type) else {
                continue;
            };

            let bar_x = group_left + inner + x1.bandwidth() * 0.5;
            let bar_width = x1.bandwidth().max(1.0);
            let bar_top = y.px(record.value.max(0.0));
            let full_height = (bar_top - area.bottom).max(0.0);

            // One material per bar so hover can dim it independently.
            let mat = materials.add(ColorMaterial::from(bevy::prelude::Color::from(
                colors.color(&record.bias_type),
            )));

            commands.entity(root).with_children(|parent| {
                parent.spawn((
                    Mesh2d(unit.quad.clone()),
                    MeshMaterial2d(mat),
                    // Starts flat on the baseline; the grow transition
                    // stretches it to full height.
                    Transform {
                        translation: Vec3::new(bar_x, area.bottom, 1.0),
                        scale: Vec3::new(bar_width, 0.0, 1.0),
                        ..default()
                    },
                    BarGrow {
                        full_height,
                        base_y: area.bottom,
                        width: bar_width,
                        x: bar_x,
                    },
                    Transition::new(0.5),
                    BarHover {
                        bias_type: record.bias_type.clone(),
                        loss: record.loss.clone(),
                        model: record.model.clone(),
                        value: record.value,
                        area: Rect::from_center_size(
                            Vec2::new(bar_x, area.bottom + full_height * 0.5),
                            Vec2::new(bar_width, full_height.max(4.0)),
                        ),
                        hovered: false,
                    },
                    layers.clone(),
                ));
            });
        }
    }

    // Legend only when more than one category is in play.
    if active_types.len() > 1 {
        let legend_x = area.right() - 70.0;
        let mut legend_y = area.top() - 4.0;
        for bias_type in &active_types {
            draw_legend_row(
                commands,
                root,
                bias_type.clone(),
                bevy::prelude::Color::from(colors.color(bias_type)),
                legend_x,
                legend_y,
                unit,
                materials,
                layers.clone(),
            );
            legend_y -= 14.0;
        }
    }
}
