//! Donut chart rendering: annulus slice meshes, the sweep-in entry
//! animation, percentage labels and the center total.

#![allow(clippy::too_many_arguments)]

use super::common::{draw_chart_title, draw_legend_row, draw_tile_border};
use crate::core::DonutChart;
use crate::render::components::{LabelFade, SliceHover, SliceSweep, Transition, SLICE_ALPHA};
use crate::render::{TileRect, UnitMeshes};
use crate::scale::CategoryColors;
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_camera::visibility::RenderLayers;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::f32::consts::TAU;

/// Build an annulus sector mesh. Angles are radians clockwise from
/// 12 o'clock, matching the hover hit test.
pub fn annulus_mesh(center: Vec2, inner: f32, outer: f32, start_angle: f32, sweep: f32) -> Mesh {
    let sweep = sweep.max(0.0);
    let segments = ((sweep / TAU * 64.0).ceil() as usize).max(2);

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity((segments + 1) * 2);
    let mut indices: Vec<u32> = Vec::with_capacity(segments * 6);

    for i in 0..=segments {
        let a = start_angle + sweep * i as f32 / segments as f32;
        // Clockwise from the top: x = sin, y = cos.
        let dir = Vec2::new(a.sin(), a.cos());
        let p_in = center + dir * inner;
        let p_out = center + dir * outer;
        positions.push([p_in.x, p_in.y, 0.0]);
        positions.push([p_out.x, p_out.y, 0.0]);
    }

    for i in 0..segments {
        let base = (i * 2) as u32;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
        indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
    }

    let vertex_count = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; vertex_count];
    let uvs: Vec<[f32; 2]> = vec![[0.0, 0.0]; vertex_count];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub fn draw_donut_chart(
    commands: &mut Commands,
    root: Entity,
    chart: &DonutChart,
    rect: &TileRect,
    unit: &UnitMeshes,
    meshes: &mut Assets<Mesh>,
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

    let total = chart.total();
    if chart.slices.is_empty() || total == 0 {
        return;
    }

    // The ring sits left of center to leave room for the legend column.
    let usable_h = rect.world_size.y - title_height - 20.0;
    let outer = (rect.world_size.x * 0.5).min(usable_h).max(20.0) * 0.62;
    let inner = outer * 0.5;
    let center = Vec2::new(
        rect.world_center.x - rect.world_size.x * 0.12,
        rect.world_center.y - title_height * 0.5,
    );

    let categories: Vec<String> = chart.slices.iter().map(|s| s.category.clone()).collect();
    let colors = CategoryColors::vibrant(categories);

    // Angles come from the counts; stored percentages are display-only.
    let mut start_angle = 0.0f32;
    for slice in &chart.slices {
        let sweep = TAU * slice.count as f32 / total as f32;

        let color = colors.color(&slice.category).with_a(SLICE_ALPHA);
        let mat = materials.add(ColorMaterial::from(bevy::prelude::Color::from(color)));

        // Slices start with zero sweep; the transition grows them in place
        // so the whole ring sweeps around over one second.
        let mesh = meshes.add(annulus_mesh(center, inner, outer, start_angle, 0.0));

        commands.entity(root).with_children(|parent| {
            parent.spawn((
                Mesh2d(mesh),
                MeshMaterial2d(mat),
                Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
                SliceSweep {
                    center,
                    inner,
                    outer,
                    start_angle,
                    full_sweep: sweep,
                },
                Transition::new(1.0),
                SliceHover {
                    category: slice.category.clone(),
                    count: slice.count,
                    percentage: slice.percentage,
                    center,
                    inner,
                    outer,
                    start_angle,
                    sweep,
                    hovered: false,
                },
                layers.clone(),
            ));

            // Percentage label at the slice midpoint, fading in after the
            // sweep has finished.
            let mid = start_angle + sweep * 0.5;
            let label_pos = center + Vec2::new(mid.sin(), mid.cos()) * (inner + outer) * 0.5;
            parent.spawn((
                Text2d::new(format!("{:.1}%", slice.percentage)),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
                Transform::from_translation(label_pos.extend(2.0)),
                LabelFade { target_alpha: 1.0 },
                Transition::new(0.5).with_delay(1.0),
                layers.clone(),
            ));
        });

        start_angle += sweep;
    }

    // Center total and sub-label.
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Text2d::new(total.to_string()),
            TextFont {
                font_size: 22.0,
                ..default()
            },
            TextColor(Color::srgba(1.0, 1.0, 1.0, 0.95)),
            Transform::from_translation(Vec3::new(center.x, center.y + 7.0, 2.0)),
            layers.clone(),
        ));
        if let Some(ref sub) = chart.center_sublabel {
            parent.spawn((
                Text2d::new(sub.clone()),
                TextFont {
                    font_size: 10.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.75, 0.9)),
                Transform::from_translation(Vec3::new(center.x, center.y - 10.0, 2.0)),
                layers.clone(),
            ));
        }
    });

    // Legend column on the right: "Category (count)".
    let legend_x = center.x + outer + 24.0;
    let mut legend_y = center.y + (chart.slices.len() as f32 - 1.0) * 8.0;
    for slice in &chart.slices {
        draw_legend_row(
            commands,
            root,
            format!("{} ({})", slice.category, slice.count),
            bevy::prelude::Color::from(colors.color(&slice.category)),
            legend_x,
            legend_y,
            unit,
            materials,
            layers.clone(),
        );
        legend_y -= 16.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annulus_mesh_has_paired_rim_vertices() {
        let mesh = annulus_mesh(Vec2::ZERO, 50.0, 100.0, 0.0, TAU * 0.25);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .unwrap();
        // Two vertices per ring step, inner then outer.
        assert!(positions.len() >= 6);
        assert_eq!(positions.len() % 2, 0);

        for pair in positions.chunks(2) {
            let r_in = Vec2::new(pair[0][0], pair[0][1]).length();
            let r_out = Vec2::new(pair[1][0], pair[1][1]).length();
            assert!((r_in - 50.0).abs() < 1e-3);
            assert!((r_out - 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn annulus_segment_count_scales_with_sweep() {
        let quarter = annulus_mesh(Vec2::ZERO, 10.0, 20.0, 0.0, TAU * 0.25);
        let full = annulus_mesh(Vec2::ZERO, 10.0, 20.0, 0.0, TAU);
        let count = |m: &Mesh| {
            m.attribute(Mesh::ATTRIBUTE_POSITION)
                .and_then(|a| a.as_float3())
                .unwrap()
                .len()
        };
        assert!(count(&full) > count(&quarter));
    }

    #[test]
    fn annulus_first_vertex_sits_at_the_start_angle() {
        use std::f32::consts::FRAC_PI_2;
        // Start at 3 o'clock (a quarter turn clockwise from the top).
        let mesh = annulus_mesh(Vec2::ZERO, 10.0, 20.0, FRAC_PI_2, 0.1);
        let positions = mesh
            .attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|a| a.as_float3())
            .unwrap();
        assert!((positions[0][0] - 10.0).abs() < 1e-3);
        assert!(positions[0][1].abs() < 1e-3);
    }

    #[test]
    fn zero_sweep_mesh_is_still_valid() {
        let mesh = annulus_mesh(Vec2::ZERO, 10.0, 20.0, 0.0, 0.0);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_POSITION).is_some());
    }
}
