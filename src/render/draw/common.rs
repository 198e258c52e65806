//! Common drawing utilities shared across chart types.

use crate::render::components::{ToggleAction, ToggleButton};
use crate::render::{TileRect, UnitMeshes};
use bevy::prelude::*;
use bevy_camera::visibility::RenderLayers;

/// Draw a border around a tile rect.
pub fn draw_tile_border(
    commands: &mut Commands,
    root: Entity,
    rect: &TileRect,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: RenderLayers,
    color: Color,
    z: f32,
) {
    let border_mat = materials.add(ColorMaterial::from(color));
    let border_thickness = 2.0;

    commands.entity(root).with_children(|parent| {
        for (dx, dy) in [(0.0, 0.5), (0.0, -0.5), (-0.5, 0.0), (0.5, 0.0)] {
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(border_mat.clone()),
                Transform {
                    translation: Vec3::new(
                        rect.world_center.x + dx * rect.world_size.x,
                        rect.world_center.y + dy * rect.world_size.y,
                        z,
                    ),
                    scale: if dx == 0.0 {
                        Vec3::new(rect.world_size.x, border_thickness, 1.0)
                    } else {
                        Vec3::new(border_thickness, rect.world_size.y, 1.0)
                    },
                    ..default()
                },
                layers.clone(),
            ));
        }
    });
}

/// Draw title and description for a chart.
/// Returns the height used by the title area (for adjusting chart content).
pub fn draw_chart_title(
    commands: &mut Commands,
    root: Entity,
    meta: &crate::core::ChartMeta,
    rect: &TileRect,
    layers: RenderLayers,
) -> f32 {
    let mut title_height = 0.0;

    if meta.title.is_none() && meta.description.is_none() {
        return title_height;
    }

    let title_y = rect.world_center.y + rect.world_size.y * 0.5 - 18.0;

    commands.entity(root).with_children(|parent| {
        if let Some(title) = &meta.title {
            parent.spawn((
                Text2d::new(title.clone()),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.95)),
                Transform::from_translation(Vec3::new(rect.world_center.x, title_y, 3.0)),
                layers.clone(),
            ));
            title_height += 22.0;
        }

        if let Some(desc) = &meta.description {
            let desc_y = title_y - if meta.title.is_some() { 16.0 } else { 0.0 };
            parent.spawn((
                Text2d::new(desc.clone()),
                TextFont {
                    font_size: 10.0,
                    ..default()
                },
                TextColor(Color::srgba(0.7, 0.7, 0.7, 0.85)),
                Transform::from_translation(Vec3::new(rect.world_center.x, desc_y, 3.0)),
                layers,
            ));
            title_height += 14.0;
        }
    });

    title_height
}

/// Padded drawing area inside a tile, below any header content.
#[derive(Clone, Copy, Debug)]
pub struct PlotArea {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotArea {
    /// Carve the plot area out of a tile rect, reserving `header` pixels at
    /// the top for title and controls.
    pub fn of(rect: &TileRect, header: f32) -> Self {
        let padding_left = 0.13;
        let padding_right = 0.06;
        let padding_bottom = 0.16;
        let padding_top = 0.06;

        let width = rect.world_size.x * (1.0 - padding_left - padding_right);
        let height =
            (rect.world_size.y * (1.0 - padding_bottom - padding_top) - header).max(10.0);
        let left =
            rect.world_center.x - rect.world_size.x * 0.5 + rect.world_size.x * padding_left;
        let bottom =
            rect.world_center.y - rect.world_size.y * 0.5 + rect.world_size.y * padding_bottom;

        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.left + self.width * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.bottom + self.height * 0.5
    }
}

/// Draw the left and bottom axis lines of a plot area.
pub fn draw_axis_frame(
    commands: &mut Commands,
    root: Entity,
    area: &PlotArea,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: RenderLayers,
) {
    let axis_mat = materials.add(ColorMaterial::from(Color::srgba(0.61, 0.64, 0.69, 0.9)));

    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(axis_mat.clone()),
            Transform {
                translation: Vec3::new(area.center_x(), area.bottom, 0.5),
                scale: Vec3::new(area.width, 1.0, 1.0),
                ..default()
            },
            layers.clone(),
        ));
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(axis_mat),
            Transform {
                translation: Vec3::new(area.left, area.center_y(), 0.5),
                scale: Vec3::new(1.0, area.height, 1.0),
                ..default()
            },
            layers.clone(),
        ));
    });
}

/// One clickable toggle in a control row.
pub struct ToggleItem {
    pub label: String,
    pub action: ToggleAction,
    pub active: bool,
}

/// Draw a horizontal row of toggle buttons centered at `center_x`, with the
/// row's vertical center at `y`. Buttons register world-space hit areas for
/// the click handler.
pub fn draw_toggle_row(
    commands: &mut Commands,
    root: Entity,
    tile_index: usize,
    items: Vec<ToggleItem>,
    center_x: f32,
    y: f32,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: RenderLayers,
) {
    if items.is_empty() {
        return;
    }

    let font_size = 10.0;
    let pad_x = 10.0;
    let gap = 6.0;
    let height = 18.0;

    let widths: Vec<f32> = items
        .iter()
        .map(|i| i.label.chars().count() as f32 * font_size * 0.55 + 2.0 * pad_x)
        .collect();
    let total: f32 = widths.iter().sum::<f32>() + gap * (items.len() - 1) as f32;

    let active_mat = materials.add(ColorMaterial::from(Color::srgba(0.35, 0.42, 0.85, 0.95)));
    let idle_mat = materials.add(ColorMaterial::from(Color::srgba(0.2, 0.2, 0.28, 0.9)));

    let mut x = center_x - total * 0.5;
    for (item, width) in items.into_iter().zip(widths) {
        let bx = x + width * 0.5;
        let area = Rect::from_center_size(Vec2::new(bx, y), Vec2::new(width, height));

        commands.entity(root).with_children(|parent| {
            parent.spawn((
                Mesh2d(unit.quad.clone()),
                MeshMaterial2d(if item.active {
                    active_mat.clone()
                } else {
                    idle_mat.clone()
                }),
                Transform {
                    translation: Vec3::new(bx, y, 2.5),
                    scale: Vec3::new(width, height, 1.0),
                    ..default()
                },
                ToggleButton {
                    tile_index,
                    action: item.action,
                    area,
                    active: item.active,
                },
                layers.clone(),
            ));

            parent.spawn((
                Text2d::new(item.label),
                TextFont {
                    font_size,
                    ..default()
                },
                TextColor(if item.active {
                    Color::srgba(1.0, 1.0, 1.0, 1.0)
                } else {
                    Color::srgba(0.75, 0.75, 0.8, 0.95)
                }),
                Transform::from_translation(Vec3::new(bx, y, 2.6)),
                layers.clone(),
            ));
        });

        x += width + gap;
    }
}

/// Draw a legend row (swatch + label) at the given position.
pub fn draw_legend_row(
    commands: &mut Commands,
    root: Entity,
    label: String,
    swatch: Color,
    x: f32,
    y: f32,
    unit: &UnitMeshes,
    materials: &mut Assets<ColorMaterial>,
    layers: RenderLayers,
) {
    let mat = materials.add(ColorMaterial::from(swatch));
    commands.entity(root).with_children(|parent| {
        parent.spawn((
            Mesh2d(unit.quad.clone()),
            MeshMaterial2d(mat),
            Transform {
                translation: Vec3::new(x, y, 2.0),
                scale: Vec3::new(10.0, 10.0, 1.0),
                ..default()
            },
            layers.clone(),
        ));
        // Text is center-anchored, so shift by an estimated half width.
        let est_width = label.chars().count() as f32 * 5.5;
        parent.spawn((
            Text2d::new(label),
            TextFont {
                font_size: 10.0,
                ..default()
            },
            TextColor(Color::srgba(0.85, 0.85, 0.88, 0.95)),
            Transform::from_translation(Vec3::new(x + 10.0 + est_width * 0.5, y, 2.0)),
            layers.clone(),
        ));
    });
}
