use crate::core::{CategoryMode, FacetMode, ModelState, PointKind};
use bevy::prelude::*;
use bevy_camera::Viewport;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Component, Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct ChartId(pub u64);

impl Default for ChartId {
    fn default() -> Self {
        static CTR: AtomicU32 = AtomicU32::new(1);
        Self(CTR.fetch_add(1, Ordering::Relaxed).into())
    }
}

impl ChartId {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Component)]
pub struct ChartTile {
    pub id: ChartId,
    pub index: usize,
    pub kind: ChartKind,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bars,
    Donut,
    Embedding,
}

#[derive(Component)]
pub struct TileRect {
    pub world_center: Vec2,
    pub world_size: Vec2,
    pub content: Rect,
    pub viewport: Viewport,
}

#[derive(Component)]
pub struct TileRenderRoot;

#[derive(Component)]
pub struct TileCamera;

/* -------------------- VIEW STATE -------------------- */

/// Bar chart view state. Owned by the tile entity, mutated only by toggle
/// clicks, discarded with the tile.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BarViewState {
    pub facet: FacetMode,
    pub categories: CategoryMode,
}

/// Embedding explorer view state. Each selector sets one axis and preserves
/// the other, so every (category, state) pair present in the data is
/// reachable.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct EmbeddingViewState {
    pub category: String,
    pub state: ModelState,
}

impl EmbeddingViewState {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            state: ModelState::Baseline,
        }
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn select_state(&mut self, state: ModelState) {
        self.state = state;
    }
}

/* -------------------- TOGGLE BUTTONS -------------------- */

#[derive(Clone, Debug, PartialEq)]
pub enum ToggleAction {
    Facet(FacetMode),
    Categories(CategoryMode),
    SelectCategory(String),
    SelectState(ModelState),
}

/// In-canvas button. `area` is the world-space hit rect used by the click
/// handler; `active` mirrors the current view state for styling.
#[derive(Component)]
pub struct ToggleButton {
    pub tile_index: usize,
    pub action: ToggleAction,
    pub area: Rect,
    pub active: bool,
}

/* -------------------- HOVER PAYLOADS -------------------- */

/// Base fill alpha for donut slices; hover raises it to fully opaque.
pub const SLICE_ALPHA: f32 = 0.92;

/// Hover payload for one bar: the tooltip fields plus the hit rect.
#[derive(Component, Clone)]
pub struct BarHover {
    pub bias_type: String,
    pub loss: String,
    pub model: String,
    pub value: f32,
    pub area: Rect,
    pub hovered: bool,
}

impl BarHover {
    /// Hover feedback dims the bar itself; siblings keep their fill.
    pub fn fill_alpha(&self) -> f32 {
        if self.hovered { 0.7 } else { 1.0 }
    }

    pub fn tooltip_text(&self) -> String {
        format!(
            "{}\n{} / {}\n{:.4}",
            self.bias_type, self.model, self.loss, self.value
        )
    }
}

/// Hover payload for one donut slice. The tooltip fields are stored at draw
/// time; geometry is kept so the emphasis mesh can be rebuilt on hover.
#[derive(Component, Clone)]
pub struct SliceHover {
    pub category: String,
    pub count: u32,
    pub percentage: f32,
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    pub start_angle: f32,
    pub sweep: f32,
    pub hovered: bool,
}

impl SliceHover {
    /// Hover raises the slice to fully opaque.
    pub fn fill_alpha(&self) -> f32 {
        if self.hovered { 1.0 } else { SLICE_ALPHA }
    }

    pub fn tooltip_text(&self) -> String {
        format!(
            "{}\n{} sentences ({:.1}%)",
            self.category, self.count, self.percentage
        )
    }

    /// Polar hit test against the slice's final geometry.
    pub fn contains(&self, world: Vec2) -> bool {
        let rel = world - self.center;
        let r = rel.length();
        if r < self.inner || r > self.outer {
            return false;
        }
        // Angles run clockwise from 12 o'clock, matching the draw order.
        let mut angle = rel.x.atan2(rel.y);
        if angle < 0.0 {
            angle += std::f32::consts::TAU;
        }
        let mut offset = angle - self.start_angle;
        if offset < 0.0 {
            offset += std::f32::consts::TAU;
        }
        offset <= self.sweep
    }
}

/// Hover payload for one embedding point.
#[derive(Component, Clone)]
pub struct PointHover {
    pub kind: PointKind,
    pub text: String,
    pub center: Vec2,
    pub radius: f32,
    pub hovered: bool,
}

impl PointHover {
    /// Tooltip header: the kind label, colored to match the point.
    pub fn header(&self) -> (&'static str, crate::core::Color) {
        (self.kind.label(), self.kind.color())
    }

    pub fn body(&self) -> String {
        format!("\"{}\"", self.text)
    }
}

/// Floating tooltip entity, parented under the tile's render root so it is
/// torn down with the tile.
#[derive(Component)]
pub struct Tooltip {
    pub tile_index: usize,
}

/* -------------------- TRANSITIONS -------------------- */

/// A declared animation: wait `delay`, interpolate for `duration` with a
/// cubic ease-out. Ticked by the transition scheduler system; shapes carry a
/// target component describing what the interpolant drives.
#[derive(Component, Clone, Copy, Debug)]
pub struct Transition {
    pub delay: f32,
    pub duration: f32,
    pub elapsed: f32,
}

impl Transition {
    pub fn new(duration: f32) -> Self {
        Self {
            delay: 0.0,
            duration,
            elapsed: 0.0,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Eased progress in [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0);
        let inv = 1.0 - t;
        1.0 - inv * inv * inv
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }
}

/// Bar growth target: scales the unit quad from zero to `full_height`,
/// keeping the base anchored at `base_y`.
#[derive(Component, Clone, Copy)]
pub struct BarGrow {
    pub full_height: f32,
    pub base_y: f32,
    pub width: f32,
    pub x: f32,
}

/// Donut sweep target: the slice mesh is rebuilt each tick from zero sweep
/// up to `full_sweep`.
#[derive(Component, Clone, Copy)]
pub struct SliceSweep {
    pub center: Vec2,
    pub inner: f32,
    pub outer: f32,
    pub start_angle: f32,
    pub full_sweep: f32,
}

/// Point entry target: grows the point from zero to `full_size`.
#[derive(Component, Clone, Copy)]
pub struct PointFade {
    pub full_size: f32,
}

/// Text fade target: alpha 0 → `target_alpha`.
#[derive(Component, Clone, Copy)]
pub struct LabelFade {
    pub target_alpha: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_transitions_preserve_the_other_axis() {
        let mut view = EmbeddingViewState::new("Caste");
        assert_eq!(view.state, ModelState::Baseline);

        view.select_state(ModelState::Trained);
        assert_eq!(view.category, "Caste");
        assert_eq!(view.state, ModelState::Trained);

        view.select_category("Religion");
        assert_eq!(view.category, "Religion");
        assert_eq!(view.state, ModelState::Trained);

        // Any combination is reachable from any other in two steps.
        view.select_category("Gender");
        view.select_state(ModelState::Baseline);
        assert_eq!(view.category, "Gender");
        assert_eq!(view.state, ModelState::Baseline);
    }

    #[test]
    fn transition_progress_clamps_and_respects_delay() {
        let mut t = Transition::new(0.5).with_delay(1.0);
        assert_eq!(t.progress(), 0.0);
        t.elapsed = 1.0;
        assert_eq!(t.progress(), 0.0);
        t.elapsed = 1.5;
        assert_eq!(t.progress(), 1.0);
        assert!(t.finished());

        // Monotonic in between.
        let mut last = 0.0;
        for i in 0..=10 {
            t.elapsed = 1.0 + 0.05 * i as f32;
            let p = t.progress();
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn bar_hover_dims_the_bar_and_keeps_four_decimals() {
        let mut bar = BarHover {
            bias_type: "Gender".into(),
            loss: "NT-Xent".into(),
            model: "MuRIL".into(),
            value: 0.4,
            area: Rect::from_center_size(Vec2::ZERO, Vec2::ONE),
            hovered: false,
        };
        assert_eq!(bar.fill_alpha(), 1.0);

        bar.hovered = true;
        assert!(bar.fill_alpha() < 1.0);

        // Value renders with exactly four decimals.
        assert!(bar.tooltip_text().ends_with("0.4000"));
        bar.hovered = false;
        assert_eq!(bar.fill_alpha(), 1.0);
    }

    #[test]
    fn slice_hover_raises_opacity_to_full() {
        let mut slice = SliceHover {
            category: "Gender".into(),
            count: 853,
            percentage: 33.2,
            center: Vec2::ZERO,
            inner: 50.0,
            outer: 100.0,
            start_angle: 0.0,
            sweep: 1.0,
            hovered: false,
        };
        assert_eq!(slice.fill_alpha(), SLICE_ALPHA);

        slice.hovered = true;
        assert_eq!(slice.fill_alpha(), 1.0);
        assert!(slice.tooltip_text().contains("853 sentences (33.2%)"));
    }

    #[test]
    fn point_tooltip_header_is_colored_like_the_point() {
        let point = PointHover {
            kind: PointKind::Stereotype,
            text: "sample sentence".into(),
            center: Vec2::ZERO,
            radius: 5.0,
            hovered: false,
        };
        let (label, color) = point.header();
        assert_eq!(label, "Stereotype");
        assert_eq!(color, crate::core::Color::STEREOTYPE);
        assert_eq!(point.body(), "\"sample sentence\"");

        let anti = PointHover {
            kind: PointKind::AntiStereotype,
            ..point
        };
        assert_eq!(anti.header().1, crate::core::Color::ANTI_STEREOTYPE);
    }

    #[test]
    fn slice_hit_test_matches_angle_and_radius() {
        use std::f32::consts::FRAC_PI_2;
        let slice = SliceHover {
            category: "Gender".into(),
            count: 853,
            percentage: 33.2,
            center: Vec2::ZERO,
            inner: 50.0,
            outer: 100.0,
            start_angle: 0.0,
            sweep: FRAC_PI_2,
            hovered: false,
        };
        // 12 o'clock, mid-annulus: inside.
        assert!(slice.contains(Vec2::new(0.0, 75.0)));
        // Inside the hole.
        assert!(!slice.contains(Vec2::new(0.0, 25.0)));
        // Correct radius, wrong quadrant.
        assert!(!slice.contains(Vec2::new(-75.0, 0.0)));
        // Clockwise from 12 o'clock lands at 3 o'clock within the sweep.
        assert!(slice.contains(Vec2::new(75.0, 1.0)));
    }
}
