use crate::render::components::ChartId;
use bevy_math::Vec2;
use serde::{Deserialize, Serialize};

/// Reserved bias category that summarizes all others.
pub const OVERALL: &str = "Overall";

/// Loss key for the untrained reference model; always ordered first.
pub const BASELINE_LOSS: &str = "Bare Model";

/// Common metadata for all chart types
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChartMeta {
    /// Title displayed at the top of the chart
    pub title: Option<String>,
    /// Optional description displayed below the title
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Warm red used for stereotype points (#ef4444).
    pub const STEREOTYPE: Self = Self::rgb(0.937, 0.267, 0.267);
    /// Cool blue used for anti-stereotype points (#3b82f6).
    pub const ANTI_STEREOTYPE: Self = Self::rgb(0.231, 0.510, 0.965);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::linear_rgba(c.r, c.g, c.b, c.a)
    }
}

/* -------------------- GROUPED BAR CHART -------------------- */

/// One similarity-delta measurement for a (model, loss, bias category) cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub model: String,
    pub loss: String,
    pub bias_type: String,
    pub value: f32,
}

impl MetricRecord {
    pub fn new(
        model: impl Into<String>,
        loss: impl Into<String>,
        bias_type: impl Into<String>,
        value: f32,
    ) -> Self {
        Self {
            model: model.into(),
            loss: loss.into(),
            bias_type: bias_type.into(),
            value,
        }
    }
}

/// Facet toggle: one sub-chart per model, or a single averaged sub-chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetMode {
    #[default]
    PerModel,
    Averaged,
}

/// Category toggle: every bias category, or just the "Overall" summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryMode {
    #[default]
    AllCategories,
    OverallOnly,
}

/// One independently rendered sub-chart of the grouped bar component.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Facet {
    pub title: String,
    pub records: Vec<MetricRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarChart {
    pub id: ChartId,
    pub meta: ChartMeta,
    pub records: Vec<MetricRecord>,
    /// Y-axis unit label (e.g. "Validation Δsim")
    pub unit_label: Option<String>,
}

impl BarChart {
    pub fn new() -> Self {
        Self {
            id: ChartId::new(),
            meta: ChartMeta::default(),
            records: vec![],
            unit_label: None,
        }
    }

    /// Distinct loss keys with the baseline pinned first, rest lexicographic.
    pub fn loss_order(&self) -> Vec<String> {
        let mut losses: Vec<String> = vec![];
        for r in &self.records {
            if !losses.contains(&r.loss) {
                losses.push(r.loss.clone());
            }
        }
        losses.sort_by(|a, b| {
            if a == BASELINE_LOSS {
                std::cmp::Ordering::Less
            } else if b == BASELINE_LOSS {
                std::cmp::Ordering::Greater
            } else {
                a.cmp(b)
            }
        });
        losses
    }

    /// Full bias-category domain in first-appearance order. This is the color
    /// domain, so a category keeps its color regardless of the active filter.
    pub fn bias_types(&self) -> Vec<String> {
        let mut types: Vec<String> = vec![];
        for r in &self.records {
            if !types.contains(&r.bias_type) {
                types.push(r.bias_type.clone());
            }
        }
        types
    }

    /// Apply the category toggle. `OverallOnly` keeps only the reserved
    /// summary category; applying it twice yields the same set as once.
    pub fn filtered(&self, categories: CategoryMode) -> Vec<MetricRecord> {
        match categories {
            CategoryMode::AllCategories => self.records.clone(),
            CategoryMode::OverallOnly => self
                .records
                .iter()
                .filter(|r| r.bias_type == OVERALL)
                .cloned()
                .collect(),
        }
    }

    /// Bias categories present after filtering, in first-appearance order.
    /// A legend is drawn only when this has more than one entry.
    pub fn active_bias_types(records: &[MetricRecord]) -> Vec<String> {
        let mut types: Vec<String> = vec![];
        for r in records {
            if !types.contains(&r.bias_type) {
                types.push(r.bias_type.clone());
            }
        }
        types
    }

    /// Partition the filtered records into sub-charts. `PerModel` yields one
    /// facet per model in first-appearance order; `Averaged` collapses the
    /// models into a single facet holding the arithmetic mean of every
    /// (loss, bias category) pair.
    pub fn facets(&self, facet: FacetMode, categories: CategoryMode) -> Vec<Facet> {
        let filtered = self.filtered(categories);
        if filtered.is_empty() {
            return vec![];
        }

        match facet {
            FacetMode::PerModel => {
                let mut order: Vec<String> = vec![];
                for r in &filtered {
                    if !order.contains(&r.model) {
                        order.push(r.model.clone());
                    }
                }
                order
                    .into_iter()
                    .map(|model| Facet {
                        records: filtered
                            .iter()
                            .filter(|r| r.model == model)
                            .cloned()
                            .collect(),
                        title: model,
                    })
                    .collect()
            }
            FacetMode::Averaged => {
                let mut pairs: Vec<(String, String)> = vec![];
                let mut sums: Vec<(f32, usize)> = vec![];
                for r in &filtered {
                    let key = (r.loss.clone(), r.bias_type.clone());
                    match pairs.iter().position(|p| *p == key) {
                        Some(i) => {
                            sums[i].0 += r.value;
                            sums[i].1 += 1;
                        }
                        None => {
                            pairs.push(key);
                            sums.push((r.value, 1));
                        }
                    }
                }
                let records = pairs
                    .into_iter()
                    .zip(sums)
                    .map(|((loss, bias_type), (sum, n))| MetricRecord {
                        model: "Average".to_string(),
                        loss,
                        bias_type,
                        value: sum / n as f32,
                    })
                    .collect();
                vec![Facet {
                    title: "Average of All Models".to_string(),
                    records,
                }]
            }
        }
    }
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

/* -------------------- PROPORTION DONUT -------------------- */

/// One category of the dataset breakdown. `percentage` is stored alongside
/// `count` rather than derived from it, matching the published figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SliceRecord {
    pub category: String,
    pub count: u32,
    pub percentage: f32,
}

impl SliceRecord {
    pub fn new(category: impl Into<String>, count: u32, percentage: f32) -> Self {
        Self {
            category: category.into(),
            count,
            percentage,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DonutChart {
    pub id: ChartId,
    pub meta: ChartMeta,
    /// Slices in display order; never re-sorted by angle.
    pub slices: Vec<SliceRecord>,
    /// Sub-label under the center total (e.g. "Total Sentences")
    pub center_sublabel: Option<String>,
}

impl DonutChart {
    pub fn new() -> Self {
        Self {
            id: ChartId::new(),
            meta: ChartMeta::default(),
            slices: Self::default_slices(),
            center_sublabel: None,
        }
    }

    /// The dataset breakdown published with the study; used when no slices
    /// are injected.
    pub fn default_slices() -> Vec<SliceRecord> {
        vec![
            SliceRecord::new("Gender", 853, 33.2),
            SliceRecord::new("Socioeconomic", 504, 19.6),
            SliceRecord::new("Caste", 498, 19.3),
            SliceRecord::new("Religion", 422, 16.4),
            SliceRecord::new("Disability", 298, 11.6),
        ]
    }

    /// Grand total shown in the donut center.
    pub fn total(&self) -> u32 {
        self.slices.iter().map(|s| s.count).sum()
    }

    /// Absolute distance of the stored percentages from 100.
    pub fn percentage_drift(&self) -> f32 {
        (self.slices.iter().map(|s| s.percentage).sum::<f32>() - 100.0).abs()
    }
}

impl Default for DonutChart {
    fn default() -> Self {
        Self::new()
    }
}

/* -------------------- EMBEDDING EXPLORER -------------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Stereotype,
    AntiStereotype,
}

impl PointKind {
    pub fn label(&self) -> &'static str {
        match self {
            PointKind::Stereotype => "Stereotype",
            PointKind::AntiStereotype => "Anti-stereotype",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            PointKind::Stereotype => Color::STEREOTYPE,
            PointKind::AntiStereotype => Color::ANTI_STEREOTYPE,
        }
    }
}

/// Before/after contrastive training.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelState {
    #[default]
    Baseline,
    Trained,
}

impl ModelState {
    pub fn label(&self) -> &'static str {
        match self {
            ModelState::Baseline => "Baseline",
            ModelState::Trained => "Trained",
        }
    }
}

/// One projected sentence embedding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingPoint {
    pub x: f32,
    pub y: f32,
    pub kind: PointKind,
    pub text: String,
}

impl EmbeddingPoint {
    pub fn new(x: f32, y: f32, kind: PointKind, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            kind,
            text: text.into(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Point cloud for one (bias category, model state) selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingGroup {
    pub category: String,
    pub state: ModelState,
    pub points: Vec<EmbeddingPoint>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmbeddingChart {
    pub id: ChartId,
    pub meta: ChartMeta,
    /// Groups in insertion order; selector buttons follow this order.
    pub groups: Vec<EmbeddingGroup>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl EmbeddingChart {
    pub fn new() -> Self {
        Self {
            id: ChartId::new(),
            meta: ChartMeta::default(),
            groups: vec![],
            x_label: None,
            y_label: None,
        }
    }

    /// Distinct bias categories in insertion order.
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = vec![];
        for g in &self.groups {
            if !cats.contains(&g.category) {
                cats.push(g.category.clone());
            }
        }
        cats
    }

    /// Default selection target when the chart mounts.
    pub fn first_category(&self) -> Option<String> {
        self.groups.first().map(|g| g.category.clone())
    }

    /// Points for one selection. Unknown keys yield an empty slice so the
    /// caller renders a blank plot instead of failing.
    pub fn points_for(&self, category: &str, state: ModelState) -> &[EmbeddingPoint] {
        self.groups
            .iter()
            .find(|g| g.category == category && g.state == state)
            .map(|g| g.points.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for EmbeddingChart {
    fn default() -> Self {
        Self::new()
    }
}

/* -------------------- SHOWCASE -------------------- */

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Chart {
    Bars(BarChart),
    Donut(DonutChart),
    Embedding(EmbeddingChart),
}

impl Chart {
    pub fn id(&self) -> ChartId {
        match self {
            Chart::Bars(c) => c.id,
            Chart::Donut(c) => c.id,
            Chart::Embedding(c) => c.id,
        }
    }

    pub fn meta(&self) -> &ChartMeta {
        match self {
            Chart::Bars(c) => &c.meta,
            Chart::Donut(c) => &c.meta,
            Chart::Embedding(c) => &c.meta,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Showcase {
    pub background: Color,
    pub charts: Vec<Chart>,
    /// Number of columns per row (default: auto based on chart count)
    pub columns: Option<usize>,
}

impl Default for Showcase {
    fn default() -> Self {
        Self {
            background: Color::rgba(0.05, 0.05, 0.09, 1.0),
            charts: vec![],
            columns: None,
        }
    }
}

impl Showcase {
    /// Parse a showcase from its JSON wire form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|err| {
            error_stack::Report::new(crate::BiasboardError).attach_printable(err.to_string())
        })
    }

    /// Serialize the showcase to its JSON wire form.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|err| {
            error_stack::Report::new(crate::BiasboardError).attach_printable(err.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn study_records() -> Vec<MetricRecord> {
        vec![
            MetricRecord::new("MuRIL", "NT-Xent", "Gender", 0.40),
            MetricRecord::new("MuRIL", "NT-Xent", "Overall", 0.42),
            MetricRecord::new("MuRIL", "Bare Model", "Gender", 0.10),
            MetricRecord::new("MuRIL", "Bare Model", "Overall", 0.12),
            MetricRecord::new("mBERT", "NT-Xent", "Gender", 0.20),
            MetricRecord::new("mBERT", "NT-Xent", "Overall", 0.30),
            MetricRecord::new("mBERT", "Bare Model", "Gender", 0.30),
            MetricRecord::new("mBERT", "Bare Model", "Overall", 0.20),
        ]
    }

    #[test]
    fn baseline_loss_is_pinned_first() {
        let mut chart = BarChart::new();
        chart.records = study_records();
        let order = chart.loss_order();
        assert_eq!(order[0], BASELINE_LOSS);
        assert_eq!(order[1], "NT-Xent");

        // Holds regardless of input position.
        chart.records.reverse();
        assert_eq!(chart.loss_order()[0], BASELINE_LOSS);
    }

    #[test]
    fn overall_filter_is_idempotent() {
        let mut chart = BarChart::new();
        chart.records = study_records();
        let once = chart.filtered(CategoryMode::OverallOnly);
        assert!(once.iter().all(|r| r.bias_type == OVERALL));

        let mut again = BarChart::new();
        again.records = once.clone();
        assert_eq!(again.filtered(CategoryMode::OverallOnly), once);
    }

    #[test]
    fn averaged_facet_takes_the_mean_across_models() {
        let mut chart = BarChart::new();
        chart.records = study_records();
        let facets = chart.facets(FacetMode::Averaged, CategoryMode::AllCategories);
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].title, "Average of All Models");

        let avg = |loss: &str, bias: &str| {
            facets[0]
                .records
                .iter()
                .find(|r| r.loss == loss && r.bias_type == bias)
                .map(|r| r.value)
                .unwrap()
        };
        assert!((avg("NT-Xent", "Gender") - 0.30).abs() < 1e-6);
        assert!((avg("NT-Xent", "Overall") - 0.36).abs() < 1e-6);
        assert!((avg("Bare Model", "Gender") - 0.20).abs() < 1e-6);
        assert!(facets[0].records.iter().all(|r| r.model == "Average"));
    }

    #[test]
    fn per_model_facets_follow_first_appearance_order() {
        let mut chart = BarChart::new();
        chart.records = study_records();
        let facets = chart.facets(FacetMode::PerModel, CategoryMode::AllCategories);
        assert_eq!(facets.len(), 2);
        assert_eq!(facets[0].title, "MuRIL");
        assert_eq!(facets[1].title, "mBERT");
        assert_eq!(facets[0].records.len(), 4);
    }

    #[test]
    fn empty_filter_result_yields_no_facets() {
        let mut chart = BarChart::new();
        chart.records = vec![MetricRecord::new("MuRIL", "NT-Xent", "Gender", 0.4)];
        assert!(
            chart
                .facets(FacetMode::PerModel, CategoryMode::OverallOnly)
                .is_empty()
        );
    }

    #[test]
    fn summary_only_view_has_a_single_active_category() {
        // Two losses, one category: two bars, no legend expected.
        let mut chart = BarChart::new();
        chart.records = vec![
            MetricRecord::new("MuRIL", "Bare Model", "Overall", 0.0),
            MetricRecord::new("MuRIL", "NT-Xent", "Overall", 0.42),
        ];
        let filtered = chart.filtered(CategoryMode::OverallOnly);
        assert_eq!(filtered.len(), 2);
        assert_eq!(BarChart::active_bias_types(&filtered).len(), 1);
        assert_eq!(chart.loss_order()[0], BASELINE_LOSS);
    }

    #[test]
    fn default_donut_matches_the_published_breakdown() {
        let donut = DonutChart::new();
        assert_eq!(donut.slices.len(), 5);
        assert_eq!(donut.total(), 2575);
        assert!(donut.percentage_drift() < 0.5);
        // Insertion order is display order.
        assert_eq!(donut.slices[0].category, "Gender");
        assert_eq!(donut.slices[4].category, "Disability");
    }

    #[test]
    fn embedding_lookup_covers_every_group_and_tolerates_unknown_keys() {
        let mut chart = EmbeddingChart::new();
        for (cat, state, n) in [
            ("Caste", ModelState::Baseline, 3),
            ("Caste", ModelState::Trained, 3),
            ("Gender", ModelState::Baseline, 2),
        ] {
            chart.groups.push(EmbeddingGroup {
                category: cat.to_string(),
                state,
                points: (0..n)
                    .map(|i| {
                        EmbeddingPoint::new(i as f32, -(i as f32), PointKind::Stereotype, "s")
                    })
                    .collect(),
            });
        }

        assert_eq!(chart.categories(), vec!["Caste", "Gender"]);
        assert_eq!(chart.first_category().as_deref(), Some("Caste"));
        for g in &chart.groups {
            assert_eq!(chart.points_for(&g.category, g.state).len(), g.points.len());
        }
        assert!(chart.points_for("Religion", ModelState::Baseline).is_empty());
        assert!(chart.points_for("Gender", ModelState::Trained).is_empty());
    }

    #[test]
    fn showcase_json_helpers_round_trip_and_reject_garbage() {
        let mut showcase = Showcase::default();
        showcase.charts.push(Chart::Donut(DonutChart::new()));
        showcase.columns = Some(2);

        let json = showcase.to_json().unwrap();
        let back = Showcase::from_json(&json).unwrap();
        assert_eq!(back.charts.len(), 1);
        assert_eq!(back.columns, Some(2));

        assert!(Showcase::from_json("not json").is_err());
    }
}
