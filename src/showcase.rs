use crate::core::{
    BarChart, Chart, Color, DonutChart, EmbeddingChart, EmbeddingGroup, EmbeddingPoint,
    MetricRecord, ModelState, Showcase, SliceRecord,
};

pub fn showcase() -> ShowcaseBuilder {
    ShowcaseBuilder {
        showcase: Showcase::default(),
    }
}

pub struct ShowcaseBuilder {
    showcase: Showcase,
}

impl ShowcaseBuilder {
    pub fn background_color(mut self, c: Color) -> Self {
        self.showcase.background = c;
        self
    }

    /// Set the number of columns per row (default: auto based on chart count)
    pub fn columns(mut self, cols: usize) -> Self {
        self.showcase.columns = Some(cols.max(1));
        self
    }

    pub fn add_bars<F>(mut self, f: F) -> Self
    where
        F: FnOnce(BarsBuilder) -> BarsBuilder,
    {
        let b = f(BarsBuilder::new());
        self.showcase.charts.push(Chart::Bars(b.chart));
        self
    }

    pub fn add_donut<F>(mut self, f: F) -> Self
    where
        F: FnOnce(DonutBuilder) -> DonutBuilder,
    {
        let b = f(DonutBuilder::new());
        self.showcase.charts.push(Chart::Donut(b.chart));
        self
    }

    pub fn add_embedding<F>(mut self, f: F) -> Self
    where
        F: FnOnce(EmbeddingBuilder) -> EmbeddingBuilder,
    {
        let b = f(EmbeddingBuilder::new());
        self.showcase.charts.push(Chart::Embedding(b.chart));
        self
    }

    /// Get the built Showcase without running it
    pub fn build(self) -> Showcase {
        self.showcase
    }

    /// Run the showcase locally using Bevy (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_local(self) {
        crate::runtime::run_showcase(self.showcase);
    }
}

/* -------------------- BARS BUILDER -------------------- */

pub struct BarsBuilder {
    chart: BarChart,
}

impl BarsBuilder {
    fn new() -> Self {
        Self {
            chart: BarChart::new(),
        }
    }

    /// Add one (model, loss, bias category) measurement.
    pub fn record(
        mut self,
        model: impl Into<String>,
        loss: impl Into<String>,
        bias_type: impl Into<String>,
        value: f32,
    ) -> Self {
        self.chart
            .records
            .push(MetricRecord::new(model, loss, bias_type, value));
        self
    }

    pub fn records(mut self, records: Vec<MetricRecord>) -> Self {
        self.chart.records = records;
        self
    }

    /// Set the Y-axis unit label
    pub fn unit_label(mut self, label: impl Into<String>) -> Self {
        self.chart.unit_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.chart.meta.title = Some(title.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.chart.meta.description = Some(desc.into());
        self
    }
}

/* -------------------- DONUT BUILDER -------------------- */

pub struct DonutBuilder {
    chart: DonutChart,
    injected: bool,
}

impl DonutBuilder {
    fn new() -> Self {
        // Carries the published dataset breakdown until slices are injected.
        Self {
            chart: DonutChart::new(),
            injected: false,
        }
    }

    pub fn slice(mut self, category: impl Into<String>, count: u32, percentage: f32) -> Self {
        if !self.injected {
            self.chart.slices.clear();
            self.injected = true;
        }
        self.chart
            .slices
            .push(SliceRecord::new(category, count, percentage));
        self
    }

    pub fn slices(mut self, slices: Vec<SliceRecord>) -> Self {
        self.chart.slices = slices;
        self.injected = true;
        self
    }

    /// Set the sub-label under the center total
    pub fn center_sublabel(mut self, label: impl Into<String>) -> Self {
        self.chart.center_sublabel = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.chart.meta.title = Some(title.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.chart.meta.description = Some(desc.into());
        self
    }
}

/* -------------------- EMBEDDING BUILDER -------------------- */

pub struct EmbeddingBuilder {
    chart: EmbeddingChart,
}

impl EmbeddingBuilder {
    fn new() -> Self {
        Self {
            chart: EmbeddingChart::new(),
        }
    }

    /// Add the point cloud for one (bias category, model state) selection.
    pub fn group(
        mut self,
        category: impl Into<String>,
        state: ModelState,
        points: Vec<EmbeddingPoint>,
    ) -> Self {
        self.chart.groups.push(EmbeddingGroup {
            category: category.into(),
            state,
            points,
        });
        self
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.chart.x_label = Some(label.into());
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.chart.y_label = Some(label.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.chart.meta.title = Some(title.into());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.chart.meta.description = Some(desc.into());
        self
    }
}
