//! Scale/layout engine: data-domain to pixel-space mapping shared by all
//! three chart components. Each chart instantiates its own scales from its
//! own data on every redraw.

use crate::core::Color;

/// Smallest domain span a linear scale will accept. Keeps all-zero or
/// all-equal data from collapsing the chart to a degenerate scale.
pub const MIN_SPAN: f32 = 0.1;

/// `[min, max]` of a numeric series, ignoring non-finite entries.
pub fn extent(values: impl IntoIterator<Item = f32>) -> Option<(f32, f32)> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut any = false;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
        any = true;
    }
    any.then_some((min, max))
}

/// Calculate nice tick step for given range.
pub fn nice_step(range: f32, target_ticks: usize) -> f32 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let rough = range / target_ticks.max(1) as f32;
    let exp = rough.log10().floor();
    let base = 10f32.powf(exp);

    let normalized = rough / base;
    let nice = if normalized <= 1.5 {
        1.0
    } else if normalized <= 3.0 {
        2.0
    } else if normalized <= 7.0 {
        5.0
    } else {
        10.0
    };

    (nice * base).max(0.001)
}

/// Format tick value for display.
pub fn format_tick(val: f32) -> String {
    if val.abs() < 0.001 && val != 0.0 {
        format!("{:.1e}", val)
    } else if val.abs() >= 1000.0 {
        format!("{:.1e}", val)
    } else if val.fract().abs() < 0.001 {
        format!("{:.0}", val)
    } else if val.abs() < 1.0 {
        format!("{:.2}", val)
    } else {
        format!("{:.1}", val)
    }
}

/// Affine map from a numeric domain to a pixel range.
#[derive(Clone, Copy, Debug)]
pub struct LinearScale {
    pub domain: (f32, f32),
    pub range: (f32, f32),
}

impl LinearScale {
    /// Build a scale over `domain`, substituting a minimum span when the
    /// domain is degenerate (empty, reversed, or non-finite) so the mapping
    /// never divides by zero.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Self {
        let (mut min, mut max) = domain;
        if !min.is_finite() {
            min = 0.0;
        }
        if !max.is_finite() || max - min < MIN_SPAN {
            max = min + MIN_SPAN;
        }
        Self {
            domain: (min, max),
            range,
        }
    }

    /// Build from a data extent with a symmetric padding fraction per side.
    pub fn fit(extent: (f32, f32), padding: f32, range: (f32, f32)) -> Self {
        let pad = (extent.1 - extent.0) * padding;
        Self::new((extent.0 - pad, extent.1 + pad), range)
    }

    /// Extend the domain outward to nice tick multiples.
    pub fn nice(mut self, target_ticks: usize) -> Self {
        let step = nice_step(self.domain.1 - self.domain.0, target_ticks);
        self.domain.0 = (self.domain.0 / step).floor() * step;
        self.domain.1 = (self.domain.1 / step).ceil() * step;
        if self.domain.1 - self.domain.0 < MIN_SPAN {
            self.domain.1 = self.domain.0 + MIN_SPAN;
        }
        self
    }

    /// Map a domain value to pixel space.
    #[inline]
    pub fn px(&self, v: f32) -> f32 {
        let t = (v - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Tick positions at nice multiples inside the domain.
    pub fn ticks(&self, target_ticks: usize) -> Vec<f32> {
        let step = nice_step(self.domain.1 - self.domain.0, target_ticks);
        let start = (self.domain.0 / step).ceil() as i64;
        let end = (self.domain.1 / step).floor() as i64;
        (start..=end).map(|i| i as f32 * step).collect()
    }
}

/// Categorical-to-pixel band mapping with proportional inner/outer padding.
#[derive(Clone, Debug)]
pub struct BandScale {
    keys: Vec<String>,
    start: f32,
    step: f32,
    bandwidth: f32,
}

impl BandScale {
    pub fn new(keys: &[String], range: (f32, f32), padding: f32) -> Self {
        let n = keys.len();
        let span = range.1 - range.0;
        if n == 0 || span <= 0.0 {
            return Self {
                keys: keys.to_vec(),
                start: range.0,
                step: 0.0,
                bandwidth: 0.0,
            };
        }
        let padding = padding.clamp(0.0, 0.9);
        let step = span / (n as f32 + padding);
        Self {
            keys: keys.to_vec(),
            // Outer padding splits the leftover evenly around the bands.
            start: range.0 + step * padding,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `key`, if the key is in the domain.
    pub fn offset(&self, key: &str) -> Option<f32> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.start + i as f32 * self.step)
    }

    #[inline]
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Tableau-style palette used for bias categories in the bar chart.
pub const CATEGORY_PALETTE: [Color; 10] = [
    Color::rgb(0.306, 0.475, 0.655),
    Color::rgb(0.949, 0.557, 0.173),
    Color::rgb(0.882, 0.341, 0.349),
    Color::rgb(0.463, 0.718, 0.698),
    Color::rgb(0.349, 0.631, 0.310),
    Color::rgb(0.929, 0.788, 0.286),
    Color::rgb(0.686, 0.478, 0.631),
    Color::rgb(1.0, 0.616, 0.655),
    Color::rgb(0.612, 0.459, 0.373),
    Color::rgb(0.729, 0.690, 0.671),
];

/// Vibrant palette used for the donut slices (matches the study figures).
pub const DONUT_PALETTE: [Color; 5] = [
    Color::rgb(0.400, 0.494, 0.918), // #667eea
    Color::rgb(0.463, 0.294, 0.635), // #764ba2
    Color::rgb(0.961, 0.620, 0.043), // #f59e0b
    Color::rgb(0.063, 0.725, 0.506), // #10b981
    Color::rgb(0.937, 0.267, 0.267), // #ef4444
];

/// Deterministic ordinal color assignment over a fixed, ordered key domain.
/// The same key always receives the same color across renders.
#[derive(Clone, Debug)]
pub struct CategoryColors {
    domain: Vec<String>,
    palette: &'static [Color],
}

impl CategoryColors {
    pub fn new(domain: Vec<String>) -> Self {
        Self {
            domain,
            palette: &CATEGORY_PALETTE,
        }
    }

    pub fn vibrant(domain: Vec<String>) -> Self {
        Self {
            domain,
            palette: &DONUT_PALETTE,
        }
    }

    pub fn color(&self, key: &str) -> Color {
        match self.domain.iter().position(|k| k == key) {
            Some(i) => self.palette[i % self.palette.len()],
            None => Color::rgb(0.6, 0.6, 0.6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_domain_still_maps_to_finite_pixels() {
        // All-zero data: the floor keeps the scale usable.
        let scale = LinearScale::new((0.0, 0.0), (300.0, 0.0));
        assert!(scale.px(0.0).is_finite());
        assert!(scale.px(0.05).is_finite());
        assert!((scale.domain.1 - MIN_SPAN).abs() < 1e-6);

        // Negative max is clamped up as well.
        let scale = LinearScale::new((0.0, -2.0), (0.0, 100.0));
        assert!(scale.px(0.0).is_finite());
        assert!(scale.domain.1 > scale.domain.0);
    }

    #[test]
    fn linear_px_interpolates_and_inverts_range() {
        // Screen-space y grows downward, so ranges are often reversed.
        let scale = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert!((scale.px(0.0) - 200.0).abs() < 1e-4);
        assert!((scale.px(10.0) - 0.0).abs() < 1e-4);
        assert!((scale.px(5.0) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn fit_pads_the_extent_by_the_given_fraction() {
        let scale = LinearScale::fit((0.0, 10.0), 0.1, (0.0, 100.0));
        assert!((scale.domain.0 + 1.0).abs() < 1e-4);
        assert!((scale.domain.1 - 11.0).abs() < 1e-4);
    }

    #[test]
    fn nice_rounds_the_domain_outward() {
        let scale = LinearScale::new((0.13, 0.87), (0.0, 100.0)).nice(5);
        assert!(scale.domain.0 <= 0.13);
        assert!(scale.domain.1 >= 0.87);
        // Ticks fall inside the domain and are evenly spaced.
        let ticks = scale.ticks(5);
        assert!(ticks.len() >= 3);
        for w in ticks.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn extent_skips_non_finite_values() {
        let e = extent([1.0, f32::NAN, 3.0, f32::INFINITY, -2.0]).unwrap();
        assert_eq!(e, (-2.0, 3.0));
        assert!(extent([f32::NAN]).is_none());
        assert!(extent([]).is_none());
    }

    #[test]
    fn bands_are_contiguous_with_proportional_gaps() {
        let keys: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let scale = BandScale::new(&keys, (0.0, 300.0), 0.2);

        let a = scale.offset("a").unwrap();
        let b = scale.offset("b").unwrap();
        let c = scale.offset("c").unwrap();
        assert!(a < b && b < c);
        // Equal step between bands.
        assert!(((b - a) - (c - b)).abs() < 1e-4);
        // Gap is the padding share of the step.
        let gap = (b - a) - scale.bandwidth();
        assert!((gap / (b - a) - 0.2).abs() < 1e-4);
        // Everything stays inside the range.
        assert!(a >= 0.0 && c + scale.bandwidth() <= 300.0 + 1e-4);

        assert!(scale.offset("missing").is_none());
    }

    #[test]
    fn empty_band_domain_is_harmless() {
        let scale = BandScale::new(&[], (0.0, 100.0), 0.2);
        assert!(scale.is_empty());
        assert_eq!(scale.bandwidth(), 0.0);
        assert!(scale.offset("x").is_none());
    }

    #[test]
    fn ordinal_colors_are_stable_per_key() {
        let domain: Vec<String> = ["Gender", "Caste", "Religion"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let colors = CategoryColors::new(domain);
        assert_eq!(colors.color("Caste"), colors.color("Caste"));
        assert_ne!(colors.color("Gender"), colors.color("Caste"));
        // Unknown keys fall back to gray instead of panicking.
        let _ = colors.color("Unknown");
    }

    #[test]
    fn format_tick_picks_a_sensible_precision() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(12.0), "12");
    }
}
