use bevy::prelude::*;

use crate::core::Showcase;
use crate::render::{ChartRenderPlugin, ShowcaseRes};

/// Window title for a showcase: the first chart's title, or the crate name
/// when the showcase is empty or untitled.
fn window_title(showcase: &Showcase) -> String {
    showcase
        .charts
        .first()
        .and_then(|c| c.meta().title.as_deref())
        .filter(|t| !t.is_empty())
        .map(|t| format!("{} | biasboard", t))
        .unwrap_or_else(|| "biasboard".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn run_showcase(showcase: Showcase) {
    let bg = showcase.background;
    let title = window_title(&showcase);
    App::new()
        .insert_resource(ClearColor(Color::srgb(bg.r, bg.g, bg.b)))
        .insert_resource(ShowcaseRes::new(showcase))
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
            ChartRenderPlugin,
        ))
        .run();
}

#[cfg(target_arch = "wasm32")]
pub fn run_showcase(showcase: Showcase, canvas_id: &str) {
    let bg = showcase.background;
    let title = window_title(&showcase);
    App::new()
        .insert_resource(ClearColor(Color::srgb(bg.r, bg.g, bg.b)))
        .insert_resource(ShowcaseRes::new(showcase))
        .add_plugins((
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title,
                        canvas: Some(format!("#{}", canvas_id)),
                        fit_canvas_to_parent: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
            ChartRenderPlugin,
        ))
        .run();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Chart, DonutChart};

    #[test]
    fn window_title_names_the_first_chart() {
        let mut showcase = Showcase::default();
        assert_eq!(window_title(&showcase), "biasboard");

        let mut donut = DonutChart::new();
        donut.meta.title = Some("Dataset Composition".to_string());
        showcase.charts.push(Chart::Donut(donut));
        assert_eq!(window_title(&showcase), "Dataset Composition | biasboard");
    }
}
