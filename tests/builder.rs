//! Integration tests for the public builder API and the serialized model.

use biasboard::core::{
    CategoryMode, Chart, Color, EmbeddingPoint, FacetMode, ModelState, PointKind, Showcase,
};
use biasboard::showcase::showcase;

#[test]
fn builder_assembles_all_three_chart_types() {
    let built = showcase()
        .background_color(Color::rgb(0.02, 0.02, 0.05))
        .columns(2)
        .add_bars(|b| {
            b.title("Bias Mitigation")
                .unit_label("Validation Δsim")
                .record("MuRIL", "Bare Model", "Overall", 0.12)
                .record("MuRIL", "NT-Xent", "Overall", 0.40)
        })
        .add_donut(|b| b.center_sublabel("Total Sentences"))
        .add_embedding(|b| {
            b.x_label("Dimension 1").group(
                "Gender",
                ModelState::Baseline,
                vec![EmbeddingPoint::new(0.0, 1.0, PointKind::Stereotype, "s")],
            )
        })
        .build();

    assert_eq!(built.charts.len(), 3);
    assert_eq!(built.columns, Some(2));

    let Chart::Bars(bars) = &built.charts[0] else {
        panic!("expected a bar chart first");
    };
    assert_eq!(bars.records.len(), 2);
    assert_eq!(bars.unit_label.as_deref(), Some("Validation Δsim"));
    assert_eq!(
        bars.facets(FacetMode::PerModel, CategoryMode::AllCategories)
            .len(),
        1
    );

    let Chart::Donut(donut) = &built.charts[1] else {
        panic!("expected a donut second");
    };
    // No slices injected: the published dataset breakdown is used.
    assert_eq!(donut.total(), 2575);
    assert_eq!(donut.center_sublabel.as_deref(), Some("Total Sentences"));

    let Chart::Embedding(embedding) = &built.charts[2] else {
        panic!("expected an embedding chart third");
    };
    assert_eq!(embedding.first_category().as_deref(), Some("Gender"));
}

#[test]
fn injected_slices_replace_the_default_breakdown() {
    let built = showcase()
        .add_donut(|b| b.slice("A", 10, 25.0).slice("B", 30, 75.0))
        .build();

    let Chart::Donut(donut) = &built.charts[0] else {
        panic!("expected a donut");
    };
    assert_eq!(donut.slices.len(), 2);
    assert_eq!(donut.total(), 40);
    assert!(donut.percentage_drift() < 0.5);
}

#[test]
fn chart_ids_are_unique_within_a_showcase() {
    let built = showcase()
        .add_bars(|b| b.record("m", "l", "t", 1.0))
        .add_bars(|b| b.record("m", "l", "t", 2.0))
        .add_donut(|b| b)
        .build();

    let mut ids: Vec<u64> = built.charts.iter().map(|c| c.id().0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), built.charts.len());
}

#[test]
fn showcase_round_trips_through_json() {
    let built = showcase()
        .add_bars(|b| b.title("t").record("MuRIL", "NT-Xent", "Gender", 0.4))
        .add_embedding(|b| {
            b.group(
                "Caste",
                ModelState::Trained,
                vec![EmbeddingPoint::new(
                    1.5,
                    -2.0,
                    PointKind::AntiStereotype,
                    "sample",
                )],
            )
        })
        .build();

    let json = serde_json::to_string(&built).unwrap();
    let parsed: Showcase = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.charts.len(), 2);
    let Chart::Embedding(embedding) = &parsed.charts[1] else {
        panic!("expected an embedding chart");
    };
    let points = embedding.points_for("Caste", ModelState::Trained);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].kind, PointKind::AntiStereotype);
    assert_eq!(points[0].text, "sample");
}
