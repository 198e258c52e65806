//! Research showcase demo: grouped bars, dataset donut and the embedding
//! explorer, laid out in a single window.
//!
//! Run with: cargo run --example showcase

use biasboard::core::{EmbeddingPoint, ModelState, PointKind};
use biasboard::showcase::showcase;
use glam::Vec2;

fn main() {
    let bars = [
        ("MuRIL", "Bare Model", 0.118, 0.102, 0.131, 0.117),
        ("MuRIL", "NT-Xent", 0.402, 0.371, 0.356, 0.376),
        ("MuRIL", "Triplet", 0.311, 0.294, 0.288, 0.298),
        ("mBERT", "Bare Model", 0.095, 0.088, 0.109, 0.097),
        ("mBERT", "NT-Xent", 0.334, 0.312, 0.301, 0.316),
        ("mBERT", "Triplet", 0.287, 0.255, 0.262, 0.268),
    ];

    let mut builder = showcase().columns(2);

    builder = builder.add_bars(|mut b| {
        b = b
            .title("Bias Mitigation by Loss Function")
            .description("Similarity delta after contrastive fine-tuning")
            .unit_label("Validation Δsim");
        for (model, loss, gender, caste, religion, overall) in bars {
            b = b
                .record(model, loss, "Gender", gender)
                .record(model, loss, "Caste", caste)
                .record(model, loss, "Religion", religion)
                .record(model, loss, "Overall", overall);
        }
        b
    });

    builder = builder.add_donut(|b| {
        b.title("Dataset Composition")
            .description("Annotated sentence pairs per bias category")
            .center_sublabel("Total Sentences")
    });

    builder = builder.add_embedding(|mut b| {
        b = b
            .title("Sentence Embedding Space")
            .description("2D projection of sentence embeddings")
            .x_label("Dimension 1")
            .y_label("Dimension 2");
        for category in ["Gender", "Caste", "Religion"] {
            for state in [ModelState::Baseline, ModelState::Trained] {
                b = b.group(category, state, synthetic_cloud(category, state));
            }
        }
        b
    });

    builder.run_local();
}

/// Deterministic stand-in for a real projection: baseline clouds overlap,
/// trained clouds separate by kind.
fn synthetic_cloud(category: &str, state: ModelState) -> Vec<EmbeddingPoint> {
    let seed = category.bytes().map(|b| b as f32).sum::<f32>();
    let separation = match state {
        ModelState::Baseline => 0.4,
        ModelState::Trained => 3.0,
    };

    (0..80)
        .map(|i| {
            let t = i as f32 * 0.7 + seed;
            let kind = if i % 2 == 0 {
                PointKind::Stereotype
            } else {
                PointKind::AntiStereotype
            };
            let offset = match kind {
                PointKind::Stereotype => separation,
                PointKind::AntiStereotype => -separation,
            };
            let center = Vec2::new(offset, offset * 0.5);
            let p = center + Vec2::new(t.sin(), (t * 1.3).cos()) * 2.0;
            EmbeddingPoint::new(p.x, p.y, kind, format!("{} sentence {}", category, i))
        })
        .collect()
}
