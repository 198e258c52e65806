pub mod bars;
pub mod common;
pub mod donut;
pub mod scatter;

pub use bars::draw_bar_chart;
pub use common::*;
pub use donut::{annulus_mesh, draw_donut_chart};
pub use scatter::draw_embedding_chart;
