pub mod core;
pub mod render;
pub mod runtime;
pub mod scale;
pub mod showcase;
pub mod wasm_api;

use std::fmt;

#[derive(Debug)]
pub struct BiasboardError;

impl fmt::Display for BiasboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BiasboardError")
    }
}

impl std::error::Error for BiasboardError {}

pub type Result<T> = std::result::Result<T, error_stack::Report<BiasboardError>>;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

pub mod prelude {
    pub use crate::core::*;
    pub use crate::render::*;
    pub use crate::runtime::*;
    pub use crate::scale::*;
    pub use crate::showcase::*;
}
