pub mod engine;
pub mod set;

pub use engine::compute_ratios;
pub use set::{Ratio, RatioSet};
