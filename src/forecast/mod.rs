pub mod cursor;
pub mod engine;
pub mod features;
pub mod risk;
pub mod weather;

pub use cursor::*;
pub use engine::*;
pub use features::{LoadFeatures, FEATURE_COUNT, FEATURE_NAMES};
pub use risk::*;
pub use weather::*;
