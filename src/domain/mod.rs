pub mod forecast;
pub mod transformer;

pub use forecast::*;
pub use transformer::*;
