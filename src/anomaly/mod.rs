pub mod category;
pub mod normalizer;
pub mod severity;

pub use category::Category;
pub use normalizer::to_ten_scale;
pub use severity::{SeverityLevel, SeverityTier};
