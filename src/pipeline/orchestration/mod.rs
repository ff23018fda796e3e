pub mod analyzer;
pub mod lockout;

pub use analyzer::{BodyAnalyzer, BodyAnalyzerBuilder};
pub use lockout::LockoutState;
