pub mod geodesy;
pub mod solar;

pub use geodesy::*;
pub use solar::*;
