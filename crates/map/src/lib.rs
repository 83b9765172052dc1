pub mod controller;
pub mod surface;
pub mod viewport;

pub use controller::*;
pub use surface::*;
pub use viewport::*;
