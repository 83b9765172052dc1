//! Page models. Each page owns its state, exposes user actions as methods and
//! is driven by awaiting `step` until it reports nothing left to do. URL
//! changes are handed back as [`Navigation`](crate::route::Navigation)s.

pub mod detail;
pub mod locate;
pub mod nearby;

pub use detail::*;
pub use locate::*;
pub use nearby::*;
