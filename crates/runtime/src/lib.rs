pub mod debounce;
pub mod event_bus;
pub mod keyed;
pub mod keyed_task;

pub use debounce::*;
pub use event_bus::*;
pub use keyed::*;
pub use keyed_task::*;
