//! Client-side drawing models: status symbology, sun overlay, timeline.

pub mod sun;
pub mod symbology;
pub mod timeline;

pub use sun::*;
pub use symbology::*;
pub use timeline::*;
