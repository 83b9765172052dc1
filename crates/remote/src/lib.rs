pub mod client;
pub mod error;
pub mod protocol;
pub mod request;

pub use client::*;
pub use error::*;
pub use protocol::*;
pub use request::*;
