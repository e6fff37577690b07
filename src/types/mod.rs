//! Type definitions for warstatus

mod endpoint;
mod error;
mod snapshot;
mod war;

pub use endpoint::Endpoint;
pub use error::*;
pub use snapshot::*;
pub use war::*;
