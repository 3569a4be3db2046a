//! Domain type definitions.

pub mod id;
pub mod money;
pub mod status;

pub use id::*;
pub use money::*;
pub use status::*;
