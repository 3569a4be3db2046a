//! Client-side entity types.
//!
//! These mirror, but are not identical to, the backend shapes: the gateway
//! adapts wire payloads into these at the boundary and the stores own them
//! from there.

mod order;
mod profile;
mod recipe;
mod restaurant;
mod user;

pub use order::*;
pub use profile::*;
pub use recipe::*;
pub use restaurant::*;
pub use user::*;
