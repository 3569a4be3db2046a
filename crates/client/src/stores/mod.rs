//! Client-side state stores.
//!
//! Each store exclusively owns its slice of state and is constructed with
//! its own [`ApiGateway`](crate::ApiGateway) handle. Mutation methods take
//! `&mut self`: the UI event loop is single-threaded and interleaves only
//! at `await` points, so sequential calls from the same screen are ordered
//! by call order.
//!
//! Mutation policies (one per mutation type, see DESIGN.md):
//! - *Confirmed* (gateway first, apply server-acked state): login,
//!   checkout, profile updates, address/payment add/edit/remove, order
//!   cancellation, ratings, comments.
//! - *Optimistic with rollback*: default-entity flips, recipe like/save.

mod auth;
mod cart;
mod orders;
mod profile;
mod recipe;
mod restaurant;
mod status_source;

pub use auth::{AuthError, AuthStore};
pub use cart::{CartError, CartStore};
pub use orders::{OrderError, OrderStore};
pub use profile::{ProfileError, ProfileStore};
pub use recipe::{RecipeError, RecipeStore};
pub use restaurant::{RestaurantStore, SearchTicket};
pub use status_source::{PollingStatusSource, SimulatedStatusSource, StatusSource};
