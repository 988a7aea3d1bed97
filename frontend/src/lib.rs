//! Client core of the fleet management console.
//!
//! A single store holds every domain slice, sync hooks keep the entity slices
//! in step with the GraphQL backend, and the race clock interpolates the
//! timer overlay between authoritative updates.

pub mod api;
pub mod app;
pub mod dataflow;
pub mod logging;
pub mod race_clock;
pub mod slices;
pub mod store;

pub use app::FleetApp;
pub use slices::{FleetState, FleetStore};
pub use store::{ActionKey, Store, Subscription};
