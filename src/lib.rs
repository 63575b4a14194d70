//! Interaction and physics engine for the Plankster mascot.
//!
//! Everything here is pure simulation: the caller feeds in pointer events,
//! user actions and frame times, and gets back [`session::RenderFrame`] and
//! [`session::StatusUpdate`] values to display however it likes.

pub mod animation;
pub mod command;
pub mod config;
pub mod error;
pub mod feedback;
pub mod math;
pub mod mood;
pub mod physics;
pub mod picking;
pub mod session;
pub mod throw;
pub mod wander;

pub use error::MascotError;
pub use session::{MascotSession, RenderFrame, StatusUpdate};
