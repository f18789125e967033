//! Shared core for the plant selection screen of the Sprout gardening app.
//!
//! The core is headless: it owns all screen state (tag list, paged plant
//! collection, filtered view, loading flags) and expresses network access as
//! HTTP effects that the host shell resolves. Shells drive it with [`Event`]s
//! and render [`app::ViewModel`]s.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod error;
pub mod event;
pub mod model;

pub use app::{App, EnvironmentChip, ErrorNotice, PlantCard, ViewModel};
pub use capabilities::{Capabilities, Effect};
pub use error::FetchError;
pub use event::Event;
pub use model::{Environment, Model, PendingFetch, Plant, WaterFrequency};

/// Plants per pagination request.
pub const PAGE_SIZE: u32 = 8;

/// Page numbering starts at one; the counter only ever moves forward within
/// a session.
pub const FIRST_PAGE: u32 = 1;

/// Fraction of the viewport at which the shell's list widget should fire
/// [`Event::EndReached`].
pub const END_REACHED_THRESHOLD: f64 = 0.1;

/// Sentinel tag meaning "no filter". Synthesized locally, never served by
/// the backend.
pub const ALL_ENVIRONMENTS_KEY: &str = "all";

/// json-server default used by the development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:3333";
