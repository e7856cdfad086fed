//! Browse GPS readings reported by an IoT tracker: recent readings, the days that have data and
//! the route travelled on each day, with distance and duration derived from the track.
pub mod cli;
pub mod config;
pub mod dashboard;
mod error;
pub mod gps;
pub mod map;
pub mod metrics;
pub mod reading;
pub mod services;

pub use dashboard::Dashboard;
pub use error::{user_message, Error};
pub use gps::{distance, Location};
pub use reading::{derive_days, track_for_day, Reading};
