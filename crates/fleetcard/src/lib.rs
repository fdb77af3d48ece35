//! fleetcard: fleetcar の HTTP デーモン

pub mod api;
pub mod app;

pub use app::{StartupOptions, bootstrap_fleet, build};
