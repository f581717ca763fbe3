//! GUI module - User interface components

mod app;
mod dashboard;
mod widgets;

pub use app::DashboardApp;
