//! Business logic services for the vertical-lift engine

pub mod location;
pub mod station;

pub use location::LocationService;
pub use station::StationService;
