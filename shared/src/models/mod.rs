//! Domain models for the vertical-lift operations platform

mod location;
mod move_line;
mod station;
mod stock;
mod tray;

pub use location::*;
pub use move_line::*;
pub use station::*;
pub use stock::*;
pub use tray::*;
