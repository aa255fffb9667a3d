//! Vertical-lift operator workflow engine
//!
//! Task selection and tray geometry services for operator stations,
//! layered over an external stock store. Persistence, transactions, and
//! UI rendering all belong to the host platform; this crate only decides
//! what the next unit of work is and what the tray grid looks like.

pub mod config;
pub mod error;
pub mod services;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Initialize tracing for binaries and tests
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vertical_lift_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
