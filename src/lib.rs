pub mod api; // REST client, auth, meetings, payments
pub mod config;
pub mod dashboard; // Role home screens
pub mod error;
pub mod inflight;
pub mod interaction; // Notifications, confirm dialogs, external links
pub mod models;
pub mod session;
pub mod table; // Generic CRUD tables
pub mod workflow; // Appointment lifecycle + payment initiation

#[cfg(test)]
pub(crate) mod test_support;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::Session;

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter. Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} client v{}", config::APP_NAME, config::APP_VERSION);
    }
}
