//! # Tally Register Library
//!
//! Core library for the Tally POS register: state, commands, and startup.
//! The binary in `main.rs` is a terminal front end over this crate.
//!
//! ## Module Organization
//! ```text
//! tally_register/
//! ├── lib.rs          ◄─── You are here (Register bundle & startup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── store.rs    ◄─── Document store wrapper
//! │   ├── session.rs  ◄─── Order session behind a mutex
//! │   ├── admin.rs    ◄─── Admin gate
//! │   ├── printer.rs  ◄─── Receipt pipeline
//! │   └── config.rs   ◄─── Runtime configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, OrderResponse
//! │   ├── auth.rs     ◄─── Login/logout, admin unlock
//! │   ├── order.rs    ◄─── Order building, submit, print
//! │   ├── catalog.rs  ◄─── Products and staff
//! │   ├── settings.rs ◄─── Shop settings
//! │   └── report.rs   ◄─── Sales report and history
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tally_store::{Store, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use state::{AdminGate, ConfigState, PrinterState, SessionState, StoreState};

/// Every piece of state the commands need.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register::open(config)                            │
/// │                                                                         │
/// │  1. Open Store ───────────────────────────────────────────────────────► │
/// │     • SQLite file at config.db_path, WAL mode                           │
/// │     • Per-document quota from config.store_quota_bytes                  │
/// │     • Run pending migrations                                            │
/// │                                                                         │
/// │  2. Build Printer ────────────────────────────────────────────────────► │
/// │     • SystemPrintSurface over spool/downloads dirs                      │
/// │     • Raster scale from config.render_scale                             │
/// │                                                                         │
/// │  3. Initialize State Objects ─────────────────────────────────────────► │
/// │     • SessionState: nobody logged in                                    │
/// │     • AdminGate: locked                                                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone)]
pub struct Register {
    pub store: StoreState,
    pub session: SessionState,
    pub admin: AdminGate,
    pub printer: PrinterState,
    pub config: ConfigState,
}

impl Register {
    /// Opens the database and builds the print pipeline.
    ///
    /// Opening the store is the only storage failure that reaches the caller.
    pub async fn open(config: ConfigState) -> Result<Self, ApiError> {
        info!(db_path = %config.db_path.display(), "Opening register");

        let store_config = StoreConfig::new(config.db_path.clone())
            .max_document_bytes(config.store_quota_bytes);
        let store = Store::new(store_config).await?;
        let printer = PrinterState::from_config(&config);

        info!(
            spool_dir = %config.spool_dir.display(),
            open_viewer = config.open_viewer,
            scale = printer.pipeline().scale(),
            "Register ready"
        );
        Ok(Register::new(store, printer, config))
    }

    pub fn new(store: Store, printer: PrinterState, config: ConfigState) -> Self {
        Register {
            store: StoreState::new(store),
            session: SessionState::new(),
            admin: AdminGate::new(),
            printer,
            config,
        }
    }

    /// Closes the connection pool. An unsubmitted order is dropped.
    pub async fn shutdown(&self) {
        let discarded = self.session.with_session_mut(|s| s.logout());
        if discarded > 0 {
            tracing::warn!(items = discarded, "Shutting down with unsubmitted items");
        }
        self.store.inner().close().await;
        info!("Register closed");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally=trace` - Show trace for tally crates only
/// - Default: `info,tally=debug,sqlx=warn`
///
/// Logs go to stderr so they don't mix with the terminal front end.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigState {
            db_path: dir.path().join("data").join("tally.db"),
            spool_dir: dir.path().join("spool"),
            downloads_dir: dir.path().join("downloads"),
            open_viewer: false,
            ..ConfigState::default()
        };

        let register = Register::open(config).await.unwrap();

        assert!(dir.path().join("data").join("tally.db").exists());
        assert_eq!(register.store.inner().catalog().products().await.len(), 4);
        register.shutdown().await;
    }
}
