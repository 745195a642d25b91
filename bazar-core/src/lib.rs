//! Bazar Core - Business logic for personal shopping list management
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (List, Item, User)
//! - **ports**: Trait definitions for external dependencies (ListStore, SessionProvider)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (DuckDB, remote HTTP backend)
//! - **workflow**: The multi-step list creation state machine

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;
pub mod workflow;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adapters::duckdb::DuckDbStore;
use adapters::local_auth::LocalSessionProvider;
use adapters::remote::{RemoteClient, RemoteListStore, RemoteSessionProvider};
use config::Config;
use ports::{ListStore, SessionProvider};
use services::{HistoryService, SessionService};


// Re-export commonly used types at crate root
pub use domain::result::{Error, Result, SessionError, StoreError};
pub use domain::{Item, List, Unit, User};
pub use workflow::{CreationWorkflow, Step};

/// Main context for Bazar operations
///
/// This is the primary entry point for all business logic. It wires the
/// configured adapters (local DuckDB or the remote backend) into the
/// services and exposes the operations the surfaces build on.
pub struct BazarContext {
    pub config: Config,
    pub bazar_dir: PathBuf,
    pub store: Arc<dyn ListStore>,
    pub session: SessionService,
    pub history: HistoryService,
}

impl BazarContext {
    /// Create a new Bazar context
    pub fn new(bazar_dir: &Path) -> Result<Self> {
        let config = Config::load(bazar_dir).map_err(|e| Error::Config(e.to_string()))?;

        let (store, provider): (Arc<dyn ListStore>, Arc<dyn SessionProvider>) =
            if config.is_local() {
                let db_path = bazar_dir.join("bazar.duckdb");
                let duckdb = Arc::new(DuckDbStore::new(&db_path)?);
                duckdb.ensure_schema()?;
                let provider = Arc::new(LocalSessionProvider::new(Arc::clone(&duckdb), bazar_dir));
                (duckdb, provider)
            } else {
                // is_local() is false only when remote settings exist
                let remote = config.remote.as_ref().ok_or_else(|| {
                    Error::Config("remote settings missing".to_string())
                })?;
                let client = Arc::new(RemoteClient::new(&remote.api_key, &remote.base_url)?);
                let store = Arc::new(RemoteListStore::new(Arc::clone(&client), bazar_dir));
                let provider = Arc::new(RemoteSessionProvider::new(client, bazar_dir));
                (store, provider)
            };

        let session = SessionService::new(provider)?;
        let history = HistoryService::new(Arc::clone(&store));

        Ok(Self {
            config,
            bazar_dir: bazar_dir.to_path_buf(),
            store,
            session,
            history,
        })
    }

    /// The signed-in user, or a not-signed-in error
    pub fn require_user(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| SessionError::NotSignedIn.into())
    }

    /// Start a list creation workflow dated from today
    pub fn new_workflow(&self) -> CreationWorkflow {
        CreationWorkflow::new(chrono::Local::now().date_naive())
    }

    /// Finalize a workflow draft and record the saved list in the
    /// history cache
    pub fn save_list(&self, workflow: &mut CreationWorkflow) -> Result<List> {
        let user = self.require_user()?;
        let list = workflow.finish(&user, self.store.as_ref())?;
        self.history.append(&list)?;
        Ok(list)
    }

    /// Fetch the signed-in user's lists into the history cache
    pub fn refresh_history(&self) -> Result<()> {
        let user = self.require_user()?;
        self.history.refresh(&user)
    }

    /// Delete every saved list for the signed-in user
    pub fn clear_history(&self) -> Result<()> {
        let user = self.require_user()?;
        self.history.clear_all(&user)
    }

    /// Sign out and drop the history cache
    pub fn sign_out(&self) -> Result<()> {
        self.session.sign_out()?;
        self.history.reset()
    }
}
