use crate::{
    config::RuntimeConfiguration,
    error::{OpenDatabaseSnafu, RecordResult},
    store::{StudentStore, memory::MemoryStudentStore, postgres::PgStudentStore},
};
use snafu::ResultExt;
use sqlx::postgres::PgPoolOptions;
use std::{ops::Deref, sync::Arc};

pub const MEMORY_DB_PATH: &str = "memory://";

#[derive(Clone)]
pub struct RecordState {
    store: Arc<dyn StudentStore>,
    pg: Option<PgStudentStore>,
}

impl RecordState {
    /// Opens the Postgres pool lazily and tries the migrations. An unreachable database is
    /// logged, not fatal: requests fail with store errors until it comes back, and the first
    /// one after that runs the migrations.
    ///
    /// [`MEMORY_DB_PATH`] selects a process-local store instead.
    pub async fn new(options: PgPoolOptions, config: &RuntimeConfiguration) -> RecordResult<Self> {
        let db_config = config.db_config();
        if db_config.get_db_path() == MEMORY_DB_PATH {
            warn!("Using in-memory store, records will not survive a restart");
            return Ok(Self::with_store(MemoryStudentStore::new()));
        }

        let pool = options
            .connect_lazy(db_config.get_db_path())
            .context(OpenDatabaseSnafu)?;
        let pg = PgStudentStore::new(pool);

        match pg.migrate().await {
            Ok(()) => info!("Connected to database"),
            Err(e) => error!(?e, "Database connection error, will retry on first request"),
        }

        Ok(Self {
            store: Arc::new(pg.clone()),
            pg: Some(pg),
        })
    }

    pub fn with_store(store: impl StudentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            pg: None,
        }
    }

    pub async fn sensible_shutdown(&self) {
        if let Some(pg) = &self.pg {
            pg.close().await;
        }
    }
}

impl Deref for RecordState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}
