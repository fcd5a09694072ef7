pub mod backup;
pub mod clock;
pub mod db;
pub mod editor;
pub mod exams;
pub mod ipc;
pub mod settings;
pub mod settings_commands;
pub mod utils;
pub mod views;

use std::{fs, io, path::Path, sync::Arc};

use anyhow::{Context, Result};
use clock::{Clock, SystemClock};
use db::{DocumentStore, ExamRepository, JsonFileStore, SqliteStore};
use settings::{data_dir, SettingsStore, StorageBackend};

const ENABLE_LOGS: bool = true;

const SQLITE_FILE: &str = "examtrack.sqlite3";

pub struct AppState {
    pub exams: ExamRepository,
    pub settings: SettingsStore,
}

impl AppState {
    /// Open settings and the configured store under `dir`, seeding sample
    /// records on first use when enabled.
    pub fn open(dir: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        let settings = SettingsStore::in_dir(dir)?;
        let config = settings.get()?;

        let store: Arc<dyn DocumentStore> = match config.storage {
            StorageBackend::File => Arc::new(JsonFileStore::new(dir)?),
            StorageBackend::Sqlite => Arc::new(SqliteStore::open(dir.join(SQLITE_FILE))?),
        };
        let exams = ExamRepository::new(store, clock);

        if config.seed_sample_data && exams.init_sample_data()? {
            log_info!("Seeded sample data in {}", dir.display());
        }

        Ok(Self { exams, settings })
    }
}

pub fn run() {
    utils::init_logging();

    log::info!("examtrack starting up...");

    let result = (|| -> Result<()> {
        let dir = data_dir();
        let state = AppState::open(&dir, Arc::new(SystemClock))?;
        log_info!("Serving requests (data directory {})", dir.display());
        ipc::serve(&state, io::stdin().lock(), io::stdout().lock())
    })();

    if let Err(err) = result {
        log_error!("examtrack stopped: {err:#}");
        std::process::exit(1);
    }
}
