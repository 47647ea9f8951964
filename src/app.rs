use anyhow::{Context, Result};
use tracing::info;

use crate::{
    config::{BackendKind, Config},
    store::{MemoBackend, MemoStore, PostgrestBackend, SqliteBackend},
};

pub(crate) struct AppContext {
    store: MemoStore,
}

impl AppContext {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let backend = open_backend(config)?;
        Ok(Self::with_store(MemoStore::new(backend)))
    }

    pub(crate) fn with_store(store: MemoStore) -> Self {
        Self { store }
    }

    pub(crate) fn store(&self) -> &MemoStore {
        &self.store
    }
}

fn open_backend(config: &Config) -> Result<Box<dyn MemoBackend>> {
    match (config.backend, &config.supabase) {
        (BackendKind::Supabase, Some(supabase)) => {
            info!(url = %supabase.url, "using hosted memos table");
            Ok(Box::new(PostgrestBackend::new(
                &supabase.url,
                &supabase.anon_key,
            )))
        }
        (BackendKind::Supabase, None) => {
            anyhow::bail!("the supabase backend needs SUPABASE_URL and SUPABASE_ANON_KEY")
        }
        (BackendKind::Sqlite, _) => {
            let path = config.db_path()?;
            info!(path = %path.display(), "using local memos table");
            let backend = SqliteBackend::open(&path)
                .with_context(|| format!("failed to open memo database at {}", path.display()))?;
            Ok(Box::new(backend))
        }
    }
}
