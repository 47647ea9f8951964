use anyhow::{Result, bail};
use std::{env, fs, path::PathBuf, str::FromStr};

const DATA_DIR_NAME: &str = ".memodeck";
const DB_FILE_NAME: &str = "memodeck.db";
const LOG_FILE_NAME: &str = "memodeck.log";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum BackendKind {
    Sqlite,
    Supabase,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "local" => Ok(BackendKind::Sqlite),
            "supabase" | "postgrest" | "remote" => Ok(BackendKind::Supabase),
            other => bail!("unknown backend `{other}` (expected `sqlite` or `supabase`)"),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct SupabaseConfig {
    pub(crate) url: String,
    pub(crate) anon_key: String,
}

#[derive(Clone, Debug)]
pub(crate) struct Config {
    pub(crate) backend: BackendKind,
    pub(crate) supabase: Option<SupabaseConfig>,
    pub(crate) data_dir: PathBuf,
}

impl Config {
    pub(crate) fn from_env(backend_override: Option<BackendKind>) -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), backend_override)
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        backend_override: Option<BackendKind>,
    ) -> Result<Self> {
        let supabase = match (lookup("SUPABASE_URL"), lookup("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) if !url.trim().is_empty() => Some(SupabaseConfig {
                url: url.trim().to_string(),
                anon_key,
            }),
            (Some(url), None) if !url.trim().is_empty() => {
                bail!("SUPABASE_URL is set but SUPABASE_ANON_KEY is missing")
            }
            _ => None,
        };

        let backend = match backend_override {
            Some(kind) => kind,
            None => match lookup("MEMODECK_BACKEND") {
                Some(value) => value.parse()?,
                None if supabase.is_some() => BackendKind::Supabase,
                None => BackendKind::Sqlite,
            },
        };
        if backend == BackendKind::Supabase && supabase.is_none() {
            bail!("the supabase backend needs SUPABASE_URL and SUPABASE_ANON_KEY");
        }

        let data_dir = match lookup("MEMODECK_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => {
                let home = lookup("HOME").unwrap_or_else(|| ".".to_string());
                PathBuf::from(home).join(DATA_DIR_NAME)
            }
        };

        Ok(Self {
            backend,
            supabase,
            data_dir,
        })
    }

    pub(crate) fn ensure_data_dir(&self) -> Result<&PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(&self.data_dir)
    }

    pub(crate) fn db_path(&self) -> Result<PathBuf> {
        Ok(self.ensure_data_dir()?.join(DB_FILE_NAME))
    }

    pub(crate) fn log_path(&self) -> Result<PathBuf> {
        Ok(self.ensure_data_dir()?.join(LOG_FILE_NAME))
    }
}
