use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};
use once_cell::sync::Lazy;

static DEFAULT_API_URL: &str = "http://localhost:8000/api";
static SESSION_FILE_NAME: &str = "session.json";
static ENV_API_URL: &str = "DAYDASH_API_URL";
static ENV_DATA_DIR: &str = "DAYDASH_DATA_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "daydash", "daydash"));

#[derive(Debug, Clone)]
pub struct AppConfig {
    api_url: String,
    data_dir: PathBuf,
    session_path: PathBuf,
}

impl AppConfig {
    /// Construct [`AppConfig`] by resolving the API base URL and data
    /// directory using the provided overrides, environment variables, and
    /// platform defaults.
    pub fn discover(
        api_url_override: Option<String>,
        data_dir_override: Option<PathBuf>,
    ) -> Result<Self> {
        let api_url = resolve_api_url(api_url_override);
        let data_dir = resolve_data_dir(data_dir_override)?;
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).with_context(|| {
                format!("Failed to create data directory at {}", data_dir.display())
            })?;
        }
        Self::from_parts(api_url, data_dir)
    }

    /// Construct [`AppConfig`] directly from a resolved URL and directory.
    pub fn from_parts(api_url: String, data_dir: PathBuf) -> Result<Self> {
        let session_path = data_dir.join(SESSION_FILE_NAME);
        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            data_dir,
            session_path,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_path(&self) -> &Path {
        &self.session_path
    }
}

fn resolve_api_url(api_url_override: Option<String>) -> String {
    if let Some(url) = api_url_override {
        return url;
    }
    if let Ok(env_url) = env::var(ENV_API_URL) {
        return env_url;
    }
    DEFAULT_API_URL.to_string()
}

fn resolve_data_dir(data_dir_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = data_dir_override {
        return Ok(dir);
    }

    if let Ok(env_dir) = env::var(ENV_DATA_DIR) {
        return Ok(PathBuf::from(env_dir));
    }

    if cfg!(debug_assertions) {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let dev_dir = manifest_dir.join("..").join("tmp").join("dev-daydash");
        return Ok(dev_dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(base) = BaseDirs::new() {
            return Ok(base.home_dir().join(".daydash"));
        }
    }

    if let Some(project) = &*PROJECT_DIRS {
        return Ok(project.data_dir().to_path_buf());
    }

    if let Some(base) = BaseDirs::new() {
        return Ok(base.home_dir().join(".daydash"));
    }

    Ok(env::current_dir()?.join(".daydash"))
}
