//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`APP_DATA__RAW_DIR` maps to `data.raw_dir`). Provides helpers to expand `~`
//! and `${VAR}` and to resolve relative paths against the config directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::types::VectorizerConfig;

pub const DEFAULT_RAW_DIR: &str = "data/openflights";
pub const DEFAULT_INDEX_DIR: &str = "data/index";
pub const DEFAULT_BIND: &str = "127.0.0.1:8001";

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current working directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load `config.toml` (and the env-specific overlay) from `base_dir`.
    pub fn load_from(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// `None` when `key` is absent; a present but malformed value is `InvalidConfig`.
    pub fn get_opt<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.figment.contains(key) {
            return Ok(None);
        }
        self.figment
            .extract_inner(key)
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("'{key}': {e}")).into())
    }

    /// Resolve a path-valued key against the config directory, falling back to `default`.
    pub fn path_or(&self, key: &str, default: &str) -> PathBuf {
        let raw: String = self.get(key).unwrap_or_else(|_| default.to_string());
        resolve_with_base(&self.base_dir, raw)
    }

    pub fn vectorizer(&self) -> anyhow::Result<VectorizerConfig> {
        let defaults = VectorizerConfig::default();
        let cfg = VectorizerConfig {
            min_n: self.get_opt("vectorizer.min_n")?.unwrap_or(defaults.min_n),
            max_n: self.get_opt("vectorizer.max_n")?.unwrap_or(defaults.max_n),
            max_features: self.get_opt::<usize>("vectorizer.max_features")?.or(defaults.max_features),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Allowed CORS origins; `["*"]` when unset. Accepts a list or a comma-separated string.
    pub fn cors_origins(&self) -> Vec<String> {
        if let Ok(list) = self.get::<Vec<String>>("server.cors_origins") { return list; }
        let raw: String = self.get("server.cors_origins").unwrap_or_else(|_| "*".to_string());
        raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        self.vectorizer()?;
        match env {
            "prod" | "production" => {
                if self.get::<String>("data.index_dir").is_err() {
                    return Err(Error::InvalidConfig("data.index_dir must be set in production".to_string()).into());
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
