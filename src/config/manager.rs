use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CachePolicy, DEFAULT_TTL, default_db_path};
use crate::error::Error;
use crate::orchestrator::RenderOptions;
use crate::paths;
use crate::translation::{DEFAULT_TIMEOUT, ServiceConfig, ServiceKind};

/// The `[service]` section: which provider to call and how to reach it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSection {
    /// One of `deepl`, `google`, `libretranslate`, `lingva`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

impl ServiceSection {
    /// Gets the API key, preferring the environment variable over the file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }
}

/// The `[translate]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSection {
    /// Provider request timeout in seconds.
    pub timeout: Option<u64>,
    pub use_job_queue: bool,
    pub translate_title: bool,
    pub suppress_language_caption: bool,
    /// Robot policy attached to translated views, e.g. `noindex,nofollow`.
    pub robot_policy: Option<String>,
    pub http_proxy: Option<String>,
}

/// The `[cache]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub enabled: Option<bool>,
    /// Entry lifetime in seconds; `0` deletes entries on read.
    pub ttl: Option<u64>,
    /// Database file shared by the cache and the job queue.
    pub path: Option<PathBuf>,
}

/// The complete `config.toml` structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub translate: TranslateSection,
    #[serde(default)]
    pub cache: CacheSection,
}

impl ConfigFile {
    /// Database file from `[cache] path`, or the default location.
    pub fn database_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(default_db_path)
    }
}

/// Command-line overrides applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub service: Option<String>,
    pub url: Option<String>,
    pub no_cache: bool,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub service: ServiceConfig,
    pub render: RenderOptions,
    pub cache_policy: CachePolicy,
    pub database_path: PathBuf,
}

impl Settings {
    /// Key/value pairs for display, with the API key redacted.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let api_key = if self.service.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        };
        let cache = match self.cache_policy {
            CachePolicy::Disabled => "disabled".to_string(),
            CachePolicy::Bypass => "bypass".to_string(),
            CachePolicy::Ttl(ttl) => format!("{}s", ttl.as_secs()),
        };

        vec![
            ("service", self.service.kind.id().to_string()),
            ("url", self.service.url.clone()),
            ("api_key", api_key.to_string()),
            ("timeout", format!("{}s", self.service.timeout.as_secs())),
            (
                "http_proxy",
                self.service.http_proxy.clone().unwrap_or_else(|| "(none)".into()),
            ),
            ("use_job_queue", self.render.use_job_queue.to_string()),
            ("translate_title", self.render.translate_title.to_string()),
            (
                "suppress_language_caption",
                self.render.suppress_language_caption.to_string(),
            ),
            (
                "robot_policy",
                self.render.robot_policy.clone().unwrap_or_else(|| "(none)".into()),
            ),
            ("cache", cache),
            ("database", self.database_path.display().to_string()),
        ]
    }
}

/// Merges CLI overrides with the config file.
///
/// # Errors
///
/// Fails when the service type is missing or unknown, or when the selected
/// service lacks a required option. The underlying [`Error`] is kept so
/// callers can test [`Error::is_configuration`].
pub fn resolve_config(options: &ResolveOptions, config_file: &ConfigFile) -> Result<Settings> {
    let kind_name = options
        .service
        .as_ref()
        .or(config_file.service.kind.as_ref())
        .cloned()
        .ok_or_else(|| Error::UnsupportedService(String::new()))
        .context(
            "Missing required configuration: 'service.type'\n\n\
             Please provide it via:\n  \
             - CLI option: subtranslate --service <deepl|google|libretranslate|lingva>\n  \
             - Config file: ~/.config/subtranslate/config.toml",
        )?;

    let kind: ServiceKind = kind_name.parse()?;

    let url = options.url.clone().or_else(|| config_file.service.url.clone());
    let api_key = config_file.service.get_api_key();

    let translate = &config_file.translate;
    let timeout = translate
        .timeout
        .filter(|secs| *secs > 0)
        .map_or(DEFAULT_TIMEOUT, Duration::from_secs);

    let service = ServiceConfig::new(kind, url, api_key)
        .with_context(|| format!("Invalid configuration for service '{kind}'"))?
        .with_timeout(timeout)
        .with_proxy(translate.http_proxy.clone());

    let render = RenderOptions {
        use_job_queue: translate.use_job_queue,
        translate_title: translate.translate_title,
        suppress_language_caption: translate.suppress_language_caption,
        robot_policy: translate.robot_policy.clone().filter(|p| !p.is_empty()),
    };

    let cache = &config_file.cache;
    let enabled = !options.no_cache && cache.enabled.unwrap_or(true);
    let cache_policy =
        CachePolicy::from_settings(enabled, cache.ttl.unwrap_or(DEFAULT_TTL.as_secs()));

    Ok(Settings {
        service,
        render,
        cache_policy,
        database_path: config_file.database_path(),
    })
}

/// Loads and saves `config.toml`.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Uses `$XDG_CONFIG_HOME/subtranslate/config.toml`.
    pub fn new() -> Self {
        Self::with_path(paths::config_dir().join("config.toml"))
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })
    }

    /// A missing file yields the defaults; a malformed one is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager::with_path(temp_dir.path().join("config.toml"))
    }

    fn create_test_config() -> ConfigFile {
        ConfigFile {
            service: ServiceSection {
                kind: Some("libretranslate".to_string()),
                url: Some("http://localhost:5000/".to_string()),
                api_key: None,
                api_key_env: None,
            },
            translate: TranslateSection::default(),
            cache: CacheSection::default(),
        }
    }

    fn is_configuration_error(err: &anyhow::Error) -> bool {
        err.downcast_ref::<Error>().is_some_and(Error::is_configuration)
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let mut config = create_test_config();
        config.translate.use_job_queue = true;
        config.cache.ttl = Some(0);

        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn test_parse_documented_layout() {
        let config: ConfigFile = toml::from_str(
            r#"
            [service]
            type = "deepl"
            url = "https://api-free.deepl.com"
            api_key = "secret"

            [translate]
            timeout = 10
            translate_title = true
            robot_policy = "noindex,nofollow"

            [cache]
            enabled = true
            ttl = 3600
            "#,
        )
        .unwrap();

        assert_eq!(config.service.kind.as_deref(), Some("deepl"));
        assert_eq!(config.translate.timeout, Some(10));
        assert!(config.translate.translate_title);
        assert!(!config.translate.use_job_queue);
        assert_eq!(config.cache.ttl, Some(3600));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert_eq!(manager.load_or_default().unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_load_or_default_reports_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[service\ntype = ").unwrap();

        let err = manager.load_or_default().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    #[serial]
    fn test_api_key_env_takes_priority() {
        // SAFETY: env-mutating tests are serialized.
        unsafe { std::env::set_var("SUBTRANSLATE_TEST_API_KEY", "from-env") };

        let section = ServiceSection {
            api_key: Some("from-file".to_string()),
            api_key_env: Some("SUBTRANSLATE_TEST_API_KEY".to_string()),
            ..ServiceSection::default()
        };
        assert_eq!(section.get_api_key(), Some("from-env".to_string()));

        unsafe { std::env::remove_var("SUBTRANSLATE_TEST_API_KEY") };
        assert_eq!(section.get_api_key(), Some("from-file".to_string()));
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(settings.service.kind, ServiceKind::LibreTranslate);
        assert_eq!(settings.service.url, "http://localhost:5000");
        assert_eq!(settings.service.timeout, DEFAULT_TIMEOUT);
        assert_eq!(settings.cache_policy, CachePolicy::Ttl(DEFAULT_TTL));
        assert_eq!(settings.render, RenderOptions::default());
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let options = ResolveOptions {
            service: Some("lingva".to_string()),
            url: Some("https://lingva.example".to_string()),
            no_cache: true,
        };

        let settings = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(settings.service.kind, ServiceKind::Lingva);
        assert_eq!(settings.service.url, "https://lingva.example");
        assert_eq!(settings.cache_policy, CachePolicy::Disabled);
    }

    #[test]
    fn test_resolve_missing_service_type() {
        let err = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap_err();

        assert!(is_configuration_error(&err));
        assert!(err.to_string().contains("service.type"));
    }

    #[test]
    fn test_resolve_unknown_service_type() {
        let mut config = create_test_config();
        config.service.kind = Some("bing".to_string());

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();

        assert!(is_configuration_error(&err));
        assert!(err.to_string().contains("bing"));
    }

    #[test]
    fn test_resolve_missing_required_option() {
        let mut config = create_test_config();
        config.service.kind = Some("deepl".to_string());

        let err = resolve_config(&ResolveOptions::default(), &config).unwrap_err();

        assert!(is_configuration_error(&err));
        let Some(Error::MissingServiceOption { option, .. }) = err.downcast_ref::<Error>() else {
            panic!("expected MissingServiceOption, got {err:?}");
        };
        assert_eq!(*option, "api_key");
    }

    #[test]
    fn test_resolve_google_without_url() {
        let config = ConfigFile {
            service: ServiceSection {
                kind: Some("google".to_string()),
                api_key: Some("key".to_string()),
                ..ServiceSection::default()
            },
            ..ConfigFile::default()
        };

        let settings = resolve_config(&ResolveOptions::default(), &config).unwrap();
        assert_eq!(settings.service.url, crate::translation::GOOGLE_TRANSLATE_URL);
    }

    #[test]
    fn test_resolve_translate_and_cache_sections() {
        let mut config = create_test_config();
        config.translate = TranslateSection {
            timeout: Some(12),
            use_job_queue: true,
            translate_title: true,
            suppress_language_caption: false,
            robot_policy: Some("noindex".to_string()),
            http_proxy: Some("http://proxy:3128".to_string()),
        };
        config.cache = CacheSection {
            enabled: Some(true),
            ttl: Some(0),
            path: Some(PathBuf::from("/tmp/subtranslate-test.db")),
        };

        let settings = resolve_config(&ResolveOptions::default(), &config).unwrap();

        assert_eq!(settings.service.timeout, Duration::from_secs(12));
        assert_eq!(settings.service.http_proxy.as_deref(), Some("http://proxy:3128"));
        assert!(settings.render.use_job_queue);
        assert_eq!(settings.render.robot_policy.as_deref(), Some("noindex"));
        assert_eq!(settings.cache_policy, CachePolicy::Bypass);
        assert_eq!(settings.database_path, PathBuf::from("/tmp/subtranslate-test.db"));
    }

    #[test]
    fn test_describe_redacts_api_key() {
        let mut config = create_test_config();
        config.service.api_key = Some("very-secret".to_string());

        let settings = resolve_config(&ResolveOptions::default(), &config).unwrap();
        let described = settings.describe();

        assert!(described.iter().all(|(_, value)| !value.contains("very-secret")));
        assert!(described.contains(&("api_key", "(set)".to_string())));
    }
}
