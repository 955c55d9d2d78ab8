use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Parse `data` in this format
    pub fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        let parsed = match self {
            ConfigFormat::Json => serde_json::from_str(data).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(boxed),
        };
        parsed.map_err(|source| {
            Error::from(StorageSystemError::DeserializationError {
                format: self.extension().to_string(),
                source,
            })
        })
    }

    /// Render `value` in this format
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String> {
        let rendered = match self {
            ConfigFormat::Json => serde_json::to_string_pretty(value).map_err(boxed),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(value).map_err(boxed),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(value).map_err(boxed),
        };
        rendered.map_err(|source| {
            Error::from(StorageSystemError::SerializationError {
                format: self.extension().to_string(),
                source,
            })
        })
    }
}

type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

fn boxed<E: std::error::Error + Send + Sync + 'static>(e: E) -> BoxedError {
    Box::new(e)
}

pub(crate) async fn read_to_string(path: &Path, operation: &str) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::from(StorageSystemError::io(e, operation, path.to_path_buf())))
}

/// A module installed before the menu tree exists, and the order its menu
/// gets if one is ever built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapModule {
    pub uid: String,
    pub menu_order: i32,
}

impl BootstrapModule {
    pub fn new(uid: &str, menu_order: i32) -> Self {
        Self {
            uid: uid.to_string(),
            menu_order,
        }
    }
}

/// Installer settings. Every field has a default, so a config file only needs
/// the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Name of the top-level menu module menus are created under
    pub top_menu_name: String,
    pub default_icon: String,
    pub default_menu_order: i32,
    /// Route a module menu links to; `?uid=<uid>` is appended
    pub module_start_route: String,
    pub admin_role_id: String,
    pub admin_role_code: String,
    /// Page size used to load "all" installed records before a scan
    pub record_page_size: usize,
    /// Modules exempt from menu synchronization during their own install
    pub bootstrap_modules: Vec<BootstrapModule>,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            top_menu_name: constants::EXTENSION_MODULES_MENU_NAME.to_string(),
            default_icon: constants::DEFAULT_MENU_ICON.to_string(),
            default_menu_order: constants::DEFAULT_MENU_ORDER,
            module_start_route: constants::MODULE_START_ROUTE.to_string(),
            admin_role_id: constants::ADMIN_ROLE_ID.to_string(),
            admin_role_code: constants::ADMIN_ROLE_CODE.to_string(),
            record_page_size: constants::RECORD_LISTING_PAGE_SIZE,
            bootstrap_modules: vec![
                BootstrapModule::new(
                    constants::SYSTEM_XNCF_MODULE_SERVICE_UID,
                    constants::SERVICE_MODULE_MENU_ORDER,
                ),
                BootstrapModule::new(
                    constants::SYSTEM_XNCF_MODULE_AREAS_ADMIN_UID,
                    constants::AREAS_ADMIN_MODULE_MENU_ORDER,
                ),
            ],
        }
    }
}

impl InstallerConfig {
    /// Replace the bootstrap module set
    pub fn with_bootstrap_modules(mut self, modules: Vec<BootstrapModule>) -> Self {
        self.bootstrap_modules = modules;
        self
    }

    pub fn is_bootstrap(&self, uid: &str) -> bool {
        self.bootstrap_modules.iter().any(|m| m.uid == uid)
    }

    /// Menu order for a newly created module menu
    pub fn menu_order_for(&self, uid: &str) -> i32 {
        self.bootstrap_modules
            .iter()
            .find(|m| m.uid == uid)
            .map(|m| m.menu_order)
            .unwrap_or(self.default_menu_order)
    }

    /// Path a module's menu entry links to
    pub fn module_start_path(&self, uid: &str) -> String {
        format!("{}?uid={}", self.module_start_route, uid)
    }

    /// Parse a config document in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        format.decode(data)
    }

    /// Load a config file, falling back to defaults when the file is missing
    pub async fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No installer config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        let content = read_to_string(path, "load_installer_config").await?;
        Self::parse(&content, format)
    }

    /// Write the config, picking the format from the file extension
    pub async fn save(&self, path: &Path) -> Result<()> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| StorageSystemError::UnsupportedConfigFormat(path.display().to_string()))?;
        let content = format.encode(self)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| StorageSystemError::io(e, "save_installer_config", path.to_path_buf()))?;
        Ok(())
    }
}
