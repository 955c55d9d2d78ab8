use serde::{Deserialize, Serialize};

/// Static metadata describing an installable module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Globally unique identifier of the module
    pub uid: String,
    /// Human readable module name
    #[serde(default)]
    pub name: String,
    /// Version string. Only compared for equality.
    pub version: String,
    /// Name of the menu entry created for the module
    pub menu_name: String,
    /// Icon css class for the menu entry
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Uids of modules that must be installed before this one
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl ModuleDescriptor {
    /// Create a descriptor with no icon, description or dependencies.
    /// The module name defaults to the menu name.
    pub fn new(uid: &str, version: &str, menu_name: &str) -> Self {
        Self {
            uid: uid.to_string(),
            name: menu_name.to_string(),
            version: version.to_string(),
            menu_name: menu_name.to_string(),
            icon: None,
            description: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_dependency(mut self, uid: &str) -> Self {
        self.dependencies.push(uid.to_string());
        self
    }

    /// Name used in logs and scan summaries
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.menu_name
        } else {
            &self.name
        }
    }

    /// The declared icon, ignoring empty strings
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref().filter(|icon| !icon.trim().is_empty())
    }
}

/// On-disk list of descriptors the registry is loaded from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModuleManifest {
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
}
