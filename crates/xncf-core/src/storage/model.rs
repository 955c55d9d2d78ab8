use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::module_system::descriptor::ModuleDescriptor;

/// Persisted fact that a module version has been installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub uid: String,
    pub name: String,
    pub version: String,
    /// Menu node created for the module, once linked
    pub menu_id: Option<String>,
    pub add_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl ModuleRecord {
    pub fn new(descriptor: &ModuleDescriptor, now: DateTime<Utc>) -> Self {
        Self {
            uid: descriptor.uid.clone(),
            name: descriptor.display_name().to_string(),
            version: descriptor.version.clone(),
            menu_id: None,
            add_time: now,
            update_time: now,
        }
    }

    /// Move the record to the descriptor's version. `add_time` and the menu
    /// link are kept.
    pub fn apply_update(&mut self, descriptor: &ModuleDescriptor, now: DateTime<Utc>) {
        self.name = descriptor.display_name().to_string();
        self.version = descriptor.version.clone();
        self.update_time = now;
    }

    pub fn to_dto(&self) -> ModuleRecordDto {
        ModuleRecordDto {
            uid: self.uid.clone(),
            version: self.version.clone(),
            menu_id: self.menu_id.clone(),
        }
    }
}

/// Projection of a [`ModuleRecord`] handed to the scan driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecordDto {
    pub uid: String,
    pub version: String,
    pub menu_id: Option<String>,
}

/// A navigation entry in the admin menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub is_menu: bool,
    pub visible: bool,
    /// Code permissions refer to
    pub resource_code: String,
}

impl MenuNode {
    /// A draft that would write this node back unchanged
    pub fn to_draft(&self) -> MenuDraft {
        MenuDraft {
            id: Some(self.id.clone()),
            parent_id: self.parent_id.clone(),
            name: self.name.clone(),
            path: self.path.clone(),
            icon: self.icon.clone(),
            order: self.order,
            is_menu: self.is_menu,
            visible: self.visible,
        }
    }
}

/// Create-or-update payload for a [`MenuNode`]. No `id` means create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuDraft {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub order: i32,
    pub is_menu: bool,
    pub visible: bool,
}

/// Binding of a role to a menu resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub is_menu: bool,
    pub resource_code: String,
    pub role_id: String,
    pub role_code: String,
    /// Id of the menu node the grant covers
    pub permission_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderingType {
    Ascending,
    Descending,
}

/// Field module records can be listed by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSortKey {
    AddTime,
    UpdateTime,
    Uid,
}

/// One page of a listing. `page_index` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub page_index: usize,
    pub page_size: usize,
    pub total_count: usize,
}

impl<T> PagedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            0
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }
}
