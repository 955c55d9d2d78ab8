use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::kernel::component::KernelComponent;
use crate::kernel::error::Result;
use crate::storage::error::StorageSystemError;
use crate::storage::model::{
    MenuDraft, MenuNode, ModuleRecord, OrderingType, PagedList, PermissionGrant, RecordSortKey,
};
use crate::storage::provider::{MenuStore, ModuleRecordStore, Predicate};

/// Everything a [`MemoryStore`] holds, in the shape written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default)]
    pub menus: Vec<MenuNode>,
    #[serde(default)]
    pub permissions: Vec<PermissionGrant>,
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: StoreSnapshot,
    /// Grants inserted but not yet saved
    pending_permissions: Vec<PermissionGrant>,
}

/// In-memory module, menu and permission store.
///
/// All state sits behind one async mutex, so each store call is atomic; in
/// particular the duplicate (uid, version) check and the insert happen under
/// the same lock. With a snapshot path the store loads the JSON snapshot on
/// `initialize` and writes it back on `stop`.
pub struct MemoryStore {
    name: &'static str,
    state: Mutex<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store with no backing file
    pub fn new() -> Self {
        Self {
            name: "MemoryStore",
            state: Mutex::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Create an empty store persisted to `path` across lifecycle runs
    pub fn with_snapshot_path(path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: Some(path.into()),
            ..Self::new()
        }
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            state: Mutex::new(StoreState {
                snapshot,
                pending_permissions: Vec::new(),
            }),
            ..Self::new()
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Copy of the committed state
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.snapshot.clone()
    }

    /// Ensure a top-level menu named `name` exists and return it.
    ///
    /// This is the platform bootstrap step the installer expects to have run;
    /// the installer itself never creates the parent menu.
    pub async fn seed_top_menu(&self, name: &str, order: i32) -> MenuNode {
        let mut state = self.state.lock().await;
        if let Some(existing) = state
            .snapshot
            .menus
            .iter()
            .find(|m| m.parent_id.is_none() && m.name == name)
        {
            return existing.clone();
        }
        let node = new_node(MenuDraft {
            id: None,
            parent_id: None,
            name: name.to_string(),
            path: None,
            icon: Some("fa fa-puzzle-piece".to_string()),
            order,
            is_menu: true,
            visible: true,
        });
        log::debug!("Seeded top-level menu '{}' ({})", name, node.id);
        state.snapshot.menus.push(node.clone());
        node
    }

    /// Replace the state with the snapshot stored at `path`
    pub async fn load(&self, path: &Path) -> Result<()> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StorageSystemError::io(e, "load_snapshot", path.to_path_buf()))?;
        let snapshot: StoreSnapshot =
            serde_json::from_str(&content).map_err(|e| StorageSystemError::DeserializationError {
                format: "json".to_string(),
                source: Box::new(e),
            })?;
        let mut state = self.state.lock().await;
        state.snapshot = snapshot;
        state.pending_permissions.clear();
        Ok(())
    }

    /// Write the committed state to `path` as pretty JSON
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = {
            let state = self.state.lock().await;
            serde_json::to_string_pretty(&state.snapshot).map_err(|e| {
                StorageSystemError::SerializationError {
                    format: "json".to_string(),
                    source: Box::new(e),
                }
            })?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageSystemError::io(e, "create_dir_all", parent.to_path_buf()))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| StorageSystemError::io(e, "save_snapshot", path.to_path_buf()))?;
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("name", &self.name)
            .field("snapshot_path", &self.snapshot_path)
            .finish_non_exhaustive()
    }
}

fn new_node(draft: MenuDraft) -> MenuNode {
    let id = Uuid::new_v4().to_string();
    MenuNode {
        resource_code: format!("menu:{}", id),
        id,
        parent_id: draft.parent_id,
        name: draft.name,
        path: draft.path,
        icon: draft.icon,
        order: draft.order,
        is_menu: draft.is_menu,
        visible: draft.visible,
    }
}

#[async_trait]
impl KernelComponent for MemoryStore {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> Result<()> {
        match &self.snapshot_path {
            Some(path) if path.exists() => {
                self.load(path).await?;
                log::info!("Loaded store snapshot from {}", path.display());
            }
            Some(path) => log::info!("No store snapshot at {}, starting empty", path.display()),
            None => {}
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        if let Some(path) = &self.snapshot_path {
            self.save(path).await?;
            log::info!("Saved store snapshot to {}", path.display());
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleRecordStore for MemoryStore {
    async fn find_one(&self, predicate: Predicate<'_, ModuleRecord>) -> Result<Option<ModuleRecord>> {
        let state = self.state.lock().await;
        Ok(state.snapshot.modules.iter().find(|r| predicate(*r)).cloned())
    }

    async fn find_page(
        &self,
        page_index: usize,
        page_size: usize,
        predicate: Predicate<'_, ModuleRecord>,
        order_by: RecordSortKey,
        direction: OrderingType,
    ) -> Result<PagedList<ModuleRecord>> {
        let state = self.state.lock().await;
        let mut matching: Vec<ModuleRecord> = state
            .snapshot
            .modules
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            let ordering = match order_by {
                RecordSortKey::AddTime => a.add_time.cmp(&b.add_time),
                RecordSortKey::UpdateTime => a.update_time.cmp(&b.update_time),
                RecordSortKey::Uid => a.uid.cmp(&b.uid),
            };
            match direction {
                OrderingType::Ascending => ordering,
                OrderingType::Descending => ordering.reverse(),
            }
        });

        let page_index = page_index.max(1);
        let total_count = matching.len();
        let items = matching
            .into_iter()
            .skip((page_index - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Ok(PagedList {
            items,
            page_index,
            page_size,
            total_count,
        })
    }

    async fn insert(&self, record: ModuleRecord) -> Result<()> {
        let mut state = self.state.lock().await;
        if state
            .snapshot
            .modules
            .iter()
            .any(|r| r.uid == record.uid && r.version == record.version)
        {
            return Err(StorageSystemError::DuplicateRecord {
                uid: record.uid,
                version: record.version,
            }
            .into());
        }
        state.snapshot.modules.push(record);
        Ok(())
    }

    async fn update(&self, record: ModuleRecord) -> Result<()> {
        let mut state = self.state.lock().await;
        let slot = state
            .snapshot
            .modules
            .iter_mut()
            .find(|r| r.uid == record.uid)
            .ok_or_else(|| StorageSystemError::RecordNotFound {
                uid: record.uid.clone(),
            })?;
        *slot = record;
        Ok(())
    }

    async fn update_menu_id(&self, uid: &str, menu_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        let mut updated = 0;
        for record in state.snapshot.modules.iter_mut().filter(|r| r.uid == uid) {
            record.menu_id = Some(menu_id.to_string());
            updated += 1;
        }
        if updated == 0 {
            return Err(StorageSystemError::RecordNotFound { uid: uid.to_string() }.into());
        }
        Ok(())
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn find_one(&self, predicate: Predicate<'_, MenuNode>) -> Result<Option<MenuNode>> {
        let state = self.state.lock().await;
        Ok(state.snapshot.menus.iter().find(|m| predicate(*m)).cloned())
    }

    async fn create_or_update(&self, draft: MenuDraft) -> Result<MenuNode> {
        let mut state = self.state.lock().await;
        match draft.id.clone() {
            None => {
                let node = new_node(draft);
                state.snapshot.menus.push(node.clone());
                Ok(node)
            }
            Some(id) => {
                let node = state
                    .snapshot
                    .menus
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| StorageSystemError::MenuNodeNotFound { id: id.clone() })?;
                node.parent_id = draft.parent_id;
                node.name = draft.name;
                node.path = draft.path;
                node.icon = draft.icon;
                node.order = draft.order;
                node.is_menu = draft.is_menu;
                node.visible = draft.visible;
                Ok(node.clone())
            }
        }
    }

    async fn insert_permission(&self, grant: PermissionGrant) -> Result<()> {
        self.state.lock().await.pending_permissions.push(grant);
        Ok(())
    }

    async fn find_permission(&self, predicate: Predicate<'_, PermissionGrant>) -> Result<Option<PermissionGrant>> {
        let state = self.state.lock().await;
        Ok(state.snapshot.permissions.iter().find(|p| predicate(*p)).cloned())
    }

    async fn save_changes(&self) -> Result<usize> {
        let mut state = self.state.lock().await;
        let pending = std::mem::take(&mut state.pending_permissions);
        let saved = pending.len();
        state.snapshot.permissions.extend(pending);
        Ok(saved)
    }

    async fn list_menus(&self) -> Result<Vec<MenuNode>> {
        Ok(self.state.lock().await.snapshot.menus.clone())
    }
}
