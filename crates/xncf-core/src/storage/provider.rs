use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::storage::model::{
    MenuDraft, MenuNode, ModuleRecord, OrderingType, PagedList, PermissionGrant, RecordSortKey,
};

/// Predicate over a stored value, used for lookups
pub type Predicate<'a, T> = &'a (dyn Fn(&T) -> bool + Send + Sync);

/// Persistence for installed-module records
#[async_trait]
pub trait ModuleRecordStore: Send + Sync {
    /// First record matching the predicate
    async fn find_one(&self, predicate: Predicate<'_, ModuleRecord>) -> Result<Option<ModuleRecord>>;

    /// One page (1-based) of the records matching the predicate, sorted
    async fn find_page(
        &self,
        page_index: usize,
        page_size: usize,
        predicate: Predicate<'_, ModuleRecord>,
        order_by: RecordSortKey,
        direction: OrderingType,
    ) -> Result<PagedList<ModuleRecord>>;

    /// Insert a new record. Fails if (uid, version) is already stored.
    async fn insert(&self, record: ModuleRecord) -> Result<()>;

    /// Replace the stored record with the same uid
    async fn update(&self, record: ModuleRecord) -> Result<()>;

    /// Link a module record to its menu node
    async fn update_menu_id(&self, uid: &str, menu_id: &str) -> Result<()>;
}

/// Persistence for menu nodes and permission grants
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// First menu node matching the predicate
    async fn find_one(&self, predicate: Predicate<'_, MenuNode>) -> Result<Option<MenuNode>>;

    /// Create the node when `draft.id` is `None`, otherwise update it in place
    async fn create_or_update(&self, draft: MenuDraft) -> Result<MenuNode>;

    /// Stage a permission grant; it is visible once `save_changes` runs
    async fn insert_permission(&self, grant: PermissionGrant) -> Result<()>;

    async fn find_permission(&self, predicate: Predicate<'_, PermissionGrant>) -> Result<Option<PermissionGrant>>;

    /// Commit staged permission grants
    async fn save_changes(&self) -> Result<usize>;

    async fn list_menus(&self) -> Result<Vec<MenuNode>>;
}
