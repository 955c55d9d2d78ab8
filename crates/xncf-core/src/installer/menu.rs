use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;
use crate::module_system::descriptor::ModuleDescriptor;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::scan::{InstallEvent, InstallObserver, InstallOrUpdate};
use crate::storage::config::InstallerConfig;
use crate::storage::model::{MenuDraft, MenuNode, PermissionGrant};
use crate::storage::provider::{MenuStore, ModuleRecordStore};

/// Keeps a module's menu node and administrator grant in step with its record.
#[derive(Clone)]
pub struct MenuSynchronizer {
    menus: Arc<dyn MenuStore>,
    records: Arc<dyn ModuleRecordStore>,
    config: Arc<InstallerConfig>,
}

impl MenuSynchronizer {
    pub fn new(
        menus: Arc<dyn MenuStore>,
        records: Arc<dyn ModuleRecordStore>,
        config: Arc<InstallerConfig>,
    ) -> Self {
        Self { menus, records, config }
    }

    /// Create or update the menu node of a module that was just installed or
    /// updated.
    ///
    /// On Update an existing child menu with the module's menu name keeps its
    /// id, parent, path and order; only name and icon are rewritten, and the
    /// icon is taken as declared, so no icon clears it. Otherwise a new node is
    /// created under the top-level menu with the default icon as fallback.
    /// Only on Install is the administrator grant written and the menu id
    /// linked onto the record.
    pub async fn install_menu(&self, descriptor: &ModuleDescriptor, decision: InstallOrUpdate) -> Result<MenuNode> {
        let top_menu = self.top_menu().await?;
        let current = self.find_child(&top_menu.id, &descriptor.menu_name).await?;

        let draft = match (decision, current) {
            (InstallOrUpdate::Update, Some(current)) => {
                refreshed_draft(&current, descriptor, descriptor.icon.clone())
            }
            _ => self.new_draft(descriptor, &top_menu.id),
        };
        let menu = self.menus.create_or_update(draft).await?;
        log::debug!(
            "{} menu '{}' ({}) for module {}",
            decision,
            menu.name,
            menu.id,
            descriptor.uid
        );

        if decision == InstallOrUpdate::Install {
            self.grant_admin(&menu).await?;
            self.records.update_menu_id(&descriptor.uid, &menu.id).await?;
        }
        Ok(menu)
    }

    /// Re-establish the menu link of a module whose record exists but whose
    /// menu synchronization never completed.
    ///
    /// Reuses a child menu that already carries the module's menu name, adds
    /// the administrator grant only if that menu has none, and links the menu
    /// id onto the record.
    pub async fn relink_menu(&self, descriptor: &ModuleDescriptor) -> Result<MenuNode> {
        let top_menu = self.top_menu().await?;
        let draft = match self.find_child(&top_menu.id, &descriptor.menu_name).await? {
            Some(current) => refreshed_draft(&current, descriptor, Some(self.icon_for(descriptor))),
            None => self.new_draft(descriptor, &top_menu.id),
        };
        let menu = self.menus.create_or_update(draft).await?;

        let role_id = self.config.admin_role_id.as_str();
        let menu_id = menu.id.as_str();
        let granted = self
            .menus
            .find_permission(&|p: &PermissionGrant| p.permission_id == menu_id && p.role_id == role_id)
            .await?
            .is_some();
        if !granted {
            self.grant_admin(&menu).await?;
        }
        self.records.update_menu_id(&descriptor.uid, &menu.id).await?;
        log::info!("Relinked menu '{}' ({}) to module {}", menu.name, menu.id, descriptor.uid);
        Ok(menu)
    }

    pub async fn find_menu(&self, id: &str) -> Result<Option<MenuNode>> {
        self.menus.find_one(&|m: &MenuNode| m.id == id).await
    }

    async fn top_menu(&self) -> Result<MenuNode> {
        let name = self.config.top_menu_name.as_str();
        self.menus
            .find_one(&|m: &MenuNode| m.name == name)
            .await?
            .ok_or_else(|| {
                ModuleSystemError::MenuNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }

    async fn find_child(&self, parent_id: &str, menu_name: &str) -> Result<Option<MenuNode>> {
        self.menus
            .find_one(&|m: &MenuNode| m.parent_id.as_deref() == Some(parent_id) && m.name == menu_name)
            .await
    }

    fn icon_for(&self, descriptor: &ModuleDescriptor) -> String {
        descriptor
            .icon()
            .unwrap_or(self.config.default_icon.as_str())
            .to_string()
    }

    fn new_draft(&self, descriptor: &ModuleDescriptor, parent_id: &str) -> MenuDraft {
        MenuDraft {
            id: None,
            parent_id: Some(parent_id.to_string()),
            name: descriptor.menu_name.clone(),
            path: Some(self.config.module_start_path(&descriptor.uid)),
            icon: Some(self.icon_for(descriptor)),
            order: self.config.menu_order_for(&descriptor.uid),
            is_menu: true,
            visible: true,
        }
    }

    async fn grant_admin(&self, menu: &MenuNode) -> Result<()> {
        let grant = PermissionGrant {
            is_menu: true,
            resource_code: menu.resource_code.clone(),
            role_id: self.config.admin_role_id.clone(),
            role_code: self.config.admin_role_code.clone(),
            permission_id: menu.id.clone(),
        };
        self.menus.insert_permission(grant).await?;
        self.menus.save_changes().await?;
        Ok(())
    }
}

fn refreshed_draft(current: &MenuNode, descriptor: &ModuleDescriptor, icon: Option<String>) -> MenuDraft {
    let mut draft = current.to_draft();
    draft.name = descriptor.menu_name.clone();
    draft.icon = icon;
    draft
}

/// Menu synchronization as the per-module step of a scan. Bootstrap modules
/// are passed over: the parent menu may not exist yet while they install.
#[async_trait]
impl InstallObserver for MenuSynchronizer {
    async fn on_installed(&self, event: &InstallEvent) -> Result<()> {
        let uid = event.descriptor.uid.as_str();
        if self.config.is_bootstrap(uid) {
            log::debug!("Skipping menu synchronization for bootstrap module {}", uid);
            return Ok(());
        }
        self.install_menu(&event.descriptor, event.decision).await?;
        Ok(())
    }
}
