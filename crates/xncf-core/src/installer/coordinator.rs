use std::fmt::Debug;
use std::sync::Arc;

use crate::audit::{AuditEntry, AuditSink};
use crate::installer::menu::MenuSynchronizer;
use crate::kernel::error::Result;
use crate::module_system::error::ModuleSystemError;
use crate::module_system::registry::ModuleRegistry;
use crate::module_system::scan::{InstallEvent, InstallOrUpdate, ScanError, ScanReport, ScanTarget};
use crate::storage::config::InstallerConfig;
use crate::storage::model::{
    MenuNode, ModuleRecord, ModuleRecordDto, OrderingType, PagedList, RecordSortKey,
};
use crate::storage::provider::{MenuStore, ModuleRecordStore};

/// What an install call did.
#[derive(Debug, Clone)]
pub struct InstallationResult {
    /// Installed records as they were before the scan ran
    pub existing_records: PagedList<ModuleRecord>,
    /// Scan summary, one line per visited module
    pub message: String,
    /// Decision of the last module installed or updated; `None` if none was
    pub decision: Option<InstallOrUpdate>,
    /// Every module installed or updated, in processing order
    pub installed: Vec<InstallEvent>,
}

/// Decides whether a module is installed or updated and carries out the
/// record, menu and permission writes in order.
pub struct InstallationCoordinator {
    registry: Arc<ModuleRegistry>,
    records: Arc<dyn ModuleRecordStore>,
    menus: MenuSynchronizer,
    audit: Arc<dyn AuditSink>,
    config: Arc<InstallerConfig>,
}

impl InstallationCoordinator {
    pub fn new(
        registry: Arc<ModuleRegistry>,
        records: Arc<dyn ModuleRecordStore>,
        menu_store: Arc<dyn MenuStore>,
        audit: Arc<dyn AuditSink>,
        config: Arc<InstallerConfig>,
    ) -> Self {
        let menus = MenuSynchronizer::new(menu_store, records.clone(), config.clone());
        Self {
            registry,
            records,
            menus,
            audit,
            config,
        }
    }

    pub fn menu_synchronizer(&self) -> &MenuSynchronizer {
        &self.menus
    }

    /// Install or update one module (and the modules it depends on).
    ///
    /// Rejects an empty uid, a uid the registry does not know, and a module
    /// whose exact version is already recorded; none of these write anything.
    pub async fn install_module(&self, uid: &str) -> Result<InstallationResult> {
        require_uid(uid)?;
        let descriptor = self
            .registry
            .find(uid)
            .ok_or_else(|| ModuleSystemError::not_found(uid))?;

        let version = descriptor.version.as_str();
        let installed = self
            .records
            .find_one(&|r: &ModuleRecord| r.uid == uid && r.version == version)
            .await?;
        if installed.is_some() {
            return Err(ModuleSystemError::AlreadyInstalled {
                uid: uid.to_string(),
                version: version.to_string(),
            }
            .into());
        }

        self.run_scan(ScanTarget::one(uid)).await
    }

    /// Install or update every registered module that is not already at its
    /// registered version.
    pub async fn install_all(&self) -> Result<InstallationResult> {
        self.run_scan(ScanTarget::All).await
    }

    /// Link a menu to a module that is recorded but has none.
    ///
    /// This is the recovery path for an install whose record was written but
    /// whose menu synchronization failed. Returns `None` for bootstrap modules,
    /// the existing node if the record is already linked to one, and the
    /// relinked node otherwise.
    pub async fn repair_menu(&self, uid: &str) -> Result<Option<MenuNode>> {
        require_uid(uid)?;
        let descriptor = self
            .registry
            .find(uid)
            .ok_or_else(|| ModuleSystemError::not_found(uid))?;
        if self.config.is_bootstrap(uid) {
            log::info!("Module {} is a bootstrap module, no menu to repair", uid);
            return Ok(None);
        }

        let record = self
            .records
            .find_one(&|r: &ModuleRecord| r.uid == uid)
            .await?
            .ok_or_else(|| ModuleSystemError::not_found(uid))?;
        if let Some(menu_id) = &record.menu_id {
            if let Some(menu) = self.menus.find_menu(menu_id).await? {
                return Ok(Some(menu));
            }
            log::warn!("Module {} links to missing menu {}, relinking", uid, menu_id);
        }

        self.menus.relink_menu(descriptor).await.map(Some)
    }

    /// One page of installed modules, newest first
    pub async fn list_modules(&self, page_index: usize, page_size: usize) -> Result<PagedList<ModuleRecord>> {
        self.records
            .find_page(
                page_index,
                page_size,
                &|_: &ModuleRecord| true,
                RecordSortKey::AddTime,
                OrderingType::Descending,
            )
            .await
    }

    async fn run_scan(&self, target: ScanTarget) -> Result<InstallationResult> {
        let existing_records = self.list_modules(1, self.config.record_page_size).await?;
        let existing: Vec<ModuleRecordDto> = existing_records.iter().map(ModuleRecord::to_dto).collect();

        // Each module's menu is synchronized before the next module is written
        let report = match self
            .registry
            .scan_and_install(&existing, self.records.as_ref(), &target, &self.menus)
            .await
        {
            Ok(report) => report,
            Err(ScanError { report, source }) => {
                self.record_audit(report.last_decision(), report.summary);
                return Err(source);
            }
        };

        let ScanReport { events, summary } = report;
        let decision = events.last().map(|event| event.decision);
        self.record_audit(decision, summary.clone());

        Ok(InstallationResult {
            existing_records,
            message: summary,
            decision,
            installed: events,
        })
    }

    fn record_audit(&self, decision: Option<InstallOrUpdate>, result: String) {
        let outcome = decision.map(|d| d.label()).unwrap_or("Failed");
        self.audit.record(AuditEntry {
            operation: format!("Install or update module ({})", outcome),
            result,
        });
    }
}

/// Uids are matched exactly; only an empty or all-blank uid is rejected up front.
fn require_uid(uid: &str) -> std::result::Result<(), ModuleSystemError> {
    if uid.trim().is_empty() {
        return Err(ModuleSystemError::InvalidInput {
            message: "module uid must not be empty".to_string(),
        });
    }
    Ok(())
}

impl Debug for InstallationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationCoordinator")
            .field("modules", &self.registry.len())
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}
