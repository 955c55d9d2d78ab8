use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use crate::kernel::error::{Error, Result};
use crate::module_system::dependency::resolve_install_order;
use crate::module_system::descriptor::ModuleDescriptor;
use crate::module_system::registry::ModuleRegistry;
use crate::storage::error::StorageSystemError;
use crate::storage::model::{ModuleRecord, ModuleRecordDto};
use crate::storage::provider::ModuleRecordStore;

/// What happened to a module during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallOrUpdate {
    /// No record existed for the uid
    Install,
    /// A record existed for the uid at another version
    Update,
}

impl InstallOrUpdate {
    pub fn label(&self) -> &'static str {
        match self {
            InstallOrUpdate::Install => "Install",
            InstallOrUpdate::Update => "Update",
        }
    }
}

impl fmt::Display for InstallOrUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which modules a scan considers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    /// Every registered module
    All,
    /// One module plus the modules it depends on
    One(String),
}

impl ScanTarget {
    pub fn one(uid: impl Into<String>) -> Self {
        ScanTarget::One(uid.into())
    }
}

/// A module whose record was written during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallEvent {
    pub descriptor: ModuleDescriptor,
    pub decision: InstallOrUpdate,
}

/// Work that must follow each record write before the scan moves on to the
/// next module.
#[async_trait]
pub trait InstallObserver: Send + Sync {
    async fn on_installed(&self, event: &InstallEvent) -> Result<()>;
}

/// Outcome of [`ModuleRegistry::scan_and_install`].
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Installed/updated modules in processing order
    pub events: Vec<InstallEvent>,
    /// One line per visited module
    pub summary: String,
}

impl ScanReport {
    /// Decision of the last module processed, if any was
    pub fn last_decision(&self) -> Option<InstallOrUpdate> {
        self.events.last().map(|event| event.decision)
    }

    fn push_line(&mut self, line: String) {
        if !self.summary.is_empty() {
            self.summary.push('\n');
        }
        self.summary.push_str(&line);
    }
}

/// A scan that stopped early. `report` holds every module committed before
/// the failure, including the one whose observer failed.
#[derive(Debug, ThisError)]
#[error("{source}")]
pub struct ScanError {
    pub report: ScanReport,
    pub source: Error,
}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Self {
        e.source
    }
}

impl ModuleRegistry {
    /// Walk the modules selected by `target`, compare each against the
    /// `existing` snapshot, write its record and hand the change to `observer`.
    ///
    /// A module with no record for its uid is inserted (Install). A module
    /// whose uid is recorded at a different version has that record updated
    /// in place (Update). A module already recorded at its version is skipped
    /// and produces no event. The observer runs right after each write, and
    /// the first failure, from the store or the observer, ends the scan.
    pub async fn scan_and_install(
        &self,
        existing: &[ModuleRecordDto],
        store: &dyn ModuleRecordStore,
        target: &ScanTarget,
        observer: &dyn InstallObserver,
    ) -> std::result::Result<ScanReport, ScanError> {
        let mut report = ScanReport::default();
        let order = match resolve_install_order(self, target) {
            Ok(order) => order,
            Err(e) => {
                return Err(ScanError {
                    report,
                    source: e.into(),
                });
            }
        };

        if order.is_empty() {
            report.push_line("No modules to install".to_string());
            return Ok(report);
        }

        for descriptor in order {
            let heading = format!(
                "{} ({}) v{}",
                descriptor.display_name(),
                descriptor.uid,
                descriptor.version
            );

            let step = match existing.iter().find(|dto| dto.uid == descriptor.uid) {
                Some(dto) if dto.version == descriptor.version => {
                    log::debug!("Module {} already at v{}, skipping", descriptor.uid, descriptor.version);
                    report.push_line(format!("{}: skipped, already at this version", heading));
                    continue;
                }
                Some(dto) => update_record(store, descriptor, dto)
                    .await
                    .map(|()| (InstallOrUpdate::Update, format!("updated from v{}", dto.version))),
                None => insert_record(store, descriptor)
                    .await
                    .map(|()| (InstallOrUpdate::Install, "installed".to_string())),
            };

            let (decision, outcome) = match step {
                Ok(step) => step,
                Err(e) => {
                    report.push_line(format!("{}: failed: {}", heading, e));
                    return Err(ScanError { report, source: e });
                }
            };
            report.push_line(format!("{}: {}", heading, outcome));
            let event = InstallEvent {
                descriptor: descriptor.clone(),
                decision,
            };
            let observed = observer.on_installed(&event).await;
            report.events.push(event);
            if let Err(e) = observed {
                report.push_line(format!("{}: failed after {}: {}", heading, decision, e));
                return Err(ScanError { report, source: e });
            }
        }

        Ok(report)
    }
}

async fn update_record(
    store: &dyn ModuleRecordStore,
    descriptor: &ModuleDescriptor,
    recorded: &ModuleRecordDto,
) -> Result<()> {
    let uid = descriptor.uid.as_str();
    let mut record = store
        .find_one(&|r: &ModuleRecord| r.uid == uid)
        .await?
        .ok_or_else(|| StorageSystemError::RecordNotFound { uid: uid.to_string() })?;
    record.apply_update(descriptor, Utc::now());
    store.update(record).await?;
    log::info!("Updated module {} from v{} to v{}", uid, recorded.version, descriptor.version);
    Ok(())
}

async fn insert_record(store: &dyn ModuleRecordStore, descriptor: &ModuleDescriptor) -> Result<()> {
    store.insert(ModuleRecord::new(descriptor, Utc::now())).await?;
    log::info!("Installed module {} v{}", descriptor.uid, descriptor.version);
    Ok(())
}
