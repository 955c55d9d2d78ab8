use super::{reports, Harness};

use crate::kernel::constants;
use crate::module_system::{InstallOrUpdate, ModuleDescriptor, ModuleSystemError};
use crate::storage::InstallerConfig;

#[tokio::test]
async fn test_install_menu_uses_bootstrap_orders() {
    let service = ModuleDescriptor::new(constants::SYSTEM_XNCF_MODULE_SERVICE_UID, "1.0", "System Service");
    let areas = ModuleDescriptor::new(constants::SYSTEM_XNCF_MODULE_AREAS_ADMIN_UID, "1.0", "Admin Areas");
    let (harness, _top) = Harness::seeded(vec![service.clone(), areas.clone()]).await;
    let menus = harness.installer.menu_synchronizer();

    let service_menu = menus
        .install_menu(&service, InstallOrUpdate::Update)
        .await
        .expect("service menu");
    let areas_menu = menus.install_menu(&areas, InstallOrUpdate::Update).await.expect("areas menu");

    assert_eq!(service_menu.order, 160);
    assert_eq!(areas_menu.order, 150);
}

#[tokio::test]
async fn test_install_menu_keeps_declared_icon() {
    let descriptor = reports("1.0").with_icon("fa fa-area-chart");
    let (harness, _top) = Harness::seeded(vec![descriptor.clone()]).await;
    harness.installer.install_all().await.expect("install record");

    let menu = harness
        .installer
        .menu_synchronizer()
        .find_menu(
            harness.store.snapshot().await.modules[0]
                .menu_id
                .as_deref()
                .expect("linked"),
        )
        .await
        .expect("lookup")
        .expect("menu exists");

    assert_eq!(menu.icon.as_deref(), Some("fa fa-area-chart"));
}

#[tokio::test]
async fn test_empty_icon_falls_back_to_default() {
    let descriptor = reports("1.0").with_icon("");
    let (harness, _top) = Harness::seeded(vec![descriptor.clone()]).await;

    let menu = harness
        .installer
        .menu_synchronizer()
        .install_menu(&descriptor, InstallOrUpdate::Update)
        .await
        .expect("menu");

    assert_eq!(menu.icon.as_deref(), Some(constants::DEFAULT_MENU_ICON));
}

#[tokio::test]
async fn test_update_without_existing_child_creates_node_without_grant() {
    let (harness, top) = Harness::seeded(vec![reports("2.0")]).await;

    let menu = harness
        .installer
        .menu_synchronizer()
        .install_menu(&reports("2.0"), InstallOrUpdate::Update)
        .await
        .expect("menu");

    assert_eq!(menu.parent_id.as_deref(), Some(top.id.as_str()));
    assert_eq!(menu.order, constants::DEFAULT_MENU_ORDER);
    let snapshot = harness.store.snapshot().await;
    assert_eq!(snapshot.menus.len(), 2);
    assert!(snapshot.permissions.is_empty());
}

#[tokio::test]
async fn test_missing_top_menu_is_reported_by_name() {
    let config = InstallerConfig {
        top_menu_name: "Plugins".to_string(),
        ..InstallerConfig::default()
    };
    let harness = Harness::unseeded(vec![reports("1.0")], config);
    harness.store.seed_top_menu(constants::EXTENSION_MODULES_MENU_NAME, 100).await;

    let err = harness
        .installer
        .menu_synchronizer()
        .install_menu(&reports("1.0"), InstallOrUpdate::Install)
        .await
        .expect_err("configured top menu does not exist");

    assert!(matches!(
        err.as_module_error(),
        Some(ModuleSystemError::MenuNotFound { name }) if name == "Plugins"
    ));
    assert_eq!(harness.store.snapshot().await.menus.len(), 1);
}

#[tokio::test]
async fn test_install_menu_links_record_and_grants_once() {
    let (harness, _top) = Harness::seeded(vec![reports("1.0")]).await;
    let menus = harness.installer.menu_synchronizer();
    harness.installer.install_module("mod-x").await.expect("install");

    // A later Update must not add a second grant
    let menu = menus
        .install_menu(&reports("1.0"), InstallOrUpdate::Update)
        .await
        .expect("refresh");

    let snapshot = harness.store.snapshot().await;
    assert_eq!(snapshot.permissions.len(), 1);
    assert_eq!(snapshot.modules[0].menu_id.as_deref(), Some(menu.id.as_str()));
}

#[tokio::test]
async fn test_update_takes_declared_icon_as_is() {
    let (harness, _top) = Harness::seeded(vec![reports("1.0").with_icon("fa fa-file")]).await;
    harness.installer.install_module("mod-x").await.expect("install");
    let menus = harness.installer.menu_synchronizer();

    let menu = menus
        .install_menu(&reports("2.0"), InstallOrUpdate::Update)
        .await
        .expect("refresh");

    assert_eq!(menu.icon, None, "an update without an icon clears it");
    assert_eq!(menu.order, constants::DEFAULT_MENU_ORDER);
}
