/// Application name
pub const APP_NAME: &str = "Xncf";

/// Application version
pub const APP_VERSION: &str = "0.1.0";

/// Uid of the core "service" module. Installed before the menu tree exists.
pub const SYSTEM_XNCF_MODULE_SERVICE_UID: &str = "00000000-0000-0000-0000-000000000000";

/// Uid of the core "admin areas" module. Installed before the menu tree exists.
pub const SYSTEM_XNCF_MODULE_AREAS_ADMIN_UID: &str = "00000000-0000-0000-0001-000000000001";

/// Menu order given to the service module's menu
pub const SERVICE_MODULE_MENU_ORDER: i32 = 160;

/// Menu order given to the admin areas module's menu
pub const AREAS_ADMIN_MODULE_MENU_ORDER: i32 = 150;

/// Name of the top-level menu every module menu hangs under
pub const EXTENSION_MODULES_MENU_NAME: &str = "Extension Modules";

/// Order of the top-level module menu when the platform seeds it
pub const EXTENSION_MODULES_MENU_ORDER: i32 = 100;

/// Icon used when a module declares none
pub const DEFAULT_MENU_ICON: &str = "fa fa-bars";

/// Order used for ordinary module menus
pub const DEFAULT_MENU_ORDER: i32 = 20;

/// Admin route that starts a module; the uid is appended as a query parameter
pub const MODULE_START_ROUTE: &str = "/Admin/XncfModule/Start/";

/// Role granted access to every freshly installed module menu
pub const ADMIN_ROLE_ID: &str = "1";
pub const ADMIN_ROLE_CODE: &str = "administrator";

/// Page size used when loading "all" installed module records
pub const RECORD_LISTING_PAGE_SIZE: usize = 999;
