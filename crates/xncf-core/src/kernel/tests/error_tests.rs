use std::error::Error as StdError;
use std::path::PathBuf;

use crate::kernel::error::Error;
use crate::module_system::ModuleSystemError;
use crate::storage::StorageSystemError;

#[test]
fn test_subsystem_errors_convert() {
    let module: Error = ModuleSystemError::not_found("mod-x").into();
    let storage: Error = StorageSystemError::RecordNotFound { uid: "mod-x".into() }.into();

    assert!(module.as_module_error().is_some());
    assert!(module.as_storage_error().is_none());
    assert!(storage.as_storage_error().is_some());
    assert!(module.to_string().contains("mod-x"));
}

#[test]
fn test_io_error_keeps_path_and_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: Error = StorageSystemError::io(io, "load_snapshot", PathBuf::from("/tmp/store.json")).into();

    let message = err.to_string();
    assert!(message.contains("load_snapshot"));
    assert!(message.contains("/tmp/store.json"));
    let storage = err.source().expect("wrapped storage error");
    assert!(storage.source().is_some(), "io error is kept as the source");
}
