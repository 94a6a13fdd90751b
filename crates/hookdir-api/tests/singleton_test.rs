//! Process-wide directory. Kept in its own test binary.

use hookdir_api::{get, initialize, DirectoryOptions};
use tempfile::TempDir;

#[test]
fn initialize_once_then_get() {
    assert!(get().is_err());

    let site = TempDir::new().unwrap();
    let first = initialize(DirectoryOptions {
        site_root: Some(site.path().to_path_buf()),
        config_toml: Some(String::new()),
        ..Default::default()
    })
    .unwrap();

    let other = TempDir::new().unwrap();
    let second = initialize(DirectoryOptions {
        site_root: Some(other.path().to_path_buf()),
        config_toml: Some(String::new()),
        ..Default::default()
    })
    .unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(std::sync::Arc::ptr_eq(&first, &get().unwrap()));
    assert_eq!(first.scan(), 0);
}
