use super::*;

#[test]
fn test_io_error_display_includes_path() {
    let error = StoreError::Io {
        path: PathBuf::from("state.json"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    assert_eq!(
        error.to_string(),
        "Failed to read reserved value state from \"state.json\": denied"
    );
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StoreError>();
}
