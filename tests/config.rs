use easy_mcp::config::ClientConfig;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = ClientConfig::default();
    assert_eq!(config.server.url, None);
    assert_eq!(config.pagination.max_pages(), Some(1000));
}

#[test]
fn test_load_yaml_config() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("easy-mcp.yaml");
    fs::write(
        &path,
        "server:\n  url: http://localhost:8080/sse\npagination:\n  max_pages: 25\n",
    )
    .unwrap();

    let config = ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.server.url.as_deref(), Some("http://localhost:8080/sse"));
    assert_eq!(config.pagination.max_pages(), Some(25));
}

#[test]
fn test_load_json_config_with_missing_sections() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("easy-mcp.json");
    fs::write(&path, r#"{"server": {"url": "http://example.com/sse"}}"#).unwrap();

    let config = ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.server.url.as_deref(), Some("http://example.com/sse"));
    assert_eq!(config.pagination.max_pages, 1000);
}

#[test]
fn test_zero_max_pages_means_unbounded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("easy-mcp.json");
    fs::write(&path, r#"{"pagination": {"max_pages": 0}}"#).unwrap();

    let config = ClientConfig::load_from(&path).unwrap();
    assert_eq!(config.pagination.max_pages(), None);
}

#[test]
fn test_invalid_config_reports_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{not json").unwrap();

    let err = ClientConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
}

#[test]
fn test_server_url_expands_env_vars() {
    std::env::set_var("EASY_MCP_TEST_PORT", "4242");
    let mut config = ClientConfig::default();
    config.server.url = Some("http://localhost:${EASY_MCP_TEST_PORT}/sse".to_string());

    assert_eq!(
        config.server_url().as_deref(),
        Some("http://localhost:4242/sse")
    );
}

#[test]
fn test_env_overrides_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("easy-mcp.json");
    fs::write(
        &path,
        r#"{"server": {"url": "http://file/sse"}, "pagination": {"max_pages": 5}}"#,
    )
    .unwrap();

    let mut config = ClientConfig::load_from(&path).unwrap();
    std::env::set_var("EASY_MCP_SERVER_URL", "http://env/sse");
    std::env::set_var("EASY_MCP_MAX_PAGES", "7");
    let applied = config.apply_env();
    std::env::remove_var("EASY_MCP_SERVER_URL");
    std::env::remove_var("EASY_MCP_MAX_PAGES");

    applied.unwrap();
    assert_eq!(config.server.url.as_deref(), Some("http://env/sse"));
    assert_eq!(config.pagination.max_pages(), Some(7));
}
