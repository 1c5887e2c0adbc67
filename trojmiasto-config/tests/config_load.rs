use std::{fs, path::PathBuf};

use serial_test::serial;
use tempfile::TempDir;
use trojmiasto_config::{LogEncoding, TrojmiastoConfigLoader};

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
debug: true
http:
  timeout_secs: 30
cache:
  dir: "${SCRAPER_CACHE_DIR}"
log:
  format: json
  stderr: true
  "#;
    let p = write_yaml(&tmp, "trojmiasto.yaml", file_yaml);

    temp_env::with_var("SCRAPER_CACHE_DIR", Some("/tmp/trojmiasto-test-cache"), || {
        let config = TrojmiastoConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load scraper config");

        assert!(config.debug);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(
            config.cache.resolved_dir(),
            PathBuf::from("/tmp/trojmiasto-test-cache")
        );
        assert_eq!(config.log.format, LogEncoding::Json);
        assert!(config.log.stderr);
        // No explicit level, so the debug toggle decides.
        assert_eq!(config.log_filter(), "debug");
    });
}

#[test]
#[serial]
fn env_overlay_wins_over_file() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(&tmp, "trojmiasto.yaml", "debug: false\n");

    temp_env::with_var("TROJMIASTO__DEBUG", Some("true"), || {
        let config = TrojmiastoConfigLoader::new()
            .with_file(&p)
            .load()
            .expect("load scraper config");
        assert!(config.debug);
    });
}
