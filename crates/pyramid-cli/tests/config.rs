use pyramid_cli::config::AppConfig;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn load_from_file_reads_both_sections() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pyramid.toml");
    fs::write(
        &path,
        r#"
[data]
dir = "/srv/pyramid/data"

[server]
host = "0.0.0.0"
port = 8080
"#,
    )
    .unwrap();

    let cfg = AppConfig::resolve(Some(path.as_path())).unwrap();
    assert_eq!(cfg.data_path(), PathBuf::from("/srv/pyramid/data"));
    assert_eq!(
        cfg.socket_addr(),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080)
    );
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    let err = AppConfig::resolve(Some(dir.path().join("nope.toml").as_path())).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn malformed_toml_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[server\nport = ").unwrap();
    assert!(AppConfig::load_from_file(&path).is_err());
}
