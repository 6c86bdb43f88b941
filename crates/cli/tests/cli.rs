use assert_cmd::Command;

fn cli(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("catalog-cli").unwrap();
    cmd.env("CATALOG_CONFIG_DIR", config_dir)
        .env("CATALOG_ENV", "local")
        .env_remove("PORT")
        .env_remove("MONGO_URI")
        .env_remove("MONGO_DB");
    cmd
}

#[test]
fn config_prints_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.toml"),
        "[database]\nname = \"shelf\"\n",
    )
    .unwrap();

    let output = cli(dir.path()).env("PORT", "4100").arg("config").output().unwrap();
    assert!(output.status.success());

    let settings: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["server"]["port"], 4100);
    assert_eq!(settings["database"]["name"], "shelf");
    assert_eq!(settings["database"]["collection"], "books");
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .env("CATALOG_ENV", "qa")
        .arg("config")
        .assert()
        .failure();
}

#[test]
fn ping_fails_on_malformed_uri() {
    let dir = tempfile::tempdir().unwrap();
    cli(dir.path())
        .env("MONGO_URI", "not-a-mongodb-uri")
        .arg("ping")
        .assert()
        .failure();
}
