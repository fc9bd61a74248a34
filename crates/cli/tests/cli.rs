use assert_cmd::Command;
use predicates::prelude::*;

fn shelf() -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env_remove("PORT")
        .env_remove("MONGODB_URI")
        .env_remove("SHELF_ENV")
        .env("SHELF_CONFIG_DIR", "/nonexistent/shelf-config");
    cmd
}

#[test]
fn help_lists_subcommands() {
    shelf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_reflects_environment_overrides() {
    shelf()
        .arg("config")
        .env("SHELF__SERVER__PORT", "7070")
        .env("SHELF__DATABASE__BACKEND", "memory")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 7070"))
        .stdout(predicate::str::contains("\"backend\": \"memory\""));
}

#[test]
fn legacy_mongodb_uri_overrides_database_uri() {
    shelf()
        .arg("config")
        .env("MONGODB_URI", "mongodb://catalog.internal:27017")
        .assert()
        .success()
        .stdout(predicate::str::contains("mongodb://catalog.internal:27017"));
}

#[test]
fn seed_into_memory_storage() {
    shelf()
        .args(["seed", "--reset"])
        .env("SHELF__DATABASE__BACKEND", "memory")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 5 sample books"));
}

#[test]
fn unknown_environment_is_rejected() {
    shelf()
        .arg("config")
        .env("SHELF_ENV", "qa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment"));
}
