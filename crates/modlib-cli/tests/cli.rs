//! End-to-end tests for the modlib CLI binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Isolated storage, pack and config locations for one test.
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        Self { temp_dir }
    }

    fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_modlib"));
        cmd.current_dir(self.root())
            .env("HOME", self.root())
            .env("XDG_CONFIG_HOME", self.root().join("config"))
            .env("MODLIB_STORAGE", self.root().join("storage"))
            .env("MODLIB_PACKS", self.root().join("packs"))
            .env_remove("MODLIB_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.cmd().args(args).output().expect("failed to run modlib")
    }

    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "modlib {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn fails(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(!output.status.success(), "modlib {args:?} should fail");
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    /// Create a mod with a file for `version`.
    fn publish(&self, id: &str, version: &str) {
        if !self.root().join("storage").join(id).exists() {
            self.ok(&["mod", "new", id]);
        }
        let jar = self.root().join(format!("{id}-{version}.jar"));
        std::fs::write(&jar, id).expect("failed to write jar");
        self.ok(&[
            "mod",
            "add-file",
            id,
            jar.to_str().unwrap(),
            "--version",
            version,
        ]);
    }

    fn member(&self, name: &str) -> PathBuf {
        self.root().join("out").join(format!("{name}.jar"))
    }
}

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let stdout = ctx.ok(&["--help"]);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_invalid_version_is_rejected() {
    let ctx = TestContext::new();
    ctx.ok(&["mod", "new", "a"]);
    let stderr = ctx.fails(&["mod", "add-file", "a", "a.jar", "--version", "1.20"]);
    assert!(stderr.contains("not a valid version"));
    let stderr = ctx.fails(&["pack", "new", "p", "out", "--version", "latest"]);
    assert!(stderr.contains("not a valid version"));
}

#[test]
fn test_mods_are_listed_sorted() {
    let ctx = TestContext::new();
    ctx.ok(&["mod", "new", "zeta"]);
    ctx.ok(&["mod", "new", "alpha"]);
    assert_eq!(ctx.ok(&["mods"]), "alpha\nzeta\n");

    let stderr = ctx.fails(&["mod", "new", "alpha"]);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_add_file_stores_and_links() {
    let ctx = TestContext::new();
    ctx.publish("a", "1.20.1");

    let dir = ctx.root().join("storage").join("a");
    assert!(dir.join("a-1.20.1.jar").is_file());
    assert!(!ctx.root().join("a-1.20.1.jar").exists());
    let link = dir.join("1.20.1.jar");
    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(ctx.ok(&["mod", "get", "a", "jar", "--version", "1.20.1"]), "a-1.20.1.jar\n");
}

#[test]
fn test_add_file_from_url_records_source() {
    let ctx = TestContext::new();
    ctx.ok(&["mod", "new", "jei"]);

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/files/jei-4.16.jar")
        .with_status(200)
        .with_body("remote archive")
        .create();
    let url = format!("{}/files/jei-4.16.jar", server.url());

    let output = ctx
        .cmd()
        .env("NO_PROXY", "*")
        .env("no_proxy", "*")
        .args(["mod", "add-file", "jei", "--url", &url, "--version", "1.12.2"])
        .output()
        .expect("failed to run modlib");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    mock.assert();

    let stored = ctx.root().join("storage").join("jei").join("jei-4.16.jar");
    assert_eq!(std::fs::read_to_string(stored).unwrap(), "remote archive");
    assert_eq!(ctx.ok(&["mod", "get", "jei", "url", "--version", "1.12.2"]), format!("{url}\n"));
    assert_eq!(
        ctx.ok(&["mod", "get", "jei", "jar", "--version", "1.12.2"]),
        "jei-4.16.jar\n"
    );
}

#[test]
fn test_get_and_set_attributes() {
    let ctx = TestContext::new();
    ctx.ok(&["mod", "new", "a"]);
    assert_eq!(ctx.ok(&["mod", "get", "a", "name"]), "a\n");

    ctx.ok(&["mod", "set", "a", "name", "Just Enough Items"]);
    ctx.ok(&["mod", "set", "a", "name", "JEI", "--version", "1.20.1"]);
    ctx.ok(&["mod", "set", "a", "side", r#"["client","server"]"#]);

    assert_eq!(ctx.ok(&["mod", "get", "a", "name"]), "Just Enough Items\n");
    assert_eq!(ctx.ok(&["mod", "get", "a", "name", "--version", "1.20.1"]), "JEI\n");
    assert_eq!(ctx.ok(&["mod", "get", "a", "name", "--version", "1.19.2"]), "Just Enough Items\n");
    assert_eq!(ctx.ok(&["mod", "get", "a", "side"]), "[\"client\",\"server\"]\n");

    let stderr = ctx.fails(&["mod", "get", "a", "homepage"]);
    assert!(stderr.contains("no attribute 'homepage'"));
}

#[test]
fn test_depend_requires_known_mods() {
    let ctx = TestContext::new();
    ctx.ok(&["mod", "new", "a"]);
    let stderr = ctx.fails(&["mod", "depend", "a", "ghost"]);
    assert!(stderr.contains("ghost is not in storage"));
}

#[test]
fn test_pack_lifecycle() {
    let ctx = TestContext::new();
    ctx.publish("lib", "1.20.1");
    ctx.publish("app", "1.20.1");
    ctx.ok(&["mod", "depend", "app", "lib"]);

    ctx.ok(&["pack", "new", "test", "out", "--version", "1.20.1"]);
    assert_eq!(ctx.ok(&["packs"]), "test\n");

    ctx.ok(&["pack", "add", "test", "app"]);
    assert!(ctx.member("app").exists());
    assert!(ctx.member("lib").exists());
    let listing = ctx.ok(&["pack", "list", "test"]);
    assert!(listing.contains("needed by app"));

    let stderr = ctx.fails(&["pack", "remove", "test", "lib"]);
    assert!(stderr.contains("lib is still required by app"));
    assert!(ctx.member("lib").exists());

    ctx.ok(&["pack", "remove", "test", "app"]);
    assert!(!ctx.member("app").exists());
    assert!(ctx.member("lib").exists());

    let stdout = ctx.ok(&["pack", "autoremove", "test"]);
    assert!(stdout.contains("Removed lib"));
    assert!(!ctx.member("lib").exists());
    assert!(ctx.ok(&["pack", "list", "test"]).contains("No mods"));
}

#[test]
fn test_pack_add_rejects_wrong_version() {
    let ctx = TestContext::new();
    ctx.publish("a", "1.20.1");
    ctx.ok(&["pack", "new", "old", "out", "--version", "1.19.2"]);

    let stderr = ctx.fails(&["pack", "add", "old", "a"]);
    assert!(stderr.contains("not available for version 1.19.2"));
}

#[test]
fn test_copy_mode() {
    let ctx = TestContext::new();
    ctx.publish("a", "1.20.1");
    ctx.ok(&["pack", "new", "test", "out", "--version", "1.20.1"]);
    ctx.ok(&["--copy", "pack", "add", "test", "a"]);

    let meta = std::fs::symlink_metadata(ctx.member("a")).unwrap();
    assert!(meta.file_type().is_file());
    assert_eq!(std::fs::read_to_string(ctx.member("a")).unwrap(), "a");
}

#[test]
fn test_config_file_sets_directories() {
    let ctx = TestContext::new();
    let config = ctx.root().join("modlib.toml");
    std::fs::write(&config, "[mods]\ndirectory = \"elsewhere\"\n").unwrap();

    let output = ctx
        .cmd()
        .env_remove("MODLIB_STORAGE")
        .env("MODLIB_CONFIG", &config)
        .args(["mod", "new", "a"])
        .output()
        .expect("failed to run modlib");
    assert!(output.status.success());
    assert!(ctx.root().join("elsewhere").join("a").join("mod.json").is_file());
}

#[test]
fn test_unknown_pack() {
    let ctx = TestContext::new();
    let stderr = ctx.fails(&["pack", "list", "missing"]);
    assert!(stderr.contains("pack 'missing' not found"));
}
