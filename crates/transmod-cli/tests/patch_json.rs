//! Integration tests for `transmod patch --json`.

use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::{tempdir, TempDir};

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "transmod-cli", "--bin", "transmod", "--"]);
    cmd.env_remove("TRANSMOD_CONFIG");
    cmd
}

/// Project transpiling `ui`, configured through `transmod.config.json`.
fn fixture(schema: &str) -> TempDir {
    let dir = tempdir().unwrap();
    let ui = dir.path().join("node_modules").join("ui");
    fs::create_dir_all(&ui).unwrap();
    fs::write(ui.join("index.js"), "export default 1;").unwrap();
    fs::write(
        dir.path().join("transmod.config.json"),
        json!({ "modules": ["ui"], "ruleSchema": schema }).to_string(),
    )
    .unwrap();
    dir
}

fn host_snapshot() -> serde_json::Value {
    json!({
        "isServer": false,
        "defaultLoaders": { "babel": { "loader": "next-babel-loader" } },
        "config": {
            "mode": "development",
            "resolve": { "symlinks": true },
            "externals": [{ "hook": "next-externals" }],
            "module": {
                "rules": [{
                    "oneOf": [{
                        "test": { "source": "\\.module\\.css$" },
                        "sideEffects": false,
                        "issuer": { "and": ["/app"] }
                    }]
                }]
            }
        }
    })
}

fn run_patch(dir: &Path, input: &serde_json::Value, extra: &[&str]) -> (serde_json::Value, bool) {
    let file = dir.join("host.json");
    fs::write(&file, input.to_string()).unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(dir)
        .arg("patch")
        .arg(&file)
        .args(extra)
        .output()
        .expect("Failed to run transmod patch");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout should be valid JSON ({e}): {stdout}"));
    (json, output.status.success())
}

#[test]
fn test_patch_webpack4() {
    let dir = fixture("webpack4");
    let (json, ok) = run_patch(dir.path(), &host_snapshot(), &[]);

    assert!(ok);
    assert_eq!(json["ok"], true);

    let config = &json["config"];
    assert_eq!(config["mode"], "development");
    assert_eq!(config["resolve"]["symlinks"], false);

    // Transpile rule appended with the babel loader under `loader`.
    let rules = config["module"]["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1]["test"]["source"], "\\.+(js|jsx|mjs|ts|tsx)$");
    assert_eq!(rules[1]["loader"]["loader"], "next-babel-loader");
    assert!(rules[1].get("use").is_none());
    assert_eq!(rules[1]["include"]["kind"], "in_directories");

    // Externals hook guarded.
    assert_eq!(config["externals"][0]["hook"], "next-externals");
    assert_eq!(config["externals"][0]["guard"].as_array().unwrap().len(), 1);

    // CSS rule patched, Sass rule missing.
    let issuer = &rules[0]["oneOf"][0]["issuer"];
    assert!(issuer.get("and").is_none());
    assert_eq!(issuer["or"][0], "/app");
    assert_eq!(issuer["not"][0]["kind"], "outside_directories");

    let warnings = json["report"]["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["code"], "SASS_RULE_NOT_FOUND");
    assert_eq!(json["report"]["guarded_externals"], 1);
}

#[test]
fn test_patch_webpack5_flag() {
    let dir = fixture("webpack4");
    let (json, ok) = run_patch(dir.path(), &host_snapshot(), &["--webpack5"]);

    assert!(ok);
    let rules = json["config"]["module"]["rules"].as_array().unwrap();
    assert_eq!(rules[1]["use"]["loader"], "next-babel-loader");
    assert!(rules[1].get("loader").is_none());
    assert_eq!(json["config"]["externals"][0]["schema"], "webpack5");
}

#[test]
fn test_patch_without_default_loaders() {
    let dir = fixture("webpack5");
    let (json, ok) = run_patch(dir.path(), &json!({ "config": {} }), &[]);

    assert!(!ok);
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "INCOMPATIBLE_HOST");
}

#[test]
fn test_patch_without_modules_is_noop() {
    let dir = tempdir().unwrap();
    let input = host_snapshot();
    let (json, ok) = run_patch(dir.path(), &input, &[]);

    assert!(ok);
    assert_eq!(json["config"], input["config"]);
    assert_eq!(json["report"]["warnings"], json!([]));
}

#[test]
fn test_patch_dev_middleware() {
    let dir = fixture("webpack5");
    let input = json!({ "watchOptions": { "ignored": ["**/.git/**"], "poll": 1000 } });
    let (json, ok) = run_patch(dir.path(), &input, &["--dev-middleware"]);

    assert!(ok);
    let ignored = json["config"]["watchOptions"]["ignored"].as_array().unwrap();
    assert_eq!(ignored.len(), 2);
    assert!(ignored[0].as_str().unwrap().starts_with('!'));
    assert!(ignored[0].as_str().unwrap().ends_with("node_modules/ui/**"));
    assert_eq!(ignored[1], "**/.git/**");
    assert_eq!(json["config"]["watchOptions"]["poll"], 1000);
}

#[test]
fn test_patch_invalid_input() {
    let dir = fixture("webpack4");
    let file = dir.path().join("host.json");
    fs::write(&file, "{ nope").unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(dir.path())
        .arg("patch")
        .arg(&file)
        .output()
        .expect("Failed to run transmod patch");

    assert!(!output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
    assert_eq!(json["error"]["code"], "INPUT_PARSE_FAILED");
}
