#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

pub const PIN: &str = "https://start.example.com/";
pub const MAIL: &str = "https://mail.example.com/inbox";
pub const SERDE: &str = "https://docs.rs/serde";
pub const NEWS: &str = "https://news.example.org/today";
pub const BLOG: &str = "https://blog.example.net/post";
pub const WIKI: &str = "https://wiki.example.io/home";

pub fn tabsweep_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_tabsweep"))
}

fn tab(title: &str, url: &str) -> Value {
	json!({ "title": title, "url": url })
}

/// Four windows; `PIN` leads each one, window 3 holds nothing else.
///
/// Classified list: 0 mail, 1 serde, 2 serde (dup of 1), 3 news (stale),
/// 4 mail (dup of 0), 5 blog, 6 wiki.
pub fn browser_state() -> Value {
	let fresh = "2999-01-01T00:00:00Z";
	let mut history = serde_json::Map::new();
	for url in [PIN, MAIL, SERDE, BLOG, WIKI] {
		history.insert(url.to_string(), json!(fresh));
	}
	history.insert(NEWS.to_string(), json!("2000-01-01T00:00:00Z"));

	json!({
		"windows": [
			{ "tabs": [tab("Start", PIN), tab("Inbox", MAIL), tab("serde", SERDE), tab("serde", SERDE), tab("News", NEWS)] },
			{ "tabs": [tab("Start", PIN), tab("Inbox", MAIL), tab("Blog", BLOG)] },
			{ "tabs": [tab("Start", PIN)] },
			{ "tabs": [tab("Start", PIN), tab("Wiki", WIKI)] },
		],
		"history": history,
	})
}

pub fn write_fixture(dir: &TempDir, state: &Value) -> PathBuf {
	let path = dir.path().join("browser.json");
	std::fs::write(&path, serde_json::to_string_pretty(state).unwrap()).expect("fixture should be written");
	path
}

pub fn read_fixture(path: &Path) -> Value {
	serde_json::from_str(&std::fs::read_to_string(path).expect("fixture should be readable")).expect("fixture should be json")
}

/// URLs per window in the fixture file.
pub fn window_urls(path: &Path) -> Vec<Vec<String>> {
	read_fixture(path)["windows"]
		.as_array()
		.expect("windows array")
		.iter()
		.map(|window| {
			window["tabs"]
				.as_array()
				.expect("tabs array")
				.iter()
				.map(|tab| tab["url"].as_str().unwrap_or_default().to_string())
				.collect()
		})
		.collect()
}

/// Runs the binary against `fixture` with JSON output and an isolated config.
pub fn run_json(dir: &TempDir, fixture: &Path, args: &[&str]) -> (bool, Value, String) {
	let config = dir.path().join("missing-config.json");
	let output = Command::new(tabsweep_binary())
		.current_dir(dir.path())
		.env_remove("TABSWEEP_LOG")
		.arg("-f")
		.arg("json")
		.arg("--config")
		.arg(&config)
		.arg("--fixture")
		.arg(fixture)
		.args(args)
		.output()
		.expect("failed to execute tabsweep");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str::<Value>(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	(output.status.success(), parsed, stderr)
}
