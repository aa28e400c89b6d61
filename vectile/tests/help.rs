use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn top_level_help() {
	Command::cargo_bin("vectile")
		.unwrap()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("render"));
}

#[test]
fn render_requires_config() {
	Command::cargo_bin("vectile")
		.unwrap()
		.args(["render", "10/551/341"])
		.assert()
		.failure();
}
