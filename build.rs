//! Build script for catalog-enricher
//!
//! Exposes BUILD_TIME, GIT_HASH and RUST_VERSION to the crate for
//! `--version` output and `build_info()`.

use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let build_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    emit("BUILD_TIME", build_time.to_string());
    emit("GIT_HASH", command_output("git", &["rev-parse", "--short", "HEAD"]));
    emit("RUST_VERSION", command_output("rustc", &["--version"]));

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");
}

fn emit(key: &str, value: String) {
    println!("cargo:rustc-env={}={}", key, value);
}

/// First line of a command's stdout, or "unknown" when it cannot be run
fn command_output(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .and_then(|stdout| stdout.lines().next().map(|l| l.trim().to_string()))
        .filter(|line| !line.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
