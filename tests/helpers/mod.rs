#![allow(dead_code)] // each test crate uses only some of these

use std::path::Path;

use snapbox::cmd::{cargo_bin, Command};

/// Nothing listens here, so any request the binary makes fails fast instead of reaching GitHub.
pub const UNREACHABLE_API: &str = "http://127.0.0.1:9";

/// `release-tool` running in `dir`, isolated from any settings in the caller's environment.
pub fn release_tool(dir: &Path) -> Command {
    Command::new(cargo_bin!("release-tool"))
        .current_dir(dir)
        .env("GITHUB_API_URL", UNREACHABLE_API)
        .env("RUST_LOG", "info")
        .env_remove("GITHUB_TOKEN")
        .env_remove("CONFIG")
        .env_remove("FILE")
        .env_remove("RELEASE_BRANCH")
}

pub fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
