// crates/jt-cli/build.rs
use std::process::Command;

fn stdout_of(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    String::from_utf8(out.stdout).ok().map(|s| s.trim().to_string())
}

fn main() {
    // e.g. "0.1.0-3-gabc1234", or "source" outside a checkout
    let git_version = stdout_of("git", &["describe", "--tags", "--always", "--dirty"])
        .map(|s| s.trim_start_matches('v').to_string())
        .unwrap_or_else(|| "source".to_string());
    println!("cargo:rustc-env=GIT_VERSION={git_version}");

    let build_date = stdout_of("date", &["+%Y-%m-%d"]).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=BUILD_DATE={build_date}");

    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/tags");
}
