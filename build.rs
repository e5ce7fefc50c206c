//! Build script for nutrack
//!
//! Stamps the binary with its version and build time. Writes nothing to the
//! source tree.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");

    let now = chrono::Utc::now();
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    println!("cargo:rustc-env=NUTRACK_BUILT_AT={}", now.format("%Y-%m-%dT%H:%M:%SZ"));
    println!(
        "cargo:rustc-env=NUTRACK_BUILD_ID={}+{}",
        version,
        now.format("%Y%m%d%H%M%S")
    );
}
