//! Build metadata
//!
//! Identity of the running server, reported by `nutrack_status` and the
//! startup banner.

use serde::Serialize;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `<version>+<UTC build time>`; falls back to the bare version when built
/// without the build script
pub const BUILD_ID: &str = match option_env!("NUTRACK_BUILD_ID") {
    Some(id) => id,
    None => VERSION,
};

pub const BUILT_AT: &str = match option_env!("NUTRACK_BUILT_AT") {
    Some(ts) => ts,
    None => "unknown",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_id: &'static str,
    pub built_at: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_id: BUILD_ID,
            built_at: BUILT_AT,
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "{name} {version} - calorie & protein goal tracker\n  build {id}, compiled {at}",
            name = self.name,
            version = self.version,
            id = self.build_id,
            at = self.built_at,
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_id_carries_version() {
        let info = BuildInfo::current();
        assert_eq!(info.name, "nutrack");
        assert!(info.build_id.starts_with(info.version));
        assert!(!info.built_at.is_empty());
    }

    #[test]
    fn test_banner_names_build() {
        let info = BuildInfo::current();
        let banner = info.banner();
        assert!(banner.starts_with("nutrack "));
        assert!(banner.contains(info.build_id));
    }
}
