// Version information for the Fabstir Image Node

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-image-generation-2026-08-06";

/// Semantic version number
pub const VERSION_NUMBER: &str = "0.1.0";

/// Build date
pub const BUILD_DATE: &str = "2026-08-06";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "image-generation",
    "prompt-enhancement",
    "generation-history",
    "gpu-auto-precision",
    "startup-prewarm",
    "permissive-cors",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Image Node {} ({})", VERSION_NUMBER, BUILD_DATE)
}
