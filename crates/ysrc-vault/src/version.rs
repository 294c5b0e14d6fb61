//! Vault API version compatibility.
//!
//! yVault V2 releases 0.3.2 through 0.3.4 are refused. Every other release
//! is accepted.

/// Vault API versions the yield source refuses to wrap.
pub const INCOMPATIBLE_API_VERSIONS: [&str; 3] = ["0.3.2", "0.3.3", "0.3.4"];

/// Return `true` if a vault reporting `api_version` can be wrapped.
pub fn is_compatible_api_version(api_version: &str) -> bool {
    !INCOMPATIBLE_API_VERSIONS.contains(&api_version.trim())
}
