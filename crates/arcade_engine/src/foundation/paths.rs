//! Resource path resolution
//!
//! Games are started both from the workspace root (`cargo run`) and from an
//! installed directory. Relative resource paths are tried against the working
//! directory first, then against the directory holding the executable.

use std::path::{Path, PathBuf};

/// Resolve a resource path
///
/// Absolute paths are returned unchanged. If the path exists in neither
/// location it is returned as given, so the caller's "not found" message
/// names the path the user configured.
pub fn resolve_resource(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(path)));

    match beside_exe {
        Some(candidate) if candidate.exists() => candidate,
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let absolute = dir.path().join("nothing_here.png");
        assert_eq!(resolve_resource(&absolute), absolute);
    }

    #[test]
    fn test_unresolvable_path_returned_as_given() {
        let relative = Path::new("assets/definitely/not/here.ttf");
        assert_eq!(resolve_resource(relative), relative);
    }

    #[test]
    fn test_existing_relative_path() {
        // Cargo runs unit tests from the package root
        assert_eq!(resolve_resource("Cargo.toml"), PathBuf::from("Cargo.toml"));
    }
}
