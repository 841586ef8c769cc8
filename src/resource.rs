//! Bundle resource lookup
//!
//! The kernel source ships next to the executable. Lookup order:
//!
//! 1. an explicit path (`--kernel` or `HELLO_OPENCL_KERNEL`), which must exist
//! 2. `<exe dir>/`, `<exe dir>/../Resources/` (macOS bundle), `<exe dir>/resources/`
//! 3. the crate's own `resources/` directory

use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::error::{Result, SquareError};

/// Environment variable that overrides the kernel source path
pub const KERNEL_PATH_ENV: &str = "HELLO_OPENCL_KERNEL";

/// Directories searched for bundle resources, in order
pub fn bundle_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(exe) = std::env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        dirs.push(exe_dir.to_path_buf());
        dirs.push(exe_dir.join("..").join("Resources"));
        dirs.push(exe_dir.join("resources"));
    }

    dirs.push(Path::new(env!("CARGO_MANIFEST_DIR")).join("resources"));
    dirs
}

/// Find `name` in the first directory of `dirs` that contains it
pub fn find_in(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter().map(|dir| dir.join(name)).find(|candidate| {
        let found = candidate.is_file();
        trace!("Resource candidate {} (found={})", candidate.display(), found);
        found
    })
}

/// Resolve a bundle resource
///
/// An explicit path is returned as-is when it exists and is an error
/// otherwise; it never falls back to the bundle search.
pub fn resolve(name: &str, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return if path.is_file() {
            debug!("Using explicit resource path {}", path.display());
            Ok(path.to_path_buf())
        } else {
            Err(SquareError::ResourceNotFound {
                name: name.to_string(),
                searched: vec![path.to_path_buf()],
            })
        };
    }

    let dirs = bundle_dirs();
    match find_in(&dirs, name) {
        Some(path) => {
            debug!("Resolved {} to {}", name, path.display());
            Ok(path)
        }
        None => {
            let searched: Vec<PathBuf> = dirs.iter().map(|d| d.join(name)).collect();
            debug!("{} not found, searched: {:?}", name, searched);
            Err(SquareError::ResourceNotFound {
                name: name.to_string(),
                searched,
            })
        }
    }
}

/// Read a resolved resource as text
pub fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| SquareError::ResourceRead {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_in_returns_first_match() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("kernel.cl"), "// first").unwrap();
        fs::write(second.path().join("kernel.cl"), "// second").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = find_in(&dirs, "kernel.cl").unwrap();
        assert_eq!(found, first.path().join("kernel.cl"));
    }

    #[test]
    fn test_find_in_skips_directories_without_file() {
        let empty = tempfile::tempdir().unwrap();
        let bundle = tempfile::tempdir().unwrap();
        fs::write(bundle.path().join("kernel.cl"), "").unwrap();

        let dirs = vec![empty.path().to_path_buf(), bundle.path().to_path_buf()];
        assert_eq!(
            find_in(&dirs, "kernel.cl"),
            Some(bundle.path().join("kernel.cl"))
        );
    }

    #[test]
    fn test_find_in_ignores_directory_named_like_resource() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("kernel.cl")).unwrap();

        assert_eq!(find_in(&[dir.path().to_path_buf()], "kernel.cl"), None);
    }

    #[test]
    fn test_resolve_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.cl");
        fs::write(&path, "__kernel void square() {}").unwrap();

        assert_eq!(resolve("kernel.cl", Some(&path)).unwrap(), path);
    }

    #[test]
    fn test_resolve_missing_explicit_path_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.cl");

        match resolve("kernel.cl", Some(&missing)) {
            Err(SquareError::ResourceNotFound { name, searched }) => {
                assert_eq!(name, "kernel.cl");
                assert_eq!(searched, vec![missing]);
            }
            other => panic!("expected ResourceNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_finds_shipped_kernel() {
        let path = resolve("kernel.cl", None).unwrap();
        let source = read_text(&path).unwrap();
        assert!(source.contains("__kernel void square"));
    }

    #[test]
    fn test_resolve_unknown_resource_lists_search_paths() {
        let err = resolve("does-not-exist.cl", None).unwrap_err();
        let SquareError::ResourceNotFound { searched, .. } = err else {
            panic!("expected ResourceNotFound");
        };
        assert!(!searched.is_empty());
        assert!(searched.iter().all(|p| p.ends_with("does-not-exist.cl")));
    }

    #[test]
    fn test_read_text_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(&dir.path().join("gone.cl")).unwrap_err();
        assert!(matches!(err, SquareError::ResourceRead { .. }));
    }
}
