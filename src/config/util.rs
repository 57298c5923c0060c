//! Configuration utility functions.

use std::path::{Component, Path, PathBuf};

/// Find `config_name` by searching upward from `start`.
///
/// An absolute `config_name` is returned as-is when it exists.
///
/// ```text
/// /home/user/docs/articles/    ← start
/// /home/user/docs/docweave.toml ← found
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Absolute form of `path` with `.` and `..` resolved, for comparing roots.
///
/// The longest existing ancestor is canonicalized, so a path that does not
/// exist yet still compares equal to its canonical siblings.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                clean.pop();
            }
            other => clean.push(other),
        }
    }

    let mut existing = clean.as_path();
    let mut missing = Vec::new();
    while !existing.exists() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name);
                existing = parent;
            }
            _ => return clean.clone(),
        }
    }

    let mut normalized = existing
        .canonicalize()
        .unwrap_or_else(|_| existing.to_path_buf());
    normalized.extend(missing.iter().rev());
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("docweave.toml"), "").unwrap();

        let found = find_config_file(Path::new("docweave.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("docweave.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(Path::new("no-such-config.toml"), dir.path()).is_none());
    }

    #[test]
    fn test_find_config_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(&path, Path::new("/")).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }

    #[test]
    fn test_resolve_against() {
        let base = Path::new("/site");
        assert_eq!(resolve_against(base, Path::new("docs")), PathBuf::from("/site/docs"));
        assert_eq!(resolve_against(base, Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_normalize_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        let base = dir.path().canonicalize().unwrap();

        assert_eq!(normalize_path(&dir.path().join("site/../docs")), base.join("docs"));
        assert_eq!(normalize_path(&dir.path().join("docs/./_site/a")), base.join("docs/_site/a"));
        assert!(normalize_path(&dir.path().join("docs/_site")).starts_with(base.join("docs")));
    }
}
