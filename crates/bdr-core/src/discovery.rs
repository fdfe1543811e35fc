//! Python package discovery for the descriptor's `packages` field.

use std::io;
use std::path::{Path, PathBuf};

use bdr_domain::ResourceError;
use glob::{Pattern, PatternError};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

const ALWAYS_EXCLUDED: [&str; 2] = ["ez_setup", "*__pycache__"];
const DEFAULT_EXCLUDED: [&str; 2] = ["tests", "tests.*"];

/// Finds importable packages under a source root.
pub trait PackageDiscovery {
    /// Dotted package names, sorted.
    ///
    /// # Errors
    ///
    /// Returns a [`ResourceError`] when the tree cannot be read.
    fn packages(&self, root: &Path) -> Result<Vec<String>, ResourceError>;
}

/// Walks the source tree: a directory is a package when it holds an
/// `__init__.py` and its parent is the root or another package.
///
/// Exclude patterns are matched against dotted package names, with `*`
/// spanning dots.
#[derive(Debug, Clone)]
pub struct SourceTreeDiscovery {
    exclude: Vec<Pattern>,
}

impl SourceTreeDiscovery {
    /// # Errors
    ///
    /// Returns the first exclude pattern that is not a valid glob.
    pub fn new<S: AsRef<str>>(exclude: &[S]) -> Result<Self, PatternError> {
        let exclude = ALWAYS_EXCLUDED
            .iter()
            .map(|pattern| Pattern::new(pattern))
            .chain(exclude.iter().map(|pattern| Pattern::new(pattern.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { exclude })
    }

    fn excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(name))
    }
}

impl Default for SourceTreeDiscovery {
    fn default() -> Self {
        Self::new(&DEFAULT_EXCLUDED).expect("built-in exclude patterns")
    }
}

impl PackageDiscovery for SourceTreeDiscovery {
    fn packages(&self, root: &Path) -> Result<Vec<String>, ResourceError> {
        let mut found = Vec::new();
        let walker = WalkDir::new(root)
            .follow_links(true)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(looks_like_package);
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                ResourceError::new(path, io::Error::from(err))
            })?;
            let Some(name) = dotted_name(root, entry.path()) else {
                continue;
            };
            if self.excluded(&name) {
                debug!(package = %name, "excluded from discovery");
                continue;
            }
            found.push(name);
        }
        found.sort();
        Ok(found)
    }
}

/// A fixed package list supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct FixedPackages(pub Vec<String>);

impl PackageDiscovery for FixedPackages {
    fn packages(&self, _root: &Path) -> Result<Vec<String>, ResourceError> {
        let mut packages = self.0.clone();
        packages.sort();
        Ok(packages)
    }
}

fn looks_like_package(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && !entry.file_name().to_string_lossy().contains('.')
        && entry.path().join("__init__.py").is_file()
}

fn dotted_name(root: &Path, path: &Path) -> Option<String> {
    let relative: PathBuf = path.strip_prefix(root).ok()?.to_path_buf();
    let parts: Vec<String> = relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn package(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).expect("create package dir");
        fs::write(dir.join("__init__.py"), "").expect("write __init__");
    }

    #[test]
    fn finds_nested_packages_and_skips_tests() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        package(root, "sanic");
        package(root, "sanic/http");
        package(root, "sanic/http/tls");
        package(root, "tests");
        package(root, "tests/http");
        fs::create_dir_all(root.join("sanic/pages/styles")).expect("data dir");
        fs::write(root.join("sanic/pages/styles/base.css"), "").expect("css");

        let found = SourceTreeDiscovery::default()
            .packages(root)
            .expect("discover");
        assert_eq!(found, vec!["sanic", "sanic.http", "sanic.http.tls"]);
    }

    #[test]
    fn packages_below_plain_directories_are_not_reached() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        package(root, "sanic");
        fs::create_dir_all(root.join("scripts")).expect("scripts");
        package(root, "scripts/helper");
        package(root, "sanic/__pycache__");
        package(root, "sanic.egg-info");

        let found = SourceTreeDiscovery::default()
            .packages(root)
            .expect("discover");
        assert_eq!(found, vec!["sanic"]);
    }

    #[test]
    fn fixed_packages_are_sorted() {
        let fixed = FixedPackages(vec!["sanic.http".to_string(), "sanic".to_string()]);
        assert_eq!(
            fixed.packages(Path::new(".")).expect("fixed"),
            vec!["sanic", "sanic.http"]
        );
    }

    #[test]
    fn exclude_patterns_span_dotted_names() {
        let discovery = SourceTreeDiscovery::default();
        assert!(discovery.excluded("tests"));
        assert!(!discovery.excluded("tests_helpers"));
        assert!(discovery.excluded("tests.unit"));
        assert!(discovery.excluded("tests.unit.deep"));
        assert!(discovery.excluded("sanic.__pycache__"));
        assert!(discovery.excluded("ez_setup"));
        assert!(!discovery.excluded("sanic.tests"));
    }

    #[test]
    fn custom_excludes_keep_the_fixed_ones() {
        let discovery = SourceTreeDiscovery::new(&["sanic.*"]).expect("patterns");
        assert!(discovery.excluded("sanic.http"));
        assert!(!discovery.excluded("sanic"));
        assert!(discovery.excluded("ez_setup"));
        assert!(!discovery.excluded("tests"));
        assert!(SourceTreeDiscovery::new(&["[unclosed"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_packages_are_discovered() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path().join("src");
        let outside = temp.path().join("vendored");
        package(&root, "sanic");
        package(&outside, "plugin");
        std::os::unix::fs::symlink(outside.join("plugin"), root.join("sanic").join("plugin"))
            .expect("symlink");

        let found = SourceTreeDiscovery::default()
            .packages(&root)
            .expect("discover");
        assert_eq!(found, vec!["sanic", "sanic.plugin"]);
    }
}
