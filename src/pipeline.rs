//! Config mutation pipeline over the environment repository's declarative
//! files.
//!
//! Three on-disk representations are supported: the legacy dependency
//! manifest, the flat app registry, and kpt package overlays. Each entry
//! point loads one representation, hands it to a caller-supplied mutation
//! together with the [`PullRequestDetails`] accumulator, and saves it back
//! only when the mutation reports a change. A representation with no
//! matching files returns `Ok(None)` so the caller can try the next one.
//!
//! Saves are atomic only at the file level; the orchestrator relies on
//! source-control state, not transactional I/O, for all-or-nothing
//! semantics.
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    forge::types::PullRequestDetails,
    manifest::{apps::AppRegistry, dependencies::DependencyManifest},
    result::Result,
};

/// Marker file of a kpt package directory.
pub const KPT_FILE: &str = "Kptfile";

/// Mutation over the legacy dependency manifest. `dir` is the directory the
/// manifest was loaded from, for mutations that materialize files next to
/// it.
pub trait DependencyMutation {
    fn apply(
        &self,
        manifest: &mut DependencyManifest,
        dir: &Path,
        details: &mut PullRequestDetails,
    ) -> Result<bool>;
}

/// Mutation over the flat app registry.
pub trait AppMutation {
    fn apply(
        &self,
        registry: &mut AppRegistry,
        dir: &Path,
        details: &mut PullRequestDetails,
    ) -> Result<bool>;
}

/// Mutation over kpt packages. `packages` are package directories relative
/// to `dir`.
pub trait OverlayMutation {
    fn apply(
        &self,
        packages: &[PathBuf],
        dir: &Path,
        details: &mut PullRequestDetails,
    ) -> Result<bool>;
}

/// Applies `mutation` to the dependency manifest in `dir`. `Ok(None)` when
/// no manifest file exists.
pub fn modify_dependency_manifest(
    dir: &Path,
    mutation: &dyn DependencyMutation,
    details: &mut PullRequestDetails,
) -> Result<Option<bool>> {
    let Some((mut manifest, path)) = DependencyManifest::load(dir)? else {
        return Ok(None);
    };

    let changed = mutation.apply(&mut manifest, dir, details)?;
    if changed {
        manifest.save(&path)?;
    }
    Ok(Some(changed))
}

/// Applies `mutation` to the app registry in `dir`. `Ok(None)` when no
/// registry file exists.
pub fn modify_app_registry(
    dir: &Path,
    mutation: &dyn AppMutation,
    details: &mut PullRequestDetails,
) -> Result<Option<bool>> {
    let Some((mut registry, path)) = AppRegistry::load(dir)? else {
        return Ok(None);
    };

    let changed = mutation.apply(&mut registry, dir, details)?;
    if changed {
        registry.save(&path)?;
    }
    Ok(Some(changed))
}

/// Finds kpt packages named `name` under `dir/search_path` and hands their
/// relative paths to `mutation`. `Ok(None)` when no packages match.
pub fn modify_overlay(
    dir: &Path,
    search_path: &str,
    name: &str,
    mutation: &dyn OverlayMutation,
    details: &mut PullRequestDetails,
) -> Result<Option<bool>> {
    let root = if search_path.is_empty() {
        dir.to_path_buf()
    } else {
        dir.join(search_path)
    };

    let mut packages = vec![];
    if root.is_dir() {
        find_kpt_packages(&root, dir, name, &mut packages)?;
    }
    if packages.is_empty() {
        return Ok(None);
    }

    let changed = mutation.apply(&packages, dir, details)?;
    Ok(Some(changed))
}

fn find_kpt_packages(
    current: &Path,
    repo_dir: &Path,
    name: &str,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(current)?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if entry.file_name() == name
            && path.join(KPT_FILE).exists()
            && let Ok(rel) = path.strip_prefix(repo_dir)
        {
            out.push(rel.to_path_buf());
        }
        find_kpt_packages(&path, repo_dir, name, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::dependencies::DEPENDENCIES_FILE;
    use std::cell::Cell;

    struct RecordingDependencyMutation {
        called: Cell<bool>,
        report_changed: bool,
    }

    impl DependencyMutation for RecordingDependencyMutation {
        fn apply(
            &self,
            manifest: &mut DependencyManifest,
            _dir: &Path,
            details: &mut PullRequestDetails,
        ) -> Result<bool> {
            self.called.set(true);
            if self.report_changed {
                if let Some(dep) = manifest.find("bar", "") {
                    dep.version = "2.0.0".to_string();
                }
                details.body.push_str("* bar from 1.0.0 to 2.0.0\n");
            }
            Ok(self.report_changed)
        }
    }

    fn manifest_yaml() -> &'static str {
        concat!(
            "dependencies:\n",
            "- name: bar\n",
            "  version: 1.0.0\n",
            "  repository: https://charts.example.com\n",
        )
    }

    #[test]
    fn absent_manifest_is_not_this_representation() {
        let dir = tempfile::tempdir().unwrap();
        let mutation = RecordingDependencyMutation {
            called: Cell::new(false),
            report_changed: true,
        };
        let mut details = PullRequestDetails::default();

        let outcome =
            modify_dependency_manifest(dir.path(), &mutation, &mut details)
                .unwrap();
        assert!(outcome.is_none());
        assert!(!mutation.called.get());
    }

    #[test]
    fn unchanged_manifest_is_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEPENDENCIES_FILE);
        fs::write(&path, manifest_yaml()).unwrap();
        let mutation = RecordingDependencyMutation {
            called: Cell::new(false),
            report_changed: false,
        };
        let mut details = PullRequestDetails::default();

        let outcome =
            modify_dependency_manifest(dir.path(), &mutation, &mut details)
                .unwrap();
        assert_eq!(outcome, Some(false));
        assert!(mutation.called.get());
        assert_eq!(fs::read_to_string(&path).unwrap(), manifest_yaml());
    }

    #[test]
    fn changed_manifest_is_saved_and_details_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEPENDENCIES_FILE);
        fs::write(&path, manifest_yaml()).unwrap();
        let mutation = RecordingDependencyMutation {
            called: Cell::new(false),
            report_changed: true,
        };
        let mut details = PullRequestDetails::default();

        let outcome =
            modify_dependency_manifest(dir.path(), &mutation, &mut details)
                .unwrap();
        assert_eq!(outcome, Some(true));
        assert!(fs::read_to_string(&path).unwrap().contains("2.0.0"));
        assert!(details.body.contains("* bar from 1.0.0 to 2.0.0"));
    }

    struct RecordingOverlayMutation {
        seen: std::cell::RefCell<Vec<PathBuf>>,
    }

    impl OverlayMutation for RecordingOverlayMutation {
        fn apply(
            &self,
            packages: &[PathBuf],
            _dir: &Path,
            _details: &mut PullRequestDetails,
        ) -> Result<bool> {
            self.seen.borrow_mut().extend(packages.iter().cloned());
            Ok(true)
        }
    }

    #[test]
    fn finds_nested_kpt_packages_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for pkg in ["apps/bar", "system/nested/bar"] {
            let path = dir.path().join(pkg);
            fs::create_dir_all(&path).unwrap();
            fs::write(path.join(KPT_FILE), "apiVersion: kpt.dev/v1\n").unwrap();
        }
        // same name but no Kptfile, and a Kptfile under another name
        fs::create_dir_all(dir.path().join("plain/bar")).unwrap();
        let other = dir.path().join("apps/other");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join(KPT_FILE), "apiVersion: kpt.dev/v1\n").unwrap();

        let mutation = RecordingOverlayMutation {
            seen: Default::default(),
        };
        let mut details = PullRequestDetails::default();
        let outcome =
            modify_overlay(dir.path(), "", "bar", &mutation, &mut details)
                .unwrap();

        assert_eq!(outcome, Some(true));
        let seen = mutation.seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.contains(&PathBuf::from("apps/bar")));
        assert!(seen.contains(&PathBuf::from("system/nested/bar")));
    }

    #[test]
    fn no_matching_packages_is_not_this_representation() {
        let dir = tempfile::tempdir().unwrap();
        let mutation = RecordingOverlayMutation {
            seen: Default::default(),
        };
        let mut details = PullRequestDetails::default();
        let outcome =
            modify_overlay(dir.path(), "", "bar", &mutation, &mut details)
                .unwrap();
        assert!(outcome.is_none());
    }
}
