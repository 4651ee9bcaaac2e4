//! Canonical chart coordinates resolved from partial caller input.
//!
//! A chart may be referenced as `"name"`, `"prefix/name"`, or a filesystem
//! path; callers may or may not know its repository URL. [`ChartCoordinates`]
//! is the fully-resolved form the promotion rules operate on. The invariant
//! throughout: when `prefix` is non-empty, `name == "{prefix}/{local_name}"`.
use std::collections::BTreeMap;

use crate::manifest::RepositoryRef;

/// Fully-resolved chart coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartCoordinates {
    /// Canonical name, prefixed when an alias is known (`"stable/bar"`).
    pub name: String,
    /// Repository alias, empty when none was resolved.
    pub prefix: String,
    /// Chart name without any prefix.
    pub local_name: String,
    /// Repository URL, empty for local filesystem charts.
    pub repository: String,
}

impl ChartCoordinates {
    /// Ensure the coordinates carry a prefix, allocating an alias in the
    /// given repository list when necessary.
    ///
    /// No-op when a prefix is already set. Otherwise the alias is resolved in
    /// order: an existing alias for this repository URL, the `desired` alias
    /// when unused, else `desired2`, `desired3`, … probing ascending
    /// integers. When the repository URL is not yet listed, a new entry is
    /// appended. Finally the chart name is rewritten to carry the alias.
    ///
    /// The name rewrite must happen at most once per coordinates value,
    /// which is why it is private to this type and only reachable through
    /// the prefix guard above.
    pub fn default_prefix(
        &mut self,
        repositories: &mut Vec<RepositoryRef>,
        desired: &str,
    ) {
        if !self.prefix.is_empty() {
            return;
        }

        let mut found = false;
        let mut urls: BTreeMap<String, String> = BTreeMap::new();
        let mut prefixes: BTreeMap<String, String> = BTreeMap::new();
        for r in repositories.iter() {
            if r.url == self.repository {
                found = true;
            }
            if !r.name.is_empty() {
                urls.insert(r.url.clone(), r.name.clone());
                prefixes.insert(r.name.clone(), r.url.clone());
            }
        }

        let mut prefix =
            urls.get(&self.repository).cloned().unwrap_or_default();
        if prefix.is_empty() {
            if !prefixes.contains_key(desired) {
                prefix = desired.to_string();
            } else {
                // the desired alias maps to another URL, probe numbered
                // variants until a free one turns up
                let mut i = 2;
                loop {
                    let candidate = format!("{desired}{i}");
                    if !prefixes.contains_key(&candidate) {
                        prefix = candidate;
                        break;
                    }
                    i += 1;
                }
            }
        }

        if !found {
            repositories.push(RepositoryRef {
                name: prefix.clone(),
                url: self.repository.clone(),
            });
        }

        self.apply_prefix(&prefix);
    }

    fn apply_prefix(&mut self, value: &str) {
        self.prefix = value.to_string();
        self.name = format!("{}/{}", value, self.name);
    }
}
