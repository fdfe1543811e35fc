use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use pep508_rs::{MarkerEnvironment, MarkerTree, Requirement as PepRequirement, VersionOrUrl};
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::errors::ConfigurationError;

/// Normalize a distribution name: lowercase with `_` and `.` folded to `-`.
pub fn canonicalize_package_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace(['_', '.'], "-")
}

/// A single dependency specifier.
///
/// Two requirements name the same package when their normalized names match;
/// constraint and marker are attributes of that package entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    name: String,
    head: String,
    constraint: Option<String>,
    marker: Option<String>,
    marker_tree: Option<MarkerTree>,
}

impl Requirement {
    /// Parse a PEP 508 requirement string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidRequirement`] when `spec` is not a
    /// valid requirement.
    pub fn parse(spec: &str) -> Result<Self, ConfigurationError> {
        let trimmed = spec.trim();
        let parsed: PepRequirement = PepRequirement::from_str(trimmed).map_err(|err| {
            ConfigurationError::InvalidRequirement {
                spec: trimmed.to_string(),
                reason: err.to_string(),
            }
        })?;
        let (constraint, is_url) = match &parsed.version_or_url {
            Some(VersionOrUrl::VersionSpecifier(specifiers)) => {
                (Some(specifiers.to_string()), false)
            }
            Some(VersionOrUrl::Url(url)) => (Some(format!("@ {url}")), true),
            None => (None, false),
        };
        let constraint = constraint.filter(|value| !value.is_empty());
        let separator = parsed
            .marker
            .as_ref()
            .and_then(|_| marker_separator(trimmed, is_url));
        let (head, marker) = match separator {
            Some(idx) => (
                trimmed[..idx].trim().to_string(),
                Some(trimmed[idx + 1..].trim().to_string()),
            ),
            None => (trimmed.to_string(), None),
        };
        Ok(Self {
            name: canonicalize_package_name(&parsed.name.to_string()),
            head,
            constraint,
            marker,
            marker_tree: parsed.marker,
        })
    }

    /// Normalized package name; the identity of the requirement.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    #[must_use]
    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// The requirement text without its environment marker.
    #[must_use]
    pub fn without_marker(&self) -> &str {
        &self.head
    }

    /// Whether this requirement is installed on the given platform.
    #[must_use]
    pub fn applies_to(&self, marker_env: &MarkerEnvironment) -> bool {
        self.marker_tree
            .as_ref()
            .is_none_or(|tree| tree.evaluate(marker_env, &[]))
    }

    /// Render as a `Requires-Dist` value scoped to `extra`.
    #[must_use]
    pub fn for_extra(&self, extra: &str) -> String {
        match &self.marker {
            Some(marker) => format!("{}; ({marker}) and extra == \"{extra}\"", self.head),
            None => format!("{}; extra == \"{extra}\"", self.head),
        }
    }
}

/// Byte offset of the `;` that opens the marker. A URL runs to the next
/// whitespace, so after a URL only a `;` preceded by whitespace counts.
fn marker_separator(text: &str, after_url: bool) -> Option<usize> {
    text.char_indices()
        .filter(|&(_, ch)| ch == ';')
        .map(|(idx, _)| idx)
        .find(|&idx| !after_url || text[..idx].ends_with(char::is_whitespace))
}

impl FromStr for Requirement {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.marker {
            Some(marker) => write!(f, "{}; {marker}", self.head),
            None => f.write_str(&self.head),
        }
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An ordered list of requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequirementList(Vec<Requirement>);

impl RequirementList {
    /// Parse every spec in order. Duplicate names are kept.
    ///
    /// # Errors
    ///
    /// Returns the first parse failure.
    pub fn parse<S: AsRef<str>>(specs: &[S]) -> Result<Self, ConfigurationError> {
        specs
            .iter()
            .map(|spec| Requirement::parse(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Parse a list that must not name any package twice.
    ///
    /// # Errors
    ///
    /// Returns a parse failure or [`ConfigurationError::DuplicateRequirement`].
    pub fn parse_unique<S: AsRef<str>>(
        label: &str,
        specs: &[S],
    ) -> Result<Self, ConfigurationError> {
        let list = Self::parse(specs)?;
        list.ensure_unique(label)?;
        Ok(list)
    }

    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicateRequirement`] naming the first
    /// repeated package.
    pub fn ensure_unique(&self, label: &str) -> Result<(), ConfigurationError> {
        let mut seen = Vec::with_capacity(self.0.len());
        for req in &self.0 {
            if seen.contains(&req.name()) {
                return Err(ConfigurationError::DuplicateRequirement {
                    list: label.to_string(),
                    name: req.name().to_string(),
                });
            }
            seen.push(req.name());
        }
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Requirement::name).collect()
    }

    /// Look up a requirement by (unnormalized) package name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Requirement> {
        let target = canonicalize_package_name(name);
        self.0.iter().find(|req| req.name() == target)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// A copy without any entry for `req`'s package, or `None` when the
    /// package is not listed.
    #[must_use]
    pub fn without(&self, req: &Requirement) -> Option<Self> {
        if !self.contains(req.name()) {
            return None;
        }
        Some(Self(
            self.0
                .iter()
                .filter(|entry| entry.name() != req.name())
                .cloned()
                .collect(),
        ))
    }

    /// `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        Self(self.0.iter().chain(other.0.iter()).cloned().collect())
    }

    /// Merge lists into one entry per package.
    ///
    /// Each package keeps the position of its first occurrence; when the same
    /// package appears again with a different constraint or marker, the later
    /// entry replaces the earlier one.
    #[must_use]
    pub fn union_last_wins(lists: &[&Self]) -> Self {
        let mut merged: IndexMap<String, Requirement> = IndexMap::new();
        for req in lists.iter().flat_map(|list| list.iter()) {
            match merged.get_mut(req.name()) {
                Some(existing) => {
                    if *existing != *req {
                        warn!(
                            package = req.name(),
                            kept = %req,
                            dropped = %existing,
                            "conflicting requirements while merging extras; last one wins"
                        );
                    }
                    *existing = req.clone();
                }
                None => {
                    merged.insert(req.name().to_string(), req.clone());
                }
            }
        }
        Self(merged.into_values().collect())
    }
}

impl<'a> IntoIterator for &'a RequirementList {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Requirement>> for RequirementList {
    fn from(value: Vec<Requirement>) -> Self {
        Self(value)
    }
}
