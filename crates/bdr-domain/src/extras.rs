use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::errors::ConfigurationError;
use crate::requirement::RequirementList;

/// The closed set of extras published by the package.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum ExtraGroup {
    Test,
    Dev,
    Docs,
    All,
    Ext,
    Http3,
}

impl ExtraGroup {
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownExtra`] for names outside the set.
    pub fn parse(name: &str) -> Result<Self, ConfigurationError> {
        name.trim()
            .parse()
            .map_err(|_| ConfigurationError::UnknownExtra {
                name: name.to_string(),
            })
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Requirement lists for every [`ExtraGroup`]; no group can be missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtrasMap {
    test: RequirementList,
    dev: RequirementList,
    docs: RequirementList,
    all: RequirementList,
    ext: RequirementList,
    http3: RequirementList,
}

impl ExtrasMap {
    #[must_use]
    pub fn from_fn(mut list_for: impl FnMut(ExtraGroup) -> RequirementList) -> Self {
        Self {
            test: list_for(ExtraGroup::Test),
            dev: list_for(ExtraGroup::Dev),
            docs: list_for(ExtraGroup::Docs),
            all: list_for(ExtraGroup::All),
            ext: list_for(ExtraGroup::Ext),
            http3: list_for(ExtraGroup::Http3),
        }
    }

    #[must_use]
    pub fn get(&self, group: ExtraGroup) -> &RequirementList {
        match group {
            ExtraGroup::Test => &self.test,
            ExtraGroup::Dev => &self.dev,
            ExtraGroup::Docs => &self.docs,
            ExtraGroup::All => &self.all,
            ExtraGroup::Ext => &self.ext,
            ExtraGroup::Http3 => &self.http3,
        }
    }

    /// Look up a group by its published name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownExtra`] for unrecognized names.
    pub fn by_name(&self, name: &str) -> Result<&RequirementList, ConfigurationError> {
        ExtraGroup::parse(name).map(|group| self.get(group))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExtraGroup, &RequirementList)> {
        ExtraGroup::iter().map(move |group| (group, self.get(group)))
    }
}

impl Serialize for ExtrasMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ExtraGroup::iter().len()))?;
        for (group, list) in self.iter() {
            map.serialize_entry(group.as_str(), list)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names_round_trip() {
        let names: Vec<&str> = ExtraGroup::iter().map(ExtraGroup::as_str).collect();
        assert_eq!(names, vec!["test", "dev", "docs", "all", "ext", "http3"]);
        assert_eq!(ExtraGroup::parse("http3"), Ok(ExtraGroup::Http3));
        assert_eq!(ExtraGroup::Docs.to_string(), "docs");
    }

    #[test]
    fn unknown_group_names_are_rejected() {
        assert_eq!(
            ExtraGroup::parse("tests"),
            Err(ConfigurationError::UnknownExtra {
                name: "tests".to_string()
            })
        );
        let extras = ExtrasMap::from_fn(|_| RequirementList::default());
        assert!(extras.by_name("doc").is_err());
        assert!(extras.by_name("docs").is_ok());
    }

    #[test]
    fn serializes_every_group_in_declaration_order() {
        let extras = ExtrasMap::from_fn(|group| {
            RequirementList::parse(&[format!("pkg-{}", group.as_str())]).expect("parse")
        });
        let rendered = serde_json::to_string(&extras).expect("json");
        assert_eq!(
            rendered,
            r#"{"test":["pkg-test"],"dev":["pkg-dev"],"docs":["pkg-docs"],"all":["pkg-all"],"ext":["pkg-ext"],"http3":["pkg-http3"]}"#
        );
    }
}
