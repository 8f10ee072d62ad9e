use serde::{Deserialize, Serialize};

use crate::ProjectConfig;

/// Names derived from the project's group and name, shared by build logic and templates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub main_package: String,
    pub entry_point_class: String,
    pub relocation_package: String,
    pub authors: Vec<String>,
    pub contributors: Vec<String>,
}

impl ProjectMetadata {
    /// Derive metadata from project properties. Returns `None` without both group and name.
    #[must_use]
    pub fn derive(project: &ProjectConfig) -> Option<Self> {
        let group = project.group.as_deref()?;
        let name = project.name.as_deref()?;
        let main_package = format!("{}.{}", group, name.to_lowercase());

        Some(Self {
            entry_point_class: format!("{main_package}.{name}"),
            relocation_package: format!("{main_package}.lib"),
            main_package,
            authors: split_people(project.authors.as_deref()),
            contributors: split_people(project.contributors.as_deref()),
        })
    }

    /// Main package as a relative source path ("io.github.user" -> "io/github/user")
    #[must_use]
    pub fn main_package_path(&self) -> String {
        self.main_package.replace('.', "/")
    }
}

fn split_people(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split([',', ' '])
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn project(group: Option<&str>, name: Option<&str>) -> ProjectConfig {
        ProjectConfig {
            group: group.map(str::to_string),
            name: name.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_derive_names() {
        let metadata =
            ProjectMetadata::derive(&project(Some("io.github.user"), Some("ExamplePlugin")))
                .unwrap();
        assert_eq!(metadata.main_package, "io.github.user.exampleplugin");
        assert_eq!(
            metadata.entry_point_class,
            "io.github.user.exampleplugin.ExamplePlugin"
        );
        assert_eq!(metadata.relocation_package, "io.github.user.exampleplugin.lib");
        assert_eq!(metadata.main_package_path(), "io/github/user/exampleplugin");
        assert!(metadata.authors.is_empty());
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("io.github.user"), None)]
    #[case(None, Some("ExamplePlugin"))]
    fn test_derive_requires_group_and_name(
        #[case] group: Option<&str>,
        #[case] name: Option<&str>,
    ) {
        assert!(ProjectMetadata::derive(&project(group, name)).is_none());
    }

    #[rstest]
    #[case(None, vec![])]
    #[case(Some(""), vec![])]
    #[case(Some("   "), vec![])]
    #[case(Some("alice"), vec!["alice"])]
    #[case(Some("alice, bob carol"), vec!["alice", "bob", "carol"])]
    #[case(Some(",alice,,bob ,"), vec!["alice", "bob"])]
    fn test_split_people(#[case] input: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(split_people(input), expected);
    }
}
