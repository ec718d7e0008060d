//! Atlantis settings read from a config's `locals` block
//!
//! Seven locals are recognised; every other key is ignored:
//!
//! | local                          | type            |
//! |--------------------------------|-----------------|
//! | `atlantis_workflow`            | string          |
//! | `atlantis_terraform_version`   | string          |
//! | `atlantis_autoplan`            | bool            |
//! | `atlantis_skip`                | bool            |
//! | `atlantis_apply_requirements`  | list of strings |
//! | `atlantis_project`             | bool            |
//! | `extra_atlantis_dependencies`  | list of strings |

use hcl::{Map, Value};
use serde::{Serialize, Serializer};

use crate::{Error, Result};

pub const WORKFLOW: &str = "atlantis_workflow";
pub const TERRAFORM_VERSION: &str = "atlantis_terraform_version";
pub const AUTOPLAN: &str = "atlantis_autoplan";
pub const SKIP: &str = "atlantis_skip";
pub const APPLY_REQUIREMENTS: &str = "atlantis_apply_requirements";
pub const PROJECT: &str = "atlantis_project";
pub const EXTRA_DEPENDENCIES: &str = "extra_atlantis_dependencies";

/// An optional flag: unset, or explicitly false or true.
///
/// Serialized as `null`, `false` or `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tristate {
    #[default]
    Unset,
    False,
    True,
}

impl Tristate {
    pub fn is_set(self) -> bool {
        self != Self::Unset
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::False => Some(false),
            Self::True => Some(true),
        }
    }

    /// `other` when it is set, otherwise `self`.
    pub fn overridden_by(self, other: Tristate) -> Tristate {
        if other.is_set() { other } else { self }
    }
}

impl From<bool> for Tristate {
    fn from(value: bool) -> Self {
        if value { Self::True } else { Self::False }
    }
}

impl From<Option<bool>> for Tristate {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Unset, Self::from)
    }
}

impl Serialize for Tristate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_bool().serialize(serializer)
    }
}

/// Effective Atlantis settings for one project directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedLocals {
    pub atlantis_workflow: Option<String>,

    /// Replaced as a whole when a child sets it
    pub apply_requirements: Option<Vec<String>>,

    /// Accumulated across the hierarchy, parent entries first
    pub extra_atlantis_dependencies: Vec<String>,

    pub auto_plan: Tristate,
    pub skip: Tristate,
    pub terraform_version: Option<String>,

    #[serde(skip)]
    marked_project: Tristate,
}

impl ResolvedLocals {
    /// Merge `child` into this record.
    ///
    /// - Scalars and flags: `child` wins when it sets a value
    /// - `apply_requirements`: replaced when `child` sets it, even to an empty list
    /// - `extra_atlantis_dependencies`: `child` entries are appended, duplicates kept
    pub fn merge(&mut self, child: &ResolvedLocals) {
        if child.atlantis_workflow.is_some() {
            self.atlantis_workflow = child.atlantis_workflow.clone();
        }
        if child.terraform_version.is_some() {
            self.terraform_version = child.terraform_version.clone();
        }
        self.auto_plan = self.auto_plan.overridden_by(child.auto_plan);
        self.skip = self.skip.overridden_by(child.skip);
        self.marked_project = self.marked_project.overridden_by(child.marked_project);

        if child.apply_requirements.is_some() {
            self.apply_requirements = child.apply_requirements.clone();
        }

        self.extra_atlantis_dependencies
            .extend(child.extra_atlantis_dependencies.iter().cloned());
    }

    /// The `atlantis_project` flag; only consulted by project classification.
    pub(crate) fn marked_project(&self) -> Tristate {
        self.marked_project
    }
}

/// Read the recognised locals out of an evaluated `locals` object.
///
/// `None` means the config has no `locals` block and yields the empty record.
/// A recognised key of the wrong type is an error; an empty string counts as
/// unset.
pub fn resolve_locals(locals: Option<&Value>) -> Result<ResolvedLocals> {
    let Some(locals) = locals else {
        return Ok(ResolvedLocals::default());
    };
    let Value::Object(map) = locals else {
        return Err(Error::LocalType {
            key: "locals".to_string(),
            expected: "an object",
        });
    };

    Ok(ResolvedLocals {
        atlantis_workflow: string_local(map, WORKFLOW)?,
        terraform_version: string_local(map, TERRAFORM_VERSION)?,
        auto_plan: flag_local(map, AUTOPLAN)?,
        skip: flag_local(map, SKIP)?,
        marked_project: flag_local(map, PROJECT)?,
        apply_requirements: apply_requirements(map)?,
        extra_atlantis_dependencies: extra_dependencies(map)?,
    })
}

fn present<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).filter(|value| !value.is_null())
}

fn string_local(map: &Map<String, Value>, key: &str) -> Result<Option<String>> {
    match present(map, key) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(type_error(key, "a string")),
    }
}

fn flag_local(map: &Map<String, Value>, key: &str) -> Result<Tristate> {
    match present(map, key) {
        None => Ok(Tristate::Unset),
        Some(Value::Bool(b)) => Ok(Tristate::from(*b)),
        Some(_) => Err(type_error(key, "a bool")),
    }
}

fn apply_requirements(map: &Map<String, Value>) -> Result<Option<Vec<String>>> {
    let Some(value) = present(map, APPLY_REQUIREMENTS) else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(type_error(APPLY_REQUIREMENTS, "a list of strings"));
    };
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(type_error(APPLY_REQUIREMENTS, "a list of strings")),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn extra_dependencies(map: &Map<String, Value>) -> Result<Vec<String>> {
    let Some(value) = present(map, EXTRA_DEPENDENCIES) else {
        return Ok(Vec::new());
    };
    let Value::Array(items) = value else {
        return Err(type_error(EXTRA_DEPENDENCIES, "a list of strings"));
    };
    items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::String(s) => Ok(s.replace('\\', "/")),
            _ => Err(Error::NonStringDependency { position }),
        })
        .collect()
}

fn type_error(key: &str, expected: &'static str) -> Error {
    Error::LocalType {
        key: key.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locals(source: &str) -> Value {
        hcl::from_str(source).unwrap()
    }

    #[test]
    fn marked_project_is_read_and_merged() {
        let parent = resolve_locals(Some(&locals("atlantis_project = true\n"))).unwrap();
        assert_eq!(parent.marked_project(), Tristate::True);

        let mut merged = parent.clone();
        merged.merge(&ResolvedLocals::default());
        assert_eq!(merged.marked_project(), Tristate::True);

        let child = resolve_locals(Some(&locals("atlantis_project = false\n"))).unwrap();
        merged.merge(&child);
        assert_eq!(merged.marked_project(), Tristate::False);
    }

    #[test]
    fn empty_workflow_counts_as_unset() {
        let resolved = resolve_locals(Some(&locals("atlantis_workflow = \"\"\n"))).unwrap();
        assert_eq!(resolved.atlantis_workflow, None);
    }

    #[test]
    fn tristate_serializes_as_optional_bool() {
        assert_eq!(serde_json::to_string(&Tristate::Unset).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Tristate::True).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Tristate::False).unwrap(), "false");
    }

    #[test]
    fn marked_project_is_not_serialized() {
        let resolved = resolve_locals(Some(&locals("atlantis_project = true\n"))).unwrap();
        let json = serde_json::to_value(&resolved).unwrap();
        assert!(json.get("marked_project").is_none());
    }
}
