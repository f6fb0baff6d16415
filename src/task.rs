//! @ai:module:intent Bundled shared-task definitions with their expected message identifiers
//! @ai:module:layer domain
//! @ai:module:public_api TaskDefinition, TaskRegistry, registry, lookup
//! @ai:module:depends_on error
//! @ai:module:stateless false
//! @ai:module:thread_safe true

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// (name, description, identifier list) for every bundled task.
/// A resource carrying a `# placeholder` line does not hold the official ids.
const BUNDLED_TASKS: &[(&str, &str, &str)] = &[
    (
        "clpsych16",
        "CLPsych 2016 forum post triage, test split",
        include_str!("../resources/tasks/clpsych16.txt"),
    ),
    (
        "clpsych17",
        "CLPsych 2017 forum post triage, test split",
        include_str!("../resources/tasks/clpsych17.txt"),
    ),
];

/// @ai:intent A named shared task and the identifiers a submission for it must cover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub name: String,
    pub description: String,
    /// The id list is a stand-in, not the official test split.
    pub placeholder: bool,
    ids: BTreeSet<String>,
}

impl TaskDefinition {
    /// @ai:intent Build a task definition from an explicit identifier set
    /// @ai:effects pure
    pub fn new<I, S>(name: &str, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            description: String::new(),
            placeholder: false,
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// @ai:intent Build a task definition from a bundled id list resource
    /// @ai:effects pure
    /// @ai:edge_cases `#` comment lines and blank lines are ignored
    fn from_resource(name: &str, description: &str, resource: &str) -> Self {
        let placeholder = resource
            .lines()
            .any(|line| line.trim().eq_ignore_ascii_case("# placeholder"));
        let ids = resource
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        Self {
            description: description.to_string(),
            placeholder,
            ..Self::new(name, ids)
        }
    }

    /// @ai:intent Expected identifiers, in sorted order
    pub fn ids(&self) -> &BTreeSet<String> {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// @ai:intent Read-only table of bundled task definitions
#[derive(Debug)]
pub struct TaskRegistry {
    tasks: Vec<TaskDefinition>,
}

impl TaskRegistry {
    /// @ai:intent Load every bundled task definition
    /// @ai:effects pure
    fn bundled() -> Self {
        let tasks: Vec<_> = BUNDLED_TASKS
            .iter()
            .map(|(name, description, resource)| {
                TaskDefinition::from_resource(name, description, resource)
            })
            .collect();

        for task in &tasks {
            tracing::debug!("Loaded task {} with {} expected ids", task.name, task.len());
        }

        Self { tasks }
    }

    /// @ai:intent Find a task by name, ignoring case
    /// @ai:effects pure
    pub fn get(&self, name: &str) -> Option<&TaskDefinition> {
        self.tasks
            .iter()
            .find(|task| task.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn names(&self) -> Vec<String> {
        self.tasks.iter().map(|task| task.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskDefinition> {
        self.tasks.iter()
    }
}

/// @ai:intent Process-wide registry, initialised on first use
/// @ai:effects pure
pub fn registry() -> &'static TaskRegistry {
    static REGISTRY: OnceLock<TaskRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TaskRegistry::bundled)
}

/// @ai:intent Resolve a task name against the bundled registry
/// @ai:effects pure
pub fn lookup(name: &str) -> Result<&'static TaskDefinition> {
    let registry = registry();

    let task = registry.get(name).ok_or_else(|| Error::UnknownTask {
        name: name.to_string(),
        known: registry.names(),
    })?;

    if task.placeholder {
        tracing::warn!(
            "Task {} uses placeholder ids, not the official test split",
            task.name
        );
    }

    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_tasks_present() {
        let names = registry().names();
        assert!(names.contains(&"clpsych16".to_string()));
        assert!(names.contains(&"clpsych17".to_string()));

        for task in registry().iter() {
            assert!(!task.is_empty(), "{} has no ids", task.name);
            assert!(!task.description.is_empty());
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        let task = lookup("CLPsych16").unwrap();
        assert_eq!(task.name, "clpsych16");
    }

    #[test]
    fn test_lookup_unknown_lists_known_tasks() {
        match lookup("clpsych99") {
            Err(Error::UnknownTask { name, known }) => {
                assert_eq!(name, "clpsych99");
                assert_eq!(known.len(), BUNDLED_TASKS.len());
            }
            other => panic!("expected unknown task error, got {:?}", other),
        }
    }

    #[test]
    fn test_resource_skips_comments_and_blanks() {
        let task = TaskDefinition::from_resource("t", "test", "# header\n\n67\n 68 \n#76\n");
        assert_eq!(task.len(), 2);
        assert!(task.contains("67"));
        assert!(task.contains("68"));
        assert!(!task.contains("76"));
    }

    #[test]
    fn test_placeholder_marker_flags_task() {
        let marked = TaskDefinition::from_resource("t", "test", "# placeholder\n67\n");
        let official = TaskDefinition::from_resource("t", "test", "# official list\n67\n");
        assert!(marked.placeholder);
        assert!(!official.placeholder);
        assert_eq!(marked.len(), 1);
    }

    #[test]
    fn test_bundled_placeholder_ids_are_flagged() {
        for task in registry().iter() {
            assert!(task.placeholder, "{} is not flagged", task.name);
        }
    }

    #[test]
    fn test_new_deduplicates_ids() {
        let task = TaskDefinition::new("t", ["1", "2", "1"]);
        assert_eq!(task.len(), 2);
    }
}
