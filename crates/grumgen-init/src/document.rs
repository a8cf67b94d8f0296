//! The GrumPHP configuration document.
//!
//! Serialized layout:
//!
//! ```yaml
//! grumphp:
//!   hide_circumvention_tip: true
//!   process_timeout: 170
//!   stop_on_failure: false
//!   ignore_unstaged_changes: false
//!   tasks:
//!     phplint:
//!       jobs: 4
//!       short_open_tag: true
//! ```
//!
//! `tasks` keeps insertion order, which is the operator's selection order.

use grumgen_core::{GrumgenError, Result, TaskId};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Options of a single task, keyed by GrumPHP option name.
pub type TaskOptions = Mapping;

/// Default for `hide_circumvention_tip`.
pub const DEFAULT_HIDE_TIP: bool = true;
/// Default for `process_timeout`, in seconds.
pub const DEFAULT_PROCESS_TIMEOUT: u64 = 170;
/// Default for `stop_on_failure`.
pub const DEFAULT_STOP_ON_FAILURE: bool = false;
/// Default for `ignore_unstaged_changes`.
pub const DEFAULT_IGNORE_UNSTAGED: bool = false;

/// Root of a `grumphp.yml` file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub grumphp: GrumphpSection,
}

/// Global settings plus the per-task mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrumphpSection {
    pub hide_circumvention_tip: bool,
    pub process_timeout: u64,
    pub stop_on_failure: bool,
    pub ignore_unstaged_changes: bool,
    #[serde(default)]
    pub tasks: Mapping,
}

impl Default for GrumphpSection {
    fn default() -> Self {
        Self {
            hide_circumvention_tip: DEFAULT_HIDE_TIP,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            stop_on_failure: DEFAULT_STOP_ON_FAILURE,
            ignore_unstaged_changes: DEFAULT_IGNORE_UNSTAGED,
            tasks: Mapping::new(),
        }
    }
}

impl ConfigDocument {
    /// Document with the given global settings and no tasks.
    pub fn new(settings: GrumphpSection) -> Self {
        Self { grumphp: settings }
    }

    /// Append a task; returns false (and keeps the first) if already present.
    pub fn insert_task(&mut self, id: &str, options: TaskOptions) -> bool {
        let key = Value::String(id.to_string());
        if self.grumphp.tasks.contains_key(&key) {
            return false;
        }
        self.grumphp.tasks.insert(key, Value::Mapping(options));
        true
    }

    /// Task ids in document order.
    pub fn task_ids(&self) -> Vec<TaskId> {
        self.grumphp
            .tasks
            .keys()
            .filter_map(|k| k.as_str().map(String::from))
            .collect()
    }

    /// Options of one task.
    pub fn task(&self, id: &str) -> Option<&TaskOptions> {
        self.grumphp.tasks.get(id).and_then(Value::as_mapping)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| GrumgenError::yaml("config document", e))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| GrumgenError::yaml("config document", e))
    }
}

/// Incremental construction of a [`TaskOptions`] mapping.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: Mapping,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), Value::String(value.into()));
        self
    }

    /// Null when `value` is blank.
    pub fn optional_text(mut self, key: &str, value: &str) -> Self {
        let value = value.trim();
        let value = if value.is_empty() {
            Value::Null
        } else {
            Value::String(value.to_string())
        };
        self.options.insert(key.into(), value);
        self
    }

    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.options.insert(key.into(), Value::from(value));
        self
    }

    pub fn flag(mut self, key: &str, value: bool) -> Self {
        self.options.insert(key.into(), Value::Bool(value));
        self
    }

    pub fn list<I, S>(mut self, key: &str, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(|s| Value::String(s.into())).collect();
        self.options.insert(key.into(), Value::Sequence(items));
        self
    }

    pub fn build(self) -> TaskOptions {
        self.options
    }
}
