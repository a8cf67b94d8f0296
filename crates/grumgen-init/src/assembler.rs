//! Turns a task selection into a [`ConfigDocument`].

use grumgen_core::types::dedup_preserving_order;
use grumgen_core::{GrumgenError, PackageId, Result, TaskId};
use tracing::{info, warn};

use crate::catalog::{DEFAULT_SELECTION, TaskCatalog};
use crate::document::{
    ConfigDocument, DEFAULT_HIDE_TIP, DEFAULT_IGNORE_UNSTAGED, DEFAULT_PROCESS_TIMEOUT,
    DEFAULT_STOP_ON_FAILURE, GrumphpSection,
};
use crate::prompt::Prompter;
use crate::tasks::TaskRegistry;

/// Outcome of resolving operator-supplied task names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Catalog task ids, deduplicated, in first-mention order.
    pub tasks: Vec<TaskId>,
    /// Names that matched nothing in the catalog.
    pub unknown: Vec<String>,
}

/// Combines the catalog and the builder registry.
#[derive(Debug, Clone)]
pub struct ConfigAssembler {
    catalog: TaskCatalog,
    registry: TaskRegistry,
}

impl ConfigAssembler {
    pub fn new(catalog: TaskCatalog, registry: TaskRegistry) -> Self {
        Self { catalog, registry }
    }

    pub fn builtin() -> Self {
        Self::new(TaskCatalog::builtin(), TaskRegistry::builtin())
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    /// Ask which tasks to enable.
    ///
    /// Labels are shown; the chosen labels are mapped back to task ids.
    pub fn select_tasks(&self, prompter: &mut dyn Prompter) -> Result<Vec<TaskId>> {
        let entries = self.catalog.entries();
        let labels: Vec<&str> = entries.iter().map(|e| e.label).collect();
        let defaults: Vec<&str> = entries
            .iter()
            .filter(|e| DEFAULT_SELECTION.contains(&e.id))
            .map(|e| e.label)
            .collect();

        let picked = prompter.ask_choice("Select the tasks to enable", &labels, &defaults, true)?;
        let tasks: Vec<TaskId> = picked
            .iter()
            .filter_map(|label| entries.iter().find(|e| e.label == label.as_str()))
            .map(|e| e.id.to_string())
            .collect();

        if tasks.is_empty() {
            return Err(GrumgenError::invalid_input("no tasks selected"));
        }
        Ok(dedup_preserving_order(tasks))
    }

    /// Resolve task names or aliases (for example from `--tasks`).
    ///
    /// Unknown names are reported and skipped.
    pub fn resolve_selection<I, S>(&self, names: I) -> Selection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tasks = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.catalog.resolve(name) {
                Some(entry) => tasks.push(entry.id.to_string()),
                None => {
                    warn!(task = name, "unknown task ignored");
                    unknown.push(name.to_string());
                }
            }
        }
        Selection {
            tasks: dedup_preserving_order(tasks),
            unknown,
        }
    }

    /// Composer packages for `selected`, orchestrator first.
    pub fn package_selection(&self, selected: &[TaskId]) -> Vec<PackageId> {
        self.catalog.package_selection(selected)
    }

    /// Ask the global settings.
    pub fn ask_globals(&self, prompter: &mut dyn Prompter) -> Result<GrumphpSection> {
        let hide_circumvention_tip =
            prompter.ask_bool("Hide the '--no-verify' circumvention tip?", DEFAULT_HIDE_TIP)?;
        let process_timeout = prompter.ask_int(
            "Task process timeout in seconds",
            DEFAULT_PROCESS_TIMEOUT as i64,
        )?;
        let process_timeout = u64::try_from(process_timeout).map_err(|_| {
            GrumgenError::invalid_input(format!(
                "process timeout must not be negative, got {process_timeout}"
            ))
        })?;
        let stop_on_failure =
            prompter.ask_bool("Stop at the first failing task?", DEFAULT_STOP_ON_FAILURE)?;
        let ignore_unstaged_changes =
            prompter.ask_bool("Ignore unstaged changes?", DEFAULT_IGNORE_UNSTAGED)?;

        Ok(GrumphpSection {
            hide_circumvention_tip,
            process_timeout,
            stop_on_failure,
            ignore_unstaged_changes,
            ..GrumphpSection::default()
        })
    }

    /// Build the full document: globals first, then each selected task in
    /// order.
    ///
    /// `selected` may hold ids or aliases; unknown names and tasks without a
    /// builder are skipped with a warning.
    pub fn assemble(
        &self,
        prompter: &mut dyn Prompter,
        selected: &[TaskId],
    ) -> Result<ConfigDocument> {
        let selection = self.resolve_selection(selected);
        let mut document = ConfigDocument::new(self.ask_globals(prompter)?);

        for id in &selection.tasks {
            let Some(options) = self.registry.build(id, prompter) else {
                continue;
            };
            if !document.insert_task(id, options?) {
                warn!(task = %id, "task selected twice, keeping the first");
            }
        }

        info!(tasks = ?document.task_ids(), "configuration assembled");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{Answer, DefaultsPrompter, ScriptedPrompter};
    use serde_yaml::Value;

    #[test]
    fn test_select_tasks_defaults() {
        let assembler = ConfigAssembler::builtin();
        let tasks = assembler.select_tasks(&mut DefaultsPrompter::new()).unwrap();
        assert_eq!(tasks, vec!["phpcs", "phplint", "git_blacklist"]);
    }

    #[test]
    fn test_select_tasks_maps_labels_back() {
        let assembler = ConfigAssembler::builtin();
        let mut p = ScriptedPrompter::new([Answer::Choice(vec![
            "JSON lint".into(),
            "PHPUnit".into(),
        ])]);
        let tasks = assembler.select_tasks(&mut p).unwrap();
        assert_eq!(tasks, vec!["jsonlint", "phpunit"]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let assembler = ConfigAssembler::builtin();
        let mut p = ScriptedPrompter::new([Answer::Choice(vec![])]);
        let err = assembler.select_tasks(&mut p).unwrap_err();
        assert!(matches!(err, GrumgenError::InvalidInput { .. }));
    }

    #[test]
    fn test_resolve_selection_dedups_after_aliasing() {
        let assembler = ConfigAssembler::builtin();
        let selection = assembler.resolve_selection(["lint", " phplint", "rector", "", "style-checker"]);
        assert_eq!(selection.tasks, vec!["phplint", "phpcs"]);
        assert_eq!(selection.unknown, vec!["rector"]);
    }

    #[test]
    fn test_assemble_lint_and_style_checker_with_defaults() {
        let assembler = ConfigAssembler::builtin();
        let selection = assembler.resolve_selection(["lint", "style-checker"]);
        let doc = assembler
            .assemble(&mut DefaultsPrompter::new(), &selection.tasks)
            .unwrap();

        assert_eq!(doc.task_ids(), vec!["phplint", "phpcs"]);
        assert!(doc.grumphp.hide_circumvention_tip);
        assert_eq!(doc.grumphp.process_timeout, 170);
        assert!(!doc.grumphp.stop_on_failure);
        assert!(!doc.grumphp.ignore_unstaged_changes);

        let lint = doc.task("phplint").unwrap();
        assert_eq!(lint["jobs"], Value::from(4));
        assert_eq!(lint["short_open_tag"], Value::Bool(true));

        let phpcs = doc.task("phpcs").unwrap();
        assert_eq!(phpcs["report"], Value::from("full"));
    }

    #[test]
    fn test_package_selection_follows_selection_order() {
        let assembler = ConfigAssembler::builtin();
        let tasks = assembler.resolve_selection(["static-analyzer", "lint"]).tasks;
        assert_eq!(
            assembler.package_selection(&tasks),
            vec![
                "phpro/grumphp",
                "phpstan/phpstan",
                "mglaman/phpstan-drupal",
                "phpstan/extension-installer",
                "php-parallel-lint/php-parallel-lint",
            ]
        );
    }

    #[test]
    fn test_assemble_resolves_aliases_and_skips_unknown() {
        let assembler = ConfigAssembler::builtin();
        let selected: Vec<TaskId> = ["json-lint", "rector", "jsonlint"]
            .into_iter()
            .map(String::from)
            .collect();
        let doc = assembler.assemble(&mut DefaultsPrompter::new(), &selected).unwrap();
        assert_eq!(doc.task_ids(), vec!["jsonlint"]);
    }

    #[test]
    fn test_assemble_skips_tasks_without_builder() {
        let assembler = ConfigAssembler::new(TaskCatalog::builtin(), TaskRegistry::new());
        let doc = assembler
            .assemble(&mut DefaultsPrompter::new(), &["phpcs".to_string()])
            .unwrap();
        assert!(doc.task_ids().is_empty());
    }

    #[test]
    fn test_negative_timeout_is_invalid_input() {
        let assembler = ConfigAssembler::builtin();
        let mut p = ScriptedPrompter::new([Answer::Default, Answer::Int(-5)]);
        let err = assembler.ask_globals(&mut p).unwrap_err();
        assert!(matches!(err, GrumgenError::InvalidInput { .. }));
    }

    #[test]
    fn test_globals_follow_answers() {
        let assembler = ConfigAssembler::builtin();
        let mut p = ScriptedPrompter::new([
            Answer::Bool(false),
            Answer::Int(60),
            Answer::Bool(true),
            Answer::Bool(true),
        ]);
        let globals = assembler.ask_globals(&mut p).unwrap();
        assert!(!globals.hide_circumvention_tip);
        assert_eq!(globals.process_timeout, 60);
        assert!(globals.stop_on_failure);
        assert!(globals.ignore_unstaged_changes);
        assert!(globals.tasks.is_empty());
    }
}
