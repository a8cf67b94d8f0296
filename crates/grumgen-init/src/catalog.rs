//! The catalog of GrumPHP tasks grumgen knows how to configure.

use grumgen_core::types::dedup_preserving_order;
use grumgen_core::{ORCHESTRATOR_PACKAGE, PackageId, TaskId};

/// A recognized task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// GrumPHP task key written under `tasks`.
    pub id: &'static str,
    /// Role name accepted as an alternative to `id` on selection.
    pub alias: &'static str,
    /// Label shown in the selection prompt.
    pub label: &'static str,
    /// Composer packages the task needs.
    pub packages: &'static [&'static str],
}

/// Built-in tasks, in the order they are offered to the operator.
pub const BUILTIN_TASKS: &[CatalogEntry] = &[
    CatalogEntry {
        id: "phpcs",
        alias: "style-checker",
        label: "PHP_CodeSniffer (Drupal coding standards)",
        packages: &["squizlabs/php_codesniffer", "drupal/coder"],
    },
    CatalogEntry {
        id: "phplint",
        alias: "lint",
        label: "PHP Lint (syntax check)",
        packages: &["php-parallel-lint/php-parallel-lint"],
    },
    CatalogEntry {
        id: "phpmd",
        alias: "mess-detector",
        label: "PHP Mess Detector",
        packages: &["phpmd/phpmd"],
    },
    CatalogEntry {
        id: "phpstan",
        alias: "static-analyzer",
        label: "PHPStan (static analysis)",
        packages: &[
            "phpstan/phpstan",
            "mglaman/phpstan-drupal",
            "phpstan/extension-installer",
        ],
    },
    CatalogEntry {
        id: "phpunit",
        alias: "unit-test-runner",
        label: "PHPUnit",
        packages: &["phpunit/phpunit"],
    },
    CatalogEntry {
        id: "phpcpd",
        alias: "copy-paste-detector",
        label: "PHP Copy/Paste Detector",
        packages: &["sebastian/phpcpd"],
    },
    CatalogEntry {
        id: "securitychecker_enlightn",
        alias: "security-scan",
        label: "Security checker (composer.lock advisories)",
        packages: &["enlightn/security-checker"],
    },
    CatalogEntry {
        id: "twigcs",
        alias: "twig-style-checker",
        label: "Twig coding standards",
        packages: &["friendsoftwig/twigcs"],
    },
    CatalogEntry {
        id: "yamllint",
        alias: "yaml-lint",
        label: "YAML lint",
        packages: &[],
    },
    CatalogEntry {
        id: "jsonlint",
        alias: "json-lint",
        label: "JSON lint",
        packages: &[],
    },
    CatalogEntry {
        id: "composer",
        alias: "composer-validator",
        label: "Composer file validation",
        packages: &[],
    },
    CatalogEntry {
        id: "git_branch_name",
        alias: "branch-name-guard",
        label: "Git branch name guard",
        packages: &[],
    },
    CatalogEntry {
        id: "git_commit_message",
        alias: "commit-message-guard",
        label: "Git commit message guard",
        packages: &[],
    },
    CatalogEntry {
        id: "git_blacklist",
        alias: "forbidden-keyword-guard",
        label: "Forbidden keywords (debug statements)",
        packages: &[],
    },
];

/// Tasks preselected in the selection prompt.
pub const DEFAULT_SELECTION: &[&str] = &["phpcs", "phplint", "git_blacklist"];

/// Lookup over a fixed set of [`CatalogEntry`] values.
#[derive(Debug, Clone)]
pub struct TaskCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for TaskCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TaskCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Catalog of every built-in task.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_TASKS.to_vec())
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entry for an exact task id.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Entry for a task id or alias, ignoring case and surrounding whitespace.
    pub fn resolve(&self, name: &str) -> Option<&CatalogEntry> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|e| e.id.eq_ignore_ascii_case(name) || e.alias.eq_ignore_ascii_case(name))
    }

    /// Packages to install for `task_ids`: the orchestrator first, then each
    /// task's packages in selection order, without duplicates.
    pub fn package_selection(&self, task_ids: &[TaskId]) -> Vec<PackageId> {
        let packages = std::iter::once(ORCHESTRATOR_PACKAGE).chain(
            task_ids
                .iter()
                .filter_map(|id| self.get(id))
                .flat_map(|entry| entry.packages.iter().copied()),
        );
        dedup_preserving_order(packages.map(String::from))
    }
}
