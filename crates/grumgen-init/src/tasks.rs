//! Per-task option builders.
//!
//! Each builder asks a fixed, task-specific sequence of questions and returns
//! the task's option mapping. Builders only touch the [`Prompter`], so the same
//! answers always produce the same mapping.

use std::collections::HashMap;

use grumgen_core::types::parse_name_list;
use tracing::{debug, warn};

use crate::document::{OptionsBuilder, TaskOptions};
use crate::prompt::{self, Prompter};

/// Builds the options of one task.
pub type TaskBuilder = fn(&mut dyn Prompter) -> prompt::Result<TaskOptions>;

/// Default branch name whitelist pattern.
pub const BRANCH_NAME_PATTERN: &str =
    "^(feature|bugfix|hotfix|release|support|task|chore|improvement|refactor)/[a-z0-9-]+$";

/// Branches nobody should commit to directly.
pub const PROTECTED_BRANCHES: &str = "master,develop,production,staging";

/// Debug statements rejected by `git_blacklist`.
pub const FORBIDDEN_KEYWORDS: &str = "die(,var_dump(,exit;,dd(,kint(,print_r(,debug(";

/// Drupal PHP file extensions.
const DRUPAL_EXTENSIONS: &str = "php,module,inc,install,theme";

/// Map from task id to builder.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    builders: HashMap<String, TaskBuilder>,
}

impl TaskRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a builder for every built-in catalog task.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("phpcs", phpcs);
        registry.register("phplint", phplint);
        registry.register("phpmd", phpmd);
        registry.register("phpstan", phpstan);
        registry.register("phpunit", phpunit);
        registry.register("phpcpd", phpcpd);
        registry.register("securitychecker_enlightn", securitychecker_enlightn);
        registry.register("twigcs", twigcs);
        registry.register("yamllint", yamllint);
        registry.register("jsonlint", jsonlint);
        registry.register("composer", composer);
        registry.register("git_branch_name", git_branch_name);
        registry.register("git_commit_message", git_commit_message);
        registry.register("git_blacklist", git_blacklist);
        registry
    }

    /// Add or replace the builder for `id`.
    pub fn register(&mut self, id: impl Into<String>, builder: TaskBuilder) {
        self.builders.insert(id.into(), builder);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.builders.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }

    /// Run the builder for `id`; `None` (with a warning) if there is none.
    pub fn build(
        &self,
        id: &str,
        prompter: &mut dyn Prompter,
    ) -> Option<prompt::Result<TaskOptions>> {
        match self.builders.get(id) {
            Some(builder) => {
                debug!(task = id, "building task options");
                Some(builder(prompter))
            }
            None => {
                warn!(task = id, "no option builder registered, skipping");
                None
            }
        }
    }
}

/// First picked option of a single-choice question.
fn single_choice(
    prompter: &mut dyn Prompter,
    prompt: &str,
    options: &[&str],
    default: &str,
) -> prompt::Result<String> {
    let picked = prompter.ask_choice(prompt, options, &[default], false)?;
    Ok(picked.into_iter().next().unwrap_or_else(|| default.to_string()))
}

/// Comma-separated list question.
fn ask_list(prompter: &mut dyn Prompter, prompt: &str, default: &str) -> prompt::Result<Vec<String>> {
    let answer = prompter.ask_text(&format!("{prompt} (comma separated)"), default)?;
    Ok(parse_name_list(&answer))
}

fn phpcs(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let standard = ask_list(p, "[phpcs] Coding standards", "Drupal,DrupalPractice")?;
    let severity = p.ask_int("[phpcs] Minimum severity", 5)?;
    let report = single_choice(
        p,
        "[phpcs] Report format",
        &["full", "summary", "checkstyle", "json"],
        "full",
    )?;
    let report_width = p.ask_int("[phpcs] Report width", 80)?;
    let encoding = p.ask_text("[phpcs] File encoding", "utf-8")?;

    Ok(OptionsBuilder::new()
        .list("standard", standard)
        .int("severity", severity)
        .text("report", report)
        .int("report_width", report_width)
        .text("encoding", encoding)
        .build())
}

fn phplint(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let jobs = p.ask_int("[phplint] Parallel jobs", 4)?;
    let short_open_tag = p.ask_bool("[phplint] Allow short open tags?", true)?;

    Ok(OptionsBuilder::new()
        .int("jobs", jobs)
        .flag("short_open_tag", short_open_tag)
        .build())
}

fn phpmd(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let ruleset = ask_list(
        p,
        "[phpmd] Rulesets",
        "cleancode,codesize,naming,controversial,design,unusedcode",
    )?;
    let exclude = ask_list(p, "[phpmd] Excluded paths", "")?;
    let triggered_by = ask_list(p, "[phpmd] File extensions", DRUPAL_EXTENSIONS)?;

    Ok(OptionsBuilder::new()
        .list("ruleset", ruleset)
        .list("exclude", exclude)
        .list("triggered_by", triggered_by)
        .build())
}

fn phpstan(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let levels = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
    let level = single_choice(p, "[phpstan] Rule level", &levels, "5")?;
    let level: i64 = level.parse().unwrap_or(5);
    let memory_limit = p.ask_text("[phpstan] Memory limit", "-1")?;
    let configuration = p.ask_text("[phpstan] Configuration file (blank for none)", "")?;
    let use_grumphp_paths = p.ask_bool("[phpstan] Only analyse files GrumPHP passes?", true)?;

    Ok(OptionsBuilder::new()
        .int("level", level)
        .text("memory_limit", memory_limit)
        .optional_text("configuration", &configuration)
        .flag("use_grumphp_paths", use_grumphp_paths)
        .build())
}

fn phpunit(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let config_file = p.ask_text("[phpunit] Configuration file", "phpunit.xml.dist")?;
    let testsuite = p.ask_text("[phpunit] Test suite (blank for all)", "")?;
    let always_execute = p.ask_bool("[phpunit] Run even when no PHP file changed?", false)?;

    Ok(OptionsBuilder::new()
        .text("config_file", config_file)
        .optional_text("testsuite", &testsuite)
        .flag("always_execute", always_execute)
        .build())
}

fn phpcpd(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let directory = ask_list(p, "[phpcpd] Directories", ".")?;
    let exclude = ask_list(p, "[phpcpd] Excluded directories", "vendor")?;
    let min_lines = p.ask_int("[phpcpd] Minimum duplicated lines", 5)?;
    let min_tokens = p.ask_int("[phpcpd] Minimum duplicated tokens", 70)?;

    Ok(OptionsBuilder::new()
        .list("directory", directory)
        .list("exclude", exclude)
        .int("min_lines", min_lines)
        .int("min_tokens", min_tokens)
        .build())
}

fn securitychecker_enlightn(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let lockfile = p.ask_text("[security] Composer lock file", "./composer.lock")?;
    let run_always = p.ask_bool("[security] Run on every commit?", false)?;

    Ok(OptionsBuilder::new()
        .text("lockfile", lockfile)
        .flag("run_always", run_always)
        .build())
}

fn twigcs(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let path = p.ask_text("[twigcs] Templates path", ".")?;
    let severity = single_choice(
        p,
        "[twigcs] Minimum severity",
        &["ignore", "info", "warning", "error"],
        "warning",
    )?;
    let ruleset = p.ask_text("[twigcs] Ruleset class", "FriendsOfTwig\\Twigcs\\Ruleset\\Official")?;

    Ok(OptionsBuilder::new()
        .text("path", path)
        .text("severity", severity)
        .text("ruleset", ruleset)
        .build())
}

fn yamllint(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let parse_custom_tags = p.ask_bool("[yamllint] Parse custom tags?", true)?;
    let exception_on_invalid_type =
        p.ask_bool("[yamllint] Fail on invalid types?", false)?;

    Ok(OptionsBuilder::new()
        .flag("parse_custom_tags", parse_custom_tags)
        .flag("exception_on_invalid_type", exception_on_invalid_type)
        .build())
}

fn jsonlint(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let detect_key_conflicts = p.ask_bool("[jsonlint] Detect duplicate keys?", true)?;

    Ok(OptionsBuilder::new()
        .flag("detect_key_conflicts", detect_key_conflicts)
        .build())
}

fn composer(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let strict = p.ask_bool("[composer] Treat warnings as errors?", false)?;
    let no_check_lock = p.ask_bool("[composer] Skip lock file check?", false)?;

    Ok(OptionsBuilder::new()
        .flag("strict", strict)
        .flag("no_check_lock", no_check_lock)
        .build())
}

fn git_branch_name(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let whitelist = p.ask_text("[git_branch_name] Allowed branch pattern", BRANCH_NAME_PATTERN)?;
    let blacklist = ask_list(p, "[git_branch_name] Forbidden branches", PROTECTED_BRANCHES)?;
    let allow_detached_head = p.ask_bool("[git_branch_name] Allow detached HEAD?", true)?;

    let whitelist: Vec<String> = if whitelist.trim().is_empty() {
        Vec::new()
    } else {
        vec![whitelist.trim().to_string()]
    };

    Ok(OptionsBuilder::new()
        .list("whitelist", whitelist)
        .list("blacklist", blacklist)
        .flag("allow_detached_head", allow_detached_head)
        .build())
}

fn git_commit_message(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let max_subject_width = p.ask_int("[git_commit_message] Max subject width", 60)?;
    let max_body_width = p.ask_int("[git_commit_message] Max body line width", 72)?;
    let single_line = p.ask_bool("[git_commit_message] Require a single-line subject?", true)?;
    let no_trailing_period =
        p.ask_bool("[git_commit_message] Forbid trailing punctuation in subject?", true)?;
    let capitalized = p.ask_bool("[git_commit_message] Require a capitalized subject?", false)?;
    let allow_empty = p.ask_bool("[git_commit_message] Allow empty messages?", false)?;

    Ok(OptionsBuilder::new()
        .int("max_subject_width", max_subject_width)
        .int("max_body_width", max_body_width)
        .flag("enforce_single_lined_subject", single_line)
        .flag("enforce_no_subject_trailing_period", no_trailing_period)
        .flag("enforce_capitalized_subject", capitalized)
        .flag("allow_empty_message", allow_empty)
        .build())
}

fn git_blacklist(p: &mut dyn Prompter) -> prompt::Result<TaskOptions> {
    let keywords = ask_list(p, "[git_blacklist] Forbidden keywords", FORBIDDEN_KEYWORDS)?;
    let triggered_by = ask_list(p, "[git_blacklist] File extensions", DRUPAL_EXTENSIONS)?;

    Ok(OptionsBuilder::new()
        .list("keywords", keywords)
        .list("triggered_by", triggered_by)
        .build())
}
