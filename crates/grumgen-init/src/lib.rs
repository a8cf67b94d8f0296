//! GrumPHP configuration generation.
//!
//! This crate provides the interactive generation flow: the task catalog,
//! operator prompting, per-task option builders, document assembly and
//! writing, binary discovery and validation of existing files.

pub mod assembler;
pub mod catalog;
pub mod detection;
pub mod document;
pub mod generator;
pub mod prompt;
pub mod tasks;
pub mod validator;

pub use assembler::{ConfigAssembler, Selection};
pub use catalog::{CatalogEntry, TaskCatalog};
pub use document::{ConfigDocument, GrumphpSection, OptionsBuilder, TaskOptions};
pub use generator::DocumentWriter;
pub use prompt::{DefaultsPrompter, InquirePrompter, PromptError, Prompter, ScriptedPrompter};
pub use tasks::{TaskBuilder, TaskRegistry};
pub use validator::{ValidationResults, validate_config};
