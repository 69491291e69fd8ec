//! Configuration module for Proseshift
//!
//! Handles project-level configuration (`proseshift.toml`): CLI defaults,
//! operator parameter overrides, and the remote rewrite backend chain.

mod project_config;

pub use project_config::{
    load_project_config, CliDefaults, OperatorOverrides, ProjectConfig, RewriteSettings,
    CONFIG_FILE_NAME,
};
