//! Config module (modularized).
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{
    create_template_config, ensure_default_config_exists, load_config_from_xml,
    load_config_from_xml_path,
};

/// Defaults shared across submodules.
pub const SOURCE_BASE_DEFAULT: &str = ".";
pub const DEST_BASE_DEFAULT: &str = "sorted";
pub const BACKUP_KEEP_DEFAULT: usize = 3;
