//! Shared types, error model, and configuration for inkpage.
//!
//! This crate is the foundation depended on by the other inkpage crates.
//! It provides:
//! - [`InkpageError`] — the unified error type
//! - Index record shapes ([`KeyValueEntry`], [`IndexScanResult`])
//! - The configuration model ([`Config`]), its defaults and its schema
//! - [`ConfigContainer`] and a file-backed implementation

pub mod client;
pub mod config;
pub mod container;
pub mod error;
pub mod schema;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use client::{ActionButton, EmojiConfig, Shortcut};
pub use config::{
    Config, CustomStyles, DEFAULT_INDEX_PAGE, DEFAULT_MAXIMUM_ATTACHMENT_SIZE, DynamicAttribute,
    DynamicAttributes, LibraryDef, LinkStyle, ObjectDecorator, SchemaConfig,
    default_action_buttons, default_config,
};
pub use container::{
    ConfigContainer, FileConfigContainer, default_config_path, merge_over_defaults, parse_document,
};
pub use error::{InkpageError, Result};
pub use schema::{ConfigValidator, PAGE_REF_FORMAT, config_schema, is_page_ref};
pub use types::{IndexScanResult, KeyValueEntry};
