//! Application configuration model and defaults.
//!
//! The configuration document is open-ended: every recognised key has an
//! explicit field, anything else lands in [`Config::extra`] so plugins can
//! carry their own settings through a load/save cycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{ActionButton, EmojiConfig, Shortcut};
use crate::schema::config_schema;

/// Page opened on start-up when nothing else is configured.
pub const DEFAULT_INDEX_PAGE: &str = "index";

/// Upload limit in MiB.
pub const DEFAULT_MAXIMUM_ATTACHMENT_SIZE: f64 = 10.0;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_page: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcuts: Option<Vec<Shortcut>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_smart_quotes: Option<bool>,

    /// In MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_attachment_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries: Option<Vec<LibraryDef>>,

    /// Reopen the last page that was open when the app was closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pwa_open_last_page: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_edit_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_sync_button: Option<bool>,

    /// An empty list means "use [`default_action_buttons`]".
    pub action_buttons: Vec<ActionButton>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_decorators: Option<Vec<ObjectDecorator>>,

    /// Ignore patterns for the space, dockerignore syntax.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_ignore: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<EmojiConfig>,

    pub schema: SchemaConfig,

    /// Deprecated in favour of space styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_styles: Option<CustomStyles>,

    /// `wikilink` or `markdown`, see [`LinkStyle`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_link_style: Option<String>,

    /// Keys this struct does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        default_config()
    }
}

impl Config {
    pub fn index_page(&self) -> &str {
        self.index_page.as_deref().unwrap_or(DEFAULT_INDEX_PAGE)
    }

    pub fn maximum_attachment_size_mib(&self) -> f64 {
        self.maximum_attachment_size
            .unwrap_or(DEFAULT_MAXIMUM_ATTACHMENT_SIZE)
    }

    /// Attachment limit in bytes. Negative limits clamp to zero.
    pub fn maximum_attachment_size_bytes(&self) -> u64 {
        (self.maximum_attachment_size_mib().max(0.0) * BYTES_PER_MIB) as u64
    }

    pub fn hide_sync_button(&self) -> bool {
        self.hide_sync_button.unwrap_or(false)
    }

    pub fn default_link_style(&self) -> LinkStyle {
        match self.default_link_style.as_deref() {
            None => LinkStyle::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(style = raw, "unknown defaultLinkStyle, using wikilink");
                LinkStyle::default()
            }),
        }
    }

    /// Configured custom style pages as a flat list.
    pub fn custom_styles(&self) -> Vec<&str> {
        match &self.custom_styles {
            None => Vec::new(),
            Some(CustomStyles::Single(style)) => vec![style.as_str()],
            Some(CustomStyles::Many(styles)) => styles.iter().map(String::as_str).collect(),
        }
    }

    /// The buttons to show: the configured ones, or the built-in set when
    /// none are configured.
    pub fn effective_action_buttons(&self) -> Vec<ActionButton> {
        if self.action_buttons.is_empty() {
            default_action_buttons()
        } else {
            self.action_buttons.clone()
        }
    }

    /// Look up an extension key that has no dedicated field.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Schemas contributed by the space: `config` validates the configuration,
/// `tag` holds per-tag schemas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default)]
    pub tag: Map<String, Value>,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// `customStyles` accepts a single page or a list of pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomStyles {
    Single(String),
    Many(Vec<String>),
}

/// How new links are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStyle {
    /// `[[page]]`
    #[default]
    Wikilink,
    /// `[page](page)`
    Markdown,
}

impl LinkStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wikilink => "wikilink",
            Self::Markdown => "markdown",
        }
    }
}

impl std::fmt::Display for LinkStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LinkStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "wikilink" => Ok(Self::Wikilink),
            "markdown" => Ok(Self::Markdown),
            other => Err(format!("unknown link style '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Libraries and decorators
// ---------------------------------------------------------------------------

/// A page tree to pull into the space as a shared library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDef {
    /// Page reference of the library root.
    pub import: String,

    /// Sub-paths of the library to leave out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    /// Deprecated alias of `import`; kept only so old documents round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl LibraryDef {
    pub fn new(import: impl Into<String>) -> Self {
        Self {
            import: import.into(),
            exclude: None,
            source: None,
        }
    }

    /// The page reference to import. `import` always wins over `source`.
    pub fn import_ref(&self) -> &str {
        match self.source.as_deref() {
            Some(source) if source != self.import => {
                tracing::warn!(
                    import = %self.import,
                    source,
                    "library sets both import and deprecated source, using import"
                );
            }
            _ => {}
        }
        &self.import
    }

    pub fn excludes(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or_default()
    }
}

/// Adds computed attributes to objects matching a query predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDecorator {
    /// Query expression the object must satisfy.
    #[serde(rename = "where")]
    pub where_clause: String,
    pub attributes: DynamicAttributes,
}

/// Attribute name -> query expression, or a nested group of attributes.
pub type DynamicAttributes = BTreeMap<String, DynamicAttribute>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DynamicAttribute {
    Expression(String),
    Nested(DynamicAttributes),
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Baseline configuration for a minimal usable space.
pub fn default_config() -> Config {
    let schema_config = match config_schema() {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    Config {
        index_page: Some(DEFAULT_INDEX_PAGE.into()),
        shortcuts: None,
        use_smart_quotes: None,
        maximum_attachment_size: Some(DEFAULT_MAXIMUM_ATTACHMENT_SIZE),
        libraries: None,
        pwa_open_last_page: None,
        hide_edit_button: None,
        hide_sync_button: Some(false),
        action_buttons: Vec::new(),
        object_decorators: None,
        space_ignore: None,
        emoji: None,
        schema: SchemaConfig {
            tag: Map::new(),
            config: schema_config,
        },
        custom_styles: None,
        default_link_style: Some(LinkStyle::Wikilink.as_str().into()),
        extra: Map::new(),
    }
}

/// The buttons shown when the configuration does not list any.
pub fn default_action_buttons() -> Vec<ActionButton> {
    vec![
        ActionButton::new("Home", "Navigate: Home").with_description("Go to the index page"),
        ActionButton::new("Book", "Navigate: Page Picker").with_description("Open page"),
        ActionButton::new("Terminal", "Open Command Palette").with_description("Run command"),
    ]
}
