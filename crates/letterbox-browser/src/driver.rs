//! Driver seam between the page object and a concrete browser
//!
//! [`PageDriver`] is the narrow set of DOM operations the page object needs,
//! addressed by CSS selector. [`SessionLauncher`] opens a driver on the target
//! page and tears it down again. The Chrome implementation lives in
//! [`crate::browser`], the in-memory one in [`crate::sim`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Keys the suite sends to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
}

impl Key {
    /// DOM key name
    pub fn name(&self) -> &'static str {
        match self {
            Key::Enter => "Enter",
        }
    }
}

/// Snapshot of one element's observable state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementState {
    /// Rendered and not hidden by `display`, `visibility` or zero opacity
    pub displayed: bool,
    /// Not disabled
    pub enabled: bool,
    /// Rendered text, trimmed
    pub text: String,
    /// Form control value, `None` for non-controls
    pub value: Option<String>,
    /// `class` attribute, empty when absent
    pub class_name: String,
}

/// DOM operations against the single page a session displays
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` and wait for navigation to finish
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Reload the current document
    async fn reload(&self) -> Result<()>;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// State of the first element matching `selector`, `None` if absent
    async fn probe(&self, selector: &str) -> Result<Option<ElementState>>;

    /// Attribute of the first element matching `selector`
    ///
    /// `None` if the element or the attribute is absent.
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Empty a form control's value
    async fn clear(&self, selector: &str) -> Result<()>;

    /// Focus the element and type `text` verbatim
    async fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    async fn click(&self, selector: &str) -> Result<()>;

    /// Focus the element and press `key`
    async fn press_key(&self, selector: &str, key: Key) -> Result<()>;

    /// PNG bytes of the visible page
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Stamp the current document so a later reload can be detected
    async fn set_document_mark(&self, mark: &str) -> Result<()>;

    /// Stamp set on the current document, `None` after any navigation
    async fn document_mark(&self) -> Result<Option<String>>;

    async fn title(&self) -> Result<String>;
}

/// Opens and closes sessions positioned on the target page
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Session: PageDriver;

    /// Launch a session and load the target page
    async fn open(&self) -> Result<Self::Session>;

    /// Tear the session down
    async fn close(&self, session: Self::Session) -> Result<()>;
}
