//! In-memory rendition of the newsletter sign-up form
//!
//! Implements the same element contract as the public page (ids, classes,
//! error text, success modal) so the suite can run without a browser: in
//! `--simulate` mode and in this workspace's own tests. Submission is
//! validated on the trimmed input; a valid address shows the success modal
//! after a configurable latency.

use async_trait::async_trait;
use regex::Regex;
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::driver::{ElementState, Key, PageDriver, SessionLauncher};
use crate::error::{LetterboxError, Result};
use crate::locators::{Field, Strategy, VALIDATION_MESSAGE};

/// Address shape accepted by default
pub const DEFAULT_EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

const PAGE_TITLE: &str = "Frontend Mentor | Newsletter sign-up form with success message";

/// 1x1 transparent PNG
const BLANK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn default_pattern() -> Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(DEFAULT_EMAIL_PATTERN).expect("default email pattern is valid"))
        .clone()
}

/// Document state; replaced wholesale on navigation
#[derive(Debug, Default)]
struct DocumentState {
    url: String,
    email_value: String,
    email_invalid: bool,
    error_visible: bool,
    modal_shown_at: Option<Instant>,
    confirmed_email: String,
    mark: Option<String>,
}

impl DocumentState {
    fn modal_visible(&self) -> bool {
        self.modal_shown_at
            .map(|at| Instant::now() >= at)
            .unwrap_or(false)
    }
}

/// Simulated page driver
pub struct SimulatedNewsletter {
    doc: Mutex<DocumentState>,
    latency: Duration,
    email_pattern: Regex,
    missing: Vec<Field>,
    duplicated: Vec<Field>,
}

impl Default for SimulatedNewsletter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedNewsletter {
    pub fn new() -> Self {
        Self {
            doc: Mutex::new(DocumentState::default()),
            latency: Duration::ZERO,
            email_pattern: default_pattern(),
            missing: Vec::new(),
            duplicated: Vec::new(),
        }
    }

    /// Delay between a valid submission and the modal becoming visible
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Validate submissions against `pattern` instead of the default
    pub fn with_email_pattern(mut self, pattern: &str) -> Result<Self> {
        self.email_pattern = Regex::new(pattern)
            .map_err(|e| LetterboxError::Config(format!("Invalid email pattern: {}", e)))?;
        Ok(self)
    }

    /// Render the page without `field`
    pub fn without(mut self, field: Field) -> Self {
        self.missing.push(field);
        self
    }

    /// Render `field` twice
    pub fn duplicated(mut self, field: Field) -> Self {
        self.duplicated.push(field);
        self
    }

    fn doc(&self) -> Result<MutexGuard<'_, DocumentState>> {
        self.doc
            .lock()
            .map_err(|_| LetterboxError::Browser("simulated page state poisoned".to_string()))
    }

    /// Field addressed by `selector`, if rendered
    fn field(&self, selector: &str) -> Option<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.selector() == selector)
            .filter(|f| !self.missing.contains(f))
    }

    fn require_field(&self, selector: &str) -> Result<Field> {
        self.field(selector)
            .ok_or_else(|| LetterboxError::missing(selector, selector))
    }

    fn displayed(doc: &DocumentState, field: Field) -> bool {
        let modal = doc.modal_visible();
        match field {
            Field::EmailInput | Field::SubmitButton | Field::NewsletterForm => !modal,
            Field::ErrorMessage => doc.error_visible && !modal,
            Field::SuccessModal | Field::ConfirmedEmail | Field::DismissButton => modal,
        }
    }

    fn interactable(&self, doc: &DocumentState, field: Field) -> Result<()> {
        if Self::displayed(doc, field) {
            Ok(())
        } else {
            Err(LetterboxError::Browser(format!(
                "element not interactable: {}",
                field.selector()
            )))
        }
    }

    fn class_name(doc: &DocumentState, field: Field) -> String {
        match field {
            Field::EmailInput if doc.email_invalid => "error".to_string(),
            Field::SubmitButton => "submit-btn".to_string(),
            Field::ErrorMessage => "error-message".to_string(),
            _ => String::new(),
        }
    }

    fn submit(&self, doc: &mut DocumentState) {
        let candidate = doc.email_value.trim().to_string();
        if self.email_pattern.is_match(&candidate) {
            debug!("Simulated page accepted {:?}", candidate);
            doc.error_visible = false;
            doc.email_invalid = false;
            doc.confirmed_email = candidate;
            doc.modal_shown_at = Some(Instant::now() + self.latency);
        } else {
            debug!("Simulated page rejected {:?}", candidate);
            doc.error_visible = true;
            doc.email_invalid = true;
        }
    }

    fn load(&self, url: String) -> Result<()> {
        let mut doc = self.doc()?;
        *doc = DocumentState {
            url,
            ..DocumentState::default()
        };
        Ok(())
    }
}

#[async_trait]
impl PageDriver for SimulatedNewsletter {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Simulated navigation to {}", url);
        self.load(url.to_string())
    }

    async fn reload(&self) -> Result<()> {
        let url = self.doc()?.url.clone();
        self.load(url)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(match self.field(selector) {
            None => 0,
            Some(field) if self.duplicated.contains(&field) => 2,
            Some(_) => 1,
        })
    }

    async fn probe(&self, selector: &str) -> Result<Option<ElementState>> {
        let Some(field) = self.field(selector) else {
            return Ok(None);
        };
        let doc = self.doc()?;
        let displayed = Self::displayed(&doc, field);

        let text = match field {
            Field::ErrorMessage if displayed => VALIDATION_MESSAGE.to_string(),
            Field::ConfirmedEmail if displayed => doc.confirmed_email.clone(),
            Field::SubmitButton if displayed => "Subscribe to monthly newsletter".to_string(),
            _ => String::new(),
        };
        let value = match field {
            Field::EmailInput => Some(doc.email_value.clone()),
            _ => None,
        };

        Ok(Some(ElementState {
            displayed,
            enabled: true,
            text,
            value,
            class_name: Self::class_name(&doc, field),
        }))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let Some(field) = self.field(selector) else {
            return Ok(None);
        };
        let doc = self.doc()?;
        let locator = field.locator();

        Ok(match name {
            "id" if locator.strategy == Strategy::Id => {
                Some(locator.value.to_string())
            }
            "class" => Some(Self::class_name(&doc, field)).filter(|c| !c.is_empty()),
            "type" if field == Field::EmailInput => Some("email".to_string()),
            "value" if field == Field::EmailInput => Some(doc.email_value.clone()),
            _ => None,
        })
    }

    async fn clear(&self, selector: &str) -> Result<()> {
        let field = self.require_field(selector)?;
        let mut doc = self.doc()?;
        if field != Field::EmailInput {
            return Err(LetterboxError::Browser(format!(
                "element is not a form control: {}",
                selector
            )));
        }
        self.interactable(&doc, field)?;
        doc.email_value.clear();
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let field = self.require_field(selector)?;
        let mut doc = self.doc()?;
        self.interactable(&doc, field)?;
        if field == Field::EmailInput {
            doc.email_value.push_str(text);
        }
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let field = self.require_field(selector)?;
        let mut doc = self.doc()?;
        self.interactable(&doc, field)?;

        match field {
            Field::SubmitButton => self.submit(&mut doc),
            Field::DismissButton => {
                doc.modal_shown_at = None;
                doc.email_value.clear();
                doc.confirmed_email.clear();
            }
            _ => {}
        }
        Ok(())
    }

    async fn press_key(&self, selector: &str, key: Key) -> Result<()> {
        let field = self.require_field(selector)?;
        let mut doc = self.doc()?;
        self.interactable(&doc, field)?;

        if field == Field::EmailInput && key == Key::Enter {
            self.submit(&mut doc);
        }
        Ok(())
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(BLANK_PNG.to_vec())
    }

    async fn set_document_mark(&self, mark: &str) -> Result<()> {
        self.doc()?.mark = Some(mark.to_string());
        Ok(())
    }

    async fn document_mark(&self) -> Result<Option<String>> {
        Ok(self.doc()?.mark.clone())
    }

    async fn title(&self) -> Result<String> {
        Ok(PAGE_TITLE.to_string())
    }
}

/// Opens a fresh simulated page per scenario
#[derive(Debug, Clone)]
pub struct SimLauncher {
    target_url: String,
    latency: Duration,
    email_pattern: Option<String>,
    missing: Vec<Field>,
}

impl SimLauncher {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            latency: Duration::ZERO,
            email_pattern: None,
            missing: Vec::new(),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_email_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.email_pattern = Some(pattern.into());
        self
    }

    pub fn without(mut self, field: Field) -> Self {
        self.missing.push(field);
        self
    }
}

#[async_trait]
impl SessionLauncher for SimLauncher {
    type Session = SimulatedNewsletter;

    async fn open(&self) -> Result<SimulatedNewsletter> {
        let mut sim = SimulatedNewsletter::new().with_latency(self.latency);
        if let Some(pattern) = &self.email_pattern {
            sim = sim.with_email_pattern(pattern)?;
        }
        for field in &self.missing {
            sim = sim.without(*field);
        }

        sim.navigate(&self.target_url).await?;
        debug!("Simulated session opened on {}", self.target_url);
        Ok(sim)
    }

    async fn close(&self, _session: SimulatedNewsletter) -> Result<()> {
        debug!("Simulated session closed");
        Ok(())
    }
}
