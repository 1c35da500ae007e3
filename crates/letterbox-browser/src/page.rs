//! Page object for the newsletter sign-up form
//!
//! [`NewsletterPage`] resolves every [`Field`] eagerly when it is built and
//! stamps the loaded document with a handle token (page objects built on the
//! same document share it). Any later operation checks
//! the token first, so a page object that outlives its document (after a
//! reload or navigation) fails with `ElementNotFound` instead of reading the
//! new document's state. [`NewsletterPage::reload`] is the way to get a fresh
//! one.
//!
//! Visibility reads take an optional wait bound. `None` reads the current
//! state; `Some(t)` first waits up to `t` for the element to become visible
//! and then reads.

use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::driver::{ElementState, Key, PageDriver};
use crate::error::{LetterboxError, Result};
use crate::locators::Field;
use crate::wait::Waiter;

/// Page object bound to one loaded document
pub struct NewsletterPage<'a, D: PageDriver> {
    driver: &'a D,
    handle: String,
    waiter: Waiter,
}

impl<'a, D: PageDriver> NewsletterPage<'a, D> {
    /// Resolve all fields against the current page
    ///
    /// Fails with `ElementNotFound` when a field is absent or matches more
    /// than one element. `waiter` bounds the page's own waits (dismissal and
    /// optional-wait reads).
    pub async fn new(driver: &'a D, waiter: Waiter) -> Result<Self> {
        for field in Field::ALL {
            let selector = field.selector();
            match driver.count(&selector).await? {
                1 => {}
                0 => return Err(LetterboxError::missing(field.name(), selector)),
                n => {
                    return Err(LetterboxError::ElementNotFound {
                        field: field.name().to_string(),
                        selector,
                        reason: format!("expected exactly one element, found {}", n),
                    })
                }
            }
        }

        let handle = match driver.document_mark().await? {
            Some(existing) => existing,
            None => {
                let fresh = Uuid::new_v4().to_string();
                driver.set_document_mark(&fresh).await?;
                fresh
            }
        };
        debug!("Resolved {} fields, page handle {}", Field::ALL.len(), handle);

        Ok(Self {
            driver,
            handle,
            waiter,
        })
    }

    /// Reload the document and resolve a fresh page object
    pub async fn reload(self) -> Result<Self> {
        info!("Reloading page");
        self.driver.reload().await?;
        Self::new(self.driver, self.waiter).await
    }

    pub fn driver(&self) -> &'a D {
        self.driver
    }

    // --- Actions ---

    /// Clear the email field and type `text` verbatim
    pub async fn enter_email(&self, text: &str) -> Result<()> {
        let selector = self.fresh(Field::EmailInput).await?;
        debug!("Entering email {:?}", text);
        self.driver.clear(&selector).await?;
        self.driver.type_text(&selector, text).await
    }

    pub async fn click_submit(&self) -> Result<()> {
        let selector = self.fresh(Field::SubmitButton).await?;
        self.driver.click(&selector).await
    }

    /// Press Enter in the email field
    pub async fn submit_with_enter_key(&self) -> Result<()> {
        let selector = self.fresh(Field::EmailInput).await?;
        self.driver.press_key(&selector, Key::Enter).await
    }

    /// Click the dismiss control once it is interactable, then wait for the
    /// success modal to go away
    pub async fn dismiss_modal(&self) -> Result<()> {
        let this = self;
        self.waiter
            .require("dismiss button to be clickable", move || {
                this.is_clickable(Field::DismissButton)
            })
            .await?;

        let selector = self.fresh(Field::DismissButton).await?;
        self.driver.click(&selector).await?;

        self.waiter
            .require("success modal to be hidden", move || async move {
                let visible = this.displayed_now(Field::SuccessModal).await?;
                Ok::<bool, LetterboxError>(!visible)
            })
            .await?;
        info!("Modal dismissed");
        Ok(())
    }

    // --- Reads ---

    pub async fn is_modal_displayed(&self, wait: Option<Duration>) -> Result<bool> {
        self.is_displayed(Field::SuccessModal, wait).await
    }

    pub async fn is_error_message_displayed(&self, wait: Option<Duration>) -> Result<bool> {
        self.is_displayed(Field::ErrorMessage, wait).await
    }

    /// Visibility of `field`, optionally after waiting up to `wait` for it to appear
    pub async fn is_displayed(&self, field: Field, wait: Option<Duration>) -> Result<bool> {
        if let Some(bound) = wait {
            let this = self;
            self.waiter
                .with_timeout(bound)
                .until(&format!("{} to be visible", field), move || {
                    this.displayed_now(field)
                })
                .await?;
        }
        self.displayed_now(field).await
    }

    pub async fn confirmed_email(&self) -> Result<String> {
        Ok(self.state(Field::ConfirmedEmail).await?.text)
    }

    pub async fn error_message_text(&self) -> Result<String> {
        Ok(self.state(Field::ErrorMessage).await?.text)
    }

    /// Current value of the email field, empty when unset
    pub async fn email_field_value(&self) -> Result<String> {
        Ok(self
            .state(Field::EmailInput)
            .await?
            .value
            .unwrap_or_default())
    }

    pub async fn email_input_class(&self) -> Result<String> {
        Ok(self.state(Field::EmailInput).await?.class_name)
    }

    /// Attribute of the form container
    pub async fn form_attribute(&self, name: &str) -> Result<Option<String>> {
        let selector = self.fresh(Field::NewsletterForm).await?;
        self.driver.attribute(&selector, name).await
    }

    // --- Internals ---

    /// Selector for `field`, provided this handle still matches the document
    async fn fresh(&self, field: Field) -> Result<String> {
        let selector = field.selector();
        match self.driver.document_mark().await? {
            Some(mark) if mark == self.handle => Ok(selector),
            _ => Err(LetterboxError::stale(field.name(), selector)),
        }
    }

    async fn state(&self, field: Field) -> Result<ElementState> {
        let selector = self.fresh(field).await?;
        self.driver
            .probe(&selector)
            .await?
            .ok_or_else(|| LetterboxError::missing(field.name(), selector))
    }

    async fn displayed_now(&self, field: Field) -> Result<bool> {
        Ok(self.state(field).await?.displayed)
    }

    async fn is_clickable(&self, field: Field) -> Result<bool> {
        let state = self.state(field).await?;
        Ok(state.displayed && state.enabled)
    }
}
