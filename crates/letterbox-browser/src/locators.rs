//! Element locator set for the newsletter sign-up form

use serde::{Deserialize, Serialize};
use std::fmt;

/// Exact text of the error element after an invalid submission
pub const VALIDATION_MESSAGE: &str = "Valid email required";

/// How an element is found in the rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Id,
    ClassName,
    Css,
}

/// Immutable lookup for one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub strategy: Strategy,
    pub value: &'static str,
}

impl Locator {
    pub const fn id(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            value,
        }
    }

    pub const fn class_name(value: &'static str) -> Self {
        Self {
            strategy: Strategy::ClassName,
            value,
        }
    }

    pub const fn css(value: &'static str) -> Self {
        Self {
            strategy: Strategy::Css,
            value,
        }
    }

    /// CSS selector equivalent of this locator
    pub fn selector(&self) -> String {
        match self.strategy {
            Strategy::Id => format!("#{}", self.value),
            Strategy::ClassName => format!(".{}", self.value),
            Strategy::Css => self.value.to_string(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.selector())
    }
}

/// Logical fields of the sign-up form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    EmailInput,
    SubmitButton,
    ErrorMessage,
    SuccessModal,
    ConfirmedEmail,
    DismissButton,
    NewsletterForm,
}

impl Field {
    /// Every field the page object resolves at construction
    pub const ALL: [Field; 7] = [
        Field::EmailInput,
        Field::SubmitButton,
        Field::ErrorMessage,
        Field::SuccessModal,
        Field::ConfirmedEmail,
        Field::DismissButton,
        Field::NewsletterForm,
    ];

    pub const fn locator(&self) -> Locator {
        match self {
            Field::EmailInput => Locator::id("email"),
            Field::SubmitButton => Locator::class_name("submit-btn"),
            Field::ErrorMessage => Locator::class_name("error-message"),
            Field::SuccessModal => Locator::id("modal"),
            Field::ConfirmedEmail => Locator::id("confirm-email"),
            Field::DismissButton => Locator::id("dismiss-btn"),
            Field::NewsletterForm => Locator::id("newsletter-form"),
        }
    }

    /// Name used in error messages and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Field::EmailInput => "email input",
            Field::SubmitButton => "submit button",
            Field::ErrorMessage => "error message",
            Field::SuccessModal => "success modal",
            Field::ConfirmedEmail => "confirmed email",
            Field::DismissButton => "dismiss button",
            Field::NewsletterForm => "newsletter form",
        }
    }

    pub fn selector(&self) -> String {
        self.locator().selector()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
