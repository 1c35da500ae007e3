//! Wait/assertion helper for scenarios
//!
//! Bridges the asynchronous page (DOM changes land some time after a click)
//! and the scenarios' synchronous expectations. The policy split:
//!
//! - `wait_for_*` operations are tolerant: they report a [`WaitOutcome`] and
//!   never fail because the state did not arrive in time
//! - `assert_*` operations wait (bounded) for the target state and then
//!   check it; a mismatch is `AssertionFailed`

use tracing::{debug, info};

use crate::driver::PageDriver;
use crate::error::{LetterboxError, Result};
use crate::locators::{Field, VALIDATION_MESSAGE};
use crate::page::NewsletterPage;
use crate::wait::{WaitOutcome, Waiter};

/// How a submission is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitVia {
    Click,
    EnterKey,
}

/// Progress of a single submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Init,
    EmailEntered,
    Submitted,
    Success,
    ErrorShown,
    NoVisibleChange,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Success | SubmissionState::ErrorShown | SubmissionState::NoVisibleChange
        )
    }
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(LetterboxError::AssertionFailed(message.into()))
    }
}

fn ensure_eq(expected: &str, actual: &str, what: &str) -> Result<()> {
    ensure(
        expected == actual,
        format!("{}: expected {:?}, got {:?}", what, expected, actual),
    )
}

/// Bounded waits and the assertion vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct TestHelper {
    waiter: Waiter,
}

impl TestHelper {
    pub fn new(waiter: Waiter) -> Self {
        Self { waiter }
    }

    pub fn waiter(&self) -> Waiter {
        self.waiter
    }

    async fn wait_for<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        field: Field,
        visible: bool,
    ) -> Result<WaitOutcome> {
        let condition = if visible {
            format!("{} to be visible", field)
        } else {
            format!("{} to be hidden", field)
        };
        self.waiter
            .until(&condition, move || async move {
                let shown = page.is_displayed(field, None).await?;
                Ok::<bool, LetterboxError>(shown == visible)
            })
            .await
    }

    // --- Tolerant waits ---

    /// Wait for the success modal; a timeout is reported, not raised
    pub async fn wait_for_modal<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
    ) -> Result<WaitOutcome> {
        let outcome = self.wait_for(page, Field::SuccessModal, true).await?;
        debug!("wait_for_modal: {:?}", outcome);
        Ok(outcome)
    }

    // --- Strict assertions ---

    pub async fn assert_modal_visible<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        self.wait_for(page, Field::SuccessModal, true).await?;
        ensure(
            page.is_modal_displayed(None).await?,
            "Modal was not visible when expected",
        )
    }

    pub async fn assert_modal_hidden<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        self.wait_for(page, Field::SuccessModal, false).await?;
        ensure(
            !page.is_modal_displayed(None).await?,
            "Modal was visible when it should be hidden",
        )
    }

    /// Error element shows exactly the validation message
    pub async fn assert_error_message<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        self.wait_for(page, Field::ErrorMessage, true).await?;
        let text = page.error_message_text().await?;
        ensure_eq(VALIDATION_MESSAGE, &text, "error message text")
    }

    pub async fn assert_error_visible<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        self.wait_for(page, Field::ErrorMessage, true).await?;
        ensure(
            page.is_error_message_displayed(None).await?,
            "Error message was not visible",
        )
    }

    pub async fn assert_error_hidden<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        self.wait_for(page, Field::ErrorMessage, false).await?;
        ensure(
            !page.is_error_message_displayed(None).await?,
            "Error message was visible when it should be hidden",
        )
    }

    /// Confirmation echoes `expected` without surrounding whitespace
    pub async fn assert_confirmed_email<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        expected: &str,
    ) -> Result<()> {
        self.waiter
            .require("confirmed email to be visible", move || {
                page.is_displayed(Field::ConfirmedEmail, None)
            })
            .await?;
        let actual = page.confirmed_email().await?;
        ensure_eq(expected.trim(), &actual, "confirmed email")
    }

    pub async fn assert_input_empty<D: PageDriver>(&self, page: &NewsletterPage<'_, D>) -> Result<()> {
        let value = page.email_field_value().await?;
        ensure_eq("", &value, "email field value")
    }

    pub async fn assert_form_id<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        expected: &str,
    ) -> Result<()> {
        let id = page.form_attribute("id").await?.unwrap_or_default();
        ensure_eq(expected, &id, "form id")
    }

    /// Email input carries an `error` or `invalid` class
    pub async fn assert_input_has_error_class<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
    ) -> Result<()> {
        let flagged = |class: &str| class.contains("error") || class.contains("invalid");

        self.waiter
            .until("email input to get an error class", move || async move {
                let class = page.email_input_class().await?;
                Ok::<bool, LetterboxError>(flagged(&class))
            })
            .await?;

        let class = page.email_input_class().await?;
        ensure(
            flagged(&class),
            format!("email input class {:?} has no error marker", class),
        )
    }

    // --- Composites ---

    async fn submit<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        email: &str,
        via: SubmitVia,
    ) -> Result<SubmissionState> {
        let mut state = SubmissionState::Init;
        debug!("submission {:?}", state);

        page.enter_email(email).await?;
        state = SubmissionState::EmailEntered;
        debug!("submission {:?}", state);

        match via {
            SubmitVia::Click => page.click_submit().await?,
            SubmitVia::EnterKey => page.submit_with_enter_key().await?,
        }
        state = SubmissionState::Submitted;
        debug!("submission {:?} via {:?}", state, via);

        Ok(state)
    }

    /// Submit and classify what the page did within the wait bound
    pub async fn submit_and_observe<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        email: &str,
        via: SubmitVia,
    ) -> Result<SubmissionState> {
        self.submit(page, email, via).await?;

        let outcome = self
            .waiter
            .until("modal or error to appear", move || async move {
                let modal = page.is_modal_displayed(None).await?;
                let error = page.is_error_message_displayed(None).await?;
                Ok::<bool, LetterboxError>(modal || error)
            })
            .await?;

        let state = if !outcome.is_satisfied() {
            SubmissionState::NoVisibleChange
        } else if page.is_modal_displayed(None).await? {
            SubmissionState::Success
        } else {
            SubmissionState::ErrorShown
        };
        info!("Submission of {:?} ended in {:?}", email, state);
        Ok(state)
    }

    /// enter → submit → tolerant modal wait → strict modal assertion
    pub async fn submit_and_expect_success<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        email: &str,
        via: SubmitVia,
    ) -> Result<SubmissionState> {
        self.submit(page, email, via).await?;
        self.wait_for_modal(page).await?;
        self.assert_modal_visible(page).await?;
        debug!("submission {:?}", SubmissionState::Success);
        Ok(SubmissionState::Success)
    }

    /// enter → click submit → exact validation message
    pub async fn submit_and_expect_error<D: PageDriver>(
        &self,
        page: &NewsletterPage<'_, D>,
        email: &str,
    ) -> Result<SubmissionState> {
        self.submit(page, email, SubmitVia::Click).await?;
        self.assert_error_message(page).await?;
        debug!("submission {:?}", SubmissionState::ErrorShown);
        Ok(SubmissionState::ErrorShown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedNewsletter;
    use std::time::Duration;

    fn waiter() -> Waiter {
        Waiter::new(Duration::from_millis(300), Duration::from_millis(10))
    }

    async fn open_page(sim: &SimulatedNewsletter) -> NewsletterPage<'_, SimulatedNewsletter> {
        NewsletterPage::new(sim, waiter()).await.unwrap()
    }

    #[tokio::test]
    async fn test_wait_for_modal_tolerates_absence() {
        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        page.enter_email("invalidemail.com").await.unwrap();
        page.click_submit().await.unwrap();
        let outcome = helper.wait_for_modal(&page).await.unwrap();
        assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_wait_for_modal_reports_latency() {
        let sim = SimulatedNewsletter::new().with_latency(Duration::from_millis(40));
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        page.enter_email("valid1@example.com").await.unwrap();
        page.click_submit().await.unwrap();
        let outcome = helper.wait_for_modal(&page).await.unwrap();
        assert!(matches!(outcome, WaitOutcome::Appeared { .. }));
    }

    #[tokio::test]
    async fn test_success_round_trip() {
        let sim = SimulatedNewsletter::new().with_latency(Duration::from_millis(20));
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        let state = helper
            .submit_and_expect_success(&page, "valid1@example.com", SubmitVia::Click)
            .await
            .unwrap();
        assert_eq!(state, SubmissionState::Success);
        assert!(state.is_terminal());
        assert_eq!(page.confirmed_email().await.unwrap(), "valid1@example.com");
        helper
            .assert_confirmed_email(&page, "valid1@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_success_expectation_fails_on_invalid_input() {
        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        let err = helper
            .submit_and_expect_success(&page, "nodomain@", SubmitVia::Click)
            .await
            .unwrap_err();
        match err {
            LetterboxError::AssertionFailed(message) => {
                assert_eq!(message, "Modal was not visible when expected")
            }
            other => panic!("expected assertion failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_expectation() {
        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        let state = helper
            .submit_and_expect_error(&page, "double@@example.com")
            .await
            .unwrap();
        assert_eq!(state, SubmissionState::ErrorShown);
        helper.assert_error_visible(&page).await.unwrap();
        helper.assert_modal_hidden(&page).await.unwrap();
        helper.assert_input_has_error_class(&page).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_expectation_fails_on_valid_input() {
        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        let err = helper
            .submit_and_expect_error(&page, "valid1@example.com")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("error message text"));
    }

    #[tokio::test]
    async fn test_initial_state_assertions() {
        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let helper = TestHelper::new(waiter());

        helper.assert_error_hidden(&page).await.unwrap();
        helper.assert_modal_hidden(&page).await.unwrap();
        helper.assert_input_empty(&page).await.unwrap();
        helper.assert_form_id(&page, "newsletter-form").await.unwrap();
        assert!(helper.assert_form_id(&page, "signup").await.is_err());
    }

    #[tokio::test]
    async fn test_observe_classifies_outcomes() {
        let helper = TestHelper::new(waiter());

        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let state = helper
            .submit_and_observe(&page, "enter1@example.com", SubmitVia::EnterKey)
            .await
            .unwrap();
        assert_eq!(state, SubmissionState::Success);

        let sim = SimulatedNewsletter::new();
        let page = open_page(&sim).await;
        let state = helper
            .submit_and_observe(&page, "", SubmitVia::Click)
            .await
            .unwrap();
        assert_eq!(state, SubmissionState::ErrorShown);
    }

    #[tokio::test]
    async fn test_observe_reports_no_visible_change() {
        let helper = TestHelper::new(Waiter::new(Duration::from_millis(30), Duration::from_millis(10)));
        let sim = SimulatedNewsletter::new().with_latency(Duration::from_secs(5));
        let page = open_page(&sim).await;

        let state = helper
            .submit_and_observe(&page, "slow@example.com", SubmitVia::Click)
            .await
            .unwrap();
        assert_eq!(state, SubmissionState::NoVisibleChange);
    }
}
