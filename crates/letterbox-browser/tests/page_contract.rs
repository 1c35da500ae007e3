//! Behavioural properties of the page object and helper against the
//! simulated sign-up form.

use letterbox_browser::{
    BrowserError, NewsletterPage, SessionLauncher, SimLauncher, SubmitVia, TestHelper, Waiter,
    VALIDATION_MESSAGE,
};
use std::time::Duration;

const VALID_INPUTS: [&str; 6] = [
    "valid1@example.com",
    "  spaced@example.com  ",
    "UPPERCASE@EXAMPLE.COM",
    "special!@example.com",
    "success1@example.com",
    "enter1@example.com",
];

const INVALID_INPUTS: [&str; 5] = ["", "invalidemail.com", "double@@example.com", "nodomain@", "invalid1"];

fn waiter() -> Waiter {
    Waiter::new(Duration::from_millis(500), Duration::from_millis(10))
}

fn launcher() -> SimLauncher {
    SimLauncher::new("sim://newsletter").with_latency(Duration::from_millis(25))
}

fn long_email() -> String {
    format!("{}@example.com", "a".repeat(50))
}

#[tokio::test]
async fn test_valid_inputs_show_modal() {
    let launcher = launcher();
    let helper = TestHelper::new(waiter());

    let mut inputs: Vec<String> = VALID_INPUTS.iter().map(|s| s.to_string()).collect();
    inputs.push(long_email());

    for input in inputs {
        let session = launcher.open().await.unwrap();
        let page = NewsletterPage::new(&session, waiter()).await.unwrap();

        helper
            .submit_and_expect_success(&page, &input, SubmitVia::Click)
            .await
            .unwrap_or_else(|e| panic!("{:?} should succeed: {}", input, e));
        assert!(page.is_modal_displayed(None).await.unwrap(), "{:?}", input);

        drop(page);
        launcher.close(session).await.unwrap();
    }
}

#[tokio::test]
async fn test_invalid_inputs_show_error_and_no_modal() {
    let launcher = launcher();
    let helper = TestHelper::new(waiter());

    for input in INVALID_INPUTS {
        let session = launcher.open().await.unwrap();
        let page = NewsletterPage::new(&session, waiter()).await.unwrap();

        helper.submit_and_expect_error(&page, input).await.unwrap();
        assert_eq!(page.error_message_text().await.unwrap(), VALIDATION_MESSAGE);
        assert!(!page
            .is_modal_displayed(Some(Duration::from_millis(60)))
            .await
            .unwrap());
    }
}

#[tokio::test]
async fn test_enter_key_submission() {
    let launcher = launcher();
    let session = launcher.open().await.unwrap();
    let page = NewsletterPage::new(&session, waiter()).await.unwrap();
    let helper = TestHelper::new(waiter());

    helper
        .submit_and_expect_success(&page, "enter1@example.com", SubmitVia::EnterKey)
        .await
        .unwrap();
    helper
        .assert_confirmed_email(&page, "enter1@example.com")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_dismiss_then_modal_hidden_within_bound() {
    let launcher = launcher();
    let session = launcher.open().await.unwrap();
    let page = NewsletterPage::new(&session, waiter()).await.unwrap();
    let helper = TestHelper::new(waiter());

    helper
        .submit_and_expect_success(&page, "dismiss1@example.com", SubmitVia::Click)
        .await
        .unwrap();
    page.dismiss_modal().await.unwrap();
    assert!(!page.is_modal_displayed(None).await.unwrap());
}

#[tokio::test]
async fn test_reload_resets_and_invalidates_old_handle() {
    let launcher = launcher();
    let session = launcher.open().await.unwrap();
    let page = NewsletterPage::new(&session, waiter()).await.unwrap();
    page.enter_email("refresh1@example.com").await.unwrap();

    // A second page object on the same document shares its handle
    let second = NewsletterPage::new(&session, waiter()).await.unwrap();
    assert_eq!(
        second.email_field_value().await.unwrap(),
        "refresh1@example.com"
    );

    let page = page.reload().await.unwrap();
    assert_eq!(page.email_field_value().await.unwrap(), "");

    let err = second.email_field_value().await.unwrap_err();
    assert!(matches!(err, BrowserError::ElementNotFound { .. }));
}
