//! Browser automation for the newsletter sign-up form
//!
//! This crate holds everything between a scenario and the rendered page:
//!
//! - [`locators`]: the fixed element locator set of the form
//! - [`driver`]: the [`PageDriver`] / [`SessionLauncher`] seam
//! - [`browser`]: Chrome DevTools Protocol sessions via `headless_chrome`
//! - [`sim`]: an in-memory page with the same element contract
//! - [`page`]: the [`NewsletterPage`] page object
//! - [`wait`]: flat poll-until-timeout waits
//! - [`helper`]: the [`TestHelper`] wait/assertion vocabulary
//! - [`screenshot`]: PNG capture for failed scenarios
//!
//! # Example
//!
//! ```no_run
//! use letterbox_browser::{NewsletterPage, SessionLauncher, SimLauncher, SubmitVia, TestHelper, Waiter};
//!
//! #[tokio::main]
//! async fn main() -> letterbox_browser::Result<()> {
//!     let launcher = SimLauncher::new("sim://newsletter");
//!     let session = launcher.open().await?;
//!
//!     let page = NewsletterPage::new(&session, Waiter::default()).await?;
//!     let helper = TestHelper::default();
//!     helper
//!         .submit_and_expect_success(&page, "valid1@example.com", SubmitVia::Click)
//!         .await?;
//!     assert_eq!(page.confirmed_email().await?, "valid1@example.com");
//!
//!     launcher.close(session).await
//! }
//! ```

pub mod browser;
pub mod driver;
pub mod error;
pub mod helper;
pub mod locators;
pub mod page;
pub mod screenshot;
pub mod sim;
pub mod wait;

// Re-export commonly used types
pub use browser::{BrowserConfig, BrowserSession, ChromeLauncher};
pub use driver::{ElementState, Key, PageDriver, SessionLauncher};
pub use error::{BrowserError, LetterboxError, Result};
pub use helper::{SubmissionState, SubmitVia, TestHelper};
pub use locators::{Field, Locator, Strategy, VALIDATION_MESSAGE};
pub use page::NewsletterPage;
pub use screenshot::ScreenshotCapture;
pub use sim::{SimLauncher, SimulatedNewsletter};
pub use wait::{WaitOutcome, Waiter};
