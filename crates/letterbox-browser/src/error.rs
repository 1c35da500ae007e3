//! Browser error types - re-exports the unified LetterboxError from letterbox-core
//!
//! Page contract failures use `ElementNotFound`, `Timeout` and `AssertionFailed`.
//! Driver failures (launch, navigation, CDP, JavaScript evaluation) use `Browser`.
//! Screenshot failures use `ScreenshotFailed`.

pub use letterbox_core::{LetterboxError, Result};

pub type BrowserError = LetterboxError;
