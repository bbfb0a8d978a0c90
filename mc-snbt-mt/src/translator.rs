//! String translation capability
//!
//! This module defines the `StringTranslator` trait, the single capability the
//! tree rewrite needs: turn one source-language string into one
//! target-language string. Providers (the iFlytek client, the mock) implement
//! it; the language pair is part of each provider's configuration.
//!
//! # Example
//!
//! ```ignore
//! use mc_snbt_mt::{StringTranslator, XunfeiTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = XunfeiTranslator::from_env()?;
//!     let result = provider.translate("Getting Started").await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// Capability that converts source-language text into target-language text
///
/// Implementations may perform network I/O. Callers await each call before
/// issuing the next one.
#[async_trait]
pub trait StringTranslator: Send + Sync {
    /// Translate a single text string
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The translated text. Providers that absorb transport
    ///   failures return an empty string here.
    /// * `Err(MtError)` - If translation fails in a way the provider does not
    ///   absorb
    async fn translate(&self, text: &str) -> MtResult<String>;

    /// Get the name of this translation provider
    ///
    /// Used for logging to identify which provider handled a translation.
    fn provider_name(&self) -> &str;
}

#[async_trait]
impl<T: StringTranslator + ?Sized> StringTranslator for Box<T> {
    async fn translate(&self, text: &str) -> MtResult<String> {
        (**self).translate(text).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Validate that a language code is in acceptable format
///
/// iFlytek uses short codes such as `en`, `cn`, `ja` and `cht`; the check
/// only rejects empty codes and characters no language code contains.
///
/// # Example
///
/// ```ignore
/// validate_locale("cn")?; // OK
/// validate_locale("zh-Hans")?; // OK
/// validate_locale("invalid@code").unwrap_err(); // Error
/// ```
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale(
            "Locale code is empty".to_string(),
        ));
    }

    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }

    Ok(())
}
