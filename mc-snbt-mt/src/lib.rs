//! Machine translation for SNBT documents
//!
//! This crate translates selected string leaves of SNBT tag trees (FTB Quests
//! chapters and similar mod configuration) through the iFlytek translation
//! API.
//!
//! # Workflow Example
//!
//! ```ignore
//! use mc_snbt_mt::{TreeTranslator, XunfeiTranslator, key_contains};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Parse a document
//!     let mut tree = mc_snbt::load_file("chapters/intro.snbt".as_ref())?;
//!
//!     // 2. Bind a provider and a predicate
//!     let provider = XunfeiTranslator::from_env()?;
//!     let translator = TreeTranslator::new(provider, key_contains("title"));
//!
//!     // 3. Rewrite matching leaves in place
//!     let report = translator.translate(&mut tree).await?;
//!
//!     // 4. Persist
//!     mc_snbt::save_file("chapters/intro.snbt".as_ref(), &tree, mc_snbt::Style::Pretty)?;
//!     println!("{} leaves translated", report.requested);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod mock;
pub mod signer;
pub mod translator;
pub mod tree;
pub mod xunfei;

// Integration tests (only available during testing)
#[cfg(test)]
mod integration_tests;

// Re-export main types for convenient access
pub use config::{Credentials, XunfeiConfig};
pub use document::translate_file;
pub use error::{MtError, MtResult};
pub use mock::{MockMode, MockTranslator};
pub use signer::{SignedHeaders, Signer};
pub use translator::StringTranslator;
pub use tree::{Predicate, TranslationReport, TreeTranslator, key_contains, key_contains_any, key_matches};
pub use xunfei::XunfeiTranslator;
