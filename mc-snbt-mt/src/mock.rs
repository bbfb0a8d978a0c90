//! Mock string translator for testing
//!
//! This module provides a deterministic, API-free translator for exercising
//! the tree rewrite without credentials or network access. It also records
//! every text it was asked to translate, in call order.
//!
//! # Example
//!
//! ```ignore
//! use mc_snbt_mt::{MockMode, MockTranslator, StringTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Suffix("cn".to_string()));
//!     let result = mock.translate("hello").await.unwrap();
//!     assert_eq!(result, "hello_cn");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::StringTranslator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append a language suffix: "hello" → "hello_cn"
    Suffix(String),

    /// Use predefined mappings; unknown texts come back unchanged
    Mappings(HashMap<String, String>),

    /// Behave like a client that absorbed a transport failure: always ""
    Empty,

    /// Simulate a recoverable provider error
    Error(String),

    /// Simulate a response that broke the expected schema (fatal)
    SchemaError(String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
    calls: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self::with_delay(mode, 0)
    }

    /// Create a MockTranslator with simulated network delay
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            mode,
            delay_ms,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Texts passed to `translate` so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, text: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix(target) => Ok(format!("{}_{}", text, target)),
            MockMode::Mappings(map) => Ok(map.get(text).cloned().unwrap_or_else(|| text.to_string())),
            MockMode::Empty => Ok(String::new()),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::SchemaError(msg) => Err(MtError::ResponseSchemaError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl StringTranslator for MockTranslator {
    async fn translate(&self, text: &str) -> MtResult<String> {
        self.record(text);
        self.apply_delay().await;
        self.apply_translation(text)
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}
