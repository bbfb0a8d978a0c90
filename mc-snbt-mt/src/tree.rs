//! Recursive translation of string leaves in a tag tree
//!
//! The walk visits nodes in document order: compound entries in their stored
//! order, list elements by index. A string is translated only when it is a
//! direct child of a compound and the predicate accepts its key; strings that
//! sit directly in a list have no key and are never offered to the predicate.
//!
//! # Example
//!
//! ```ignore
//! use mc_snbt_mt::{TreeTranslator, XunfeiTranslator, key_contains};
//!
//! let mut quest = mc_snbt::parse(r#"{ title: "Getting Started", x: 1.0d }"#)?;
//! let translator = TreeTranslator::new(XunfeiTranslator::from_env()?, key_contains("title"));
//! let report = translator.translate(&mut quest).await?;
//! println!("{} leaves translated", report.requested);
//! ```

use crate::error::MtResult;
use crate::translator::StringTranslator;
use mc_snbt::TagNode;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Decides, from a compound key and its string value, whether to translate
pub type Predicate = Box<dyn Fn(&str, &TagNode) -> bool + Send + Sync>;

type WalkFuture<'a> = Pin<Box<dyn Future<Output = MtResult<()>> + Send + 'a>>;

/// What happened during one pass over a tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationReport {
    /// Leaves that matched the predicate and were sent for translation
    pub requested: usize,
    /// Leaves whose provider call failed; they now hold an empty string
    pub failed: usize,
    /// Non-empty leaves that came back empty (absorbed transport failures)
    pub emptied: usize,
}

impl TranslationReport {
    pub fn merge(&mut self, other: TranslationReport) {
        self.requested += other.requested;
        self.failed += other.failed;
        self.emptied += other.emptied;
    }
}

/// Rewrites the string leaves of a tag tree in place
pub struct TreeTranslator<T> {
    translator: T,
    need_translation: Predicate,
}

impl<T: StringTranslator> TreeTranslator<T> {
    pub fn new<P>(translator: T, need_translation: P) -> Self
    where
        P: Fn(&str, &TagNode) -> bool + Send + Sync + 'static,
    {
        Self {
            translator,
            need_translation: Box::new(need_translation),
        }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Translate every matching leaf under `node`, in document order
    ///
    /// A recoverable provider error leaves that leaf empty and the walk goes
    /// on. Fatal errors (bad configuration, a response that broke the
    /// expected schema) stop the walk and are returned; leaves already
    /// rewritten stay rewritten.
    ///
    /// Running this twice translates the already-translated text again.
    pub async fn translate(&self, node: &mut TagNode) -> MtResult<TranslationReport> {
        let mut report = TranslationReport::default();
        self.walk(node, &mut report).await?;
        Ok(report)
    }

    fn walk<'a>(&'a self, node: &'a mut TagNode, report: &'a mut TranslationReport) -> WalkFuture<'a> {
        Box::pin(async move {
            match node {
                TagNode::Compound(map) => {
                    for (key, child) in map.iter_mut() {
                        if child.is_string() && (self.need_translation)(key.as_str(), &*child) {
                            self.translate_leaf(key, child, report).await?;
                        } else {
                            self.walk(child, report).await?;
                        }
                    }
                }
                TagNode::List(items) => {
                    for item in items.iter_mut() {
                        self.walk(item, report).await?;
                    }
                }
                TagNode::Byte(_)
                | TagNode::Bool(_)
                | TagNode::Short(_)
                | TagNode::Int(_)
                | TagNode::Long(_)
                | TagNode::Float(_)
                | TagNode::Double(_)
                | TagNode::String(_)
                | TagNode::ByteArray(_)
                | TagNode::IntArray(_)
                | TagNode::LongArray(_) => {}
            }
            Ok(())
        })
    }

    async fn translate_leaf(
        &self,
        key: &str,
        leaf: &mut TagNode,
        report: &mut TranslationReport,
    ) -> MtResult<()> {
        let TagNode::String(text) = leaf else {
            return Ok(());
        };
        report.requested += 1;

        let translated = match self.translator.translate(text).await {
            Ok(translated) => translated,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(key, source = %text, error = %err, "translation failed, leaf left empty");
                report.failed += 1;
                String::new()
            }
        };

        if translated.is_empty() && !text.is_empty() {
            report.emptied += 1;
        }
        debug!(key, source = %text, translated = %translated, "leaf translated");
        *text = translated;
        Ok(())
    }
}

/// Match string values whose key contains `fragment`, ignoring case
///
/// `key_contains("title")` accepts `title`, `subtitle` and `Title`.
pub fn key_contains(fragment: &str) -> impl Fn(&str, &TagNode) -> bool + Send + Sync + use<> {
    let fragment = fragment.to_lowercase();
    move |key: &str, value: &TagNode| value.is_string() && key.to_lowercase().contains(&fragment)
}

/// Match string values whose key contains any of `fragments`, ignoring case
pub fn key_contains_any<I, S>(fragments: I) -> impl Fn(&str, &TagNode) -> bool + Send + Sync + use<I, S>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let fragments: Vec<String> = fragments
        .into_iter()
        .map(|f| f.as_ref().to_lowercase())
        .collect();
    move |key: &str, value: &TagNode| {
        let key = key.to_lowercase();
        value.is_string() && fragments.iter().any(|f| key.contains(f.as_str()))
    }
}

/// Match string values whose key matches `pattern`
pub fn key_matches(pattern: Regex) -> impl Fn(&str, &TagNode) -> bool + Send + Sync + use<> {
    move |key: &str, value: &TagNode| value.is_string() && pattern.is_match(key)
}
