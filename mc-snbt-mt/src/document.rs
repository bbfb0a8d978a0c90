//! Translating SNBT files on disk

use crate::error::MtResult;
use crate::translator::StringTranslator;
use crate::tree::{TranslationReport, TreeTranslator};
use mc_snbt::{Style, load_file, save_file};
use std::path::Path;
use tracing::info;

/// Load `path`, translate it, and write it back unless `dry_run` is set
///
/// A fatal error leaves the file on disk untouched.
pub async fn translate_file<T: StringTranslator>(
    translator: &TreeTranslator<T>,
    path: &Path,
    style: Style,
    dry_run: bool,
) -> MtResult<TranslationReport> {
    let mut tree = load_file(path)?;
    let nodes = tree.node_count();
    let report = translator.translate(&mut tree).await?;

    if !dry_run && report.requested > 0 {
        save_file(path, &tree, style)?;
    }

    info!(
        path = %path.display(),
        nodes,
        requested = report.requested,
        failed = report.failed,
        emptied = report.emptied,
        dry_run,
        "document translated"
    );
    Ok(report)
}
