use crate::error::{SnbtError, SnbtResult};
use crate::parser::Parser;
use crate::tag::TagNode;
use crate::writer::{Style, to_snbt};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Read and parse a single SNBT file
///
/// # Errors
/// - File not found or unreadable
/// - Malformed SNBT (the error carries line and column)
pub fn load_file(path: &Path) -> SnbtResult<TagNode> {
    let content = fs::read_to_string(path)
        .map_err(|e| SnbtError::Io(format!("Failed to read file '{}': {}", path.display(), e)))?;

    Parser::new(&content).parse()
}

/// Serialize a tree and write it to `path`, replacing any existing content
///
/// The text goes to a temporary file in the same directory first, which is
/// then renamed over `path`; a failed write leaves the old file intact.
pub fn save_file(path: &Path, node: &TagNode, style: Style) -> SnbtResult<()> {
    let mut text = to_snbt(node, style);
    text.push('\n');

    let write_error =
        |e: std::io::Error| SnbtError::Io(format!("Failed to write file '{}': {}", path.display(), e));
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(text.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    if let Ok(meta) = fs::metadata(path) {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(write_error)?;
    }
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

/// Collect every `*.snbt` file under `dir`, walking subdirectories top-down
///
/// Entries of each directory are sorted by name so the order is stable
/// across platforms. If `dir` is itself a file it is returned as-is.
pub fn collect_snbt_files(dir: &Path) -> SnbtResult<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(SnbtError::Io(format!("Path not found: {}", dir.display())));
    }

    if dir.is_file() {
        return Ok(vec![dir.to_path_buf()]);
    }

    let mut files = Vec::new();
    walk(dir, &mut files)?;
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> SnbtResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| SnbtError::Io(format!("Failed to read directory '{}': {}", dir.display(), e)))?;

    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SnbtError::Io(format!("Error reading directory entry: {}", e)))?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some("snbt") {
            files.push(path);
        }
    }

    Ok(())
}
