//! Directory tree rendering for the repository structure document

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

/// First fenced code block of a markdown document
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```\n.*?```").expect("valid regex"));

/// Which directories to hide or summarize
#[derive(Debug, Clone)]
pub struct TreeOptions {
    /// Directory names left out entirely
    pub exclude: Vec<String>,
    /// Directory names shown with a file count instead of their contents
    pub collapse: Vec<String>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            exclude: [".git", "__pycache__", "target"].map(String::from).to_vec(),
            collapse: ["images", "xlsx", "sheets"].map(String::from).to_vec(),
        }
    }
}

/// Render `root` as a tree, starting with `root_name/`
pub fn render_tree<P: AsRef<Path>>(root: P, options: &TreeOptions) -> String {
    let root = root.as_ref();
    let root_name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut lines = vec![format!("{}/", root_name)];
    lines.extend(build_tree(root, options));
    lines.join("\n")
}

/// Tree lines for the contents of `dir`
///
/// Directories come first, then files, each sorted case-insensitively.
pub fn build_tree(dir: &Path, options: &TreeOptions) -> Vec<String> {
    let mut lines = Vec::new();
    push_entries(dir, "", options, &mut lines);
    lines
}

fn push_entries(dir: &Path, prefix: &str, options: &TreeOptions, lines: &mut Vec<String>) {
    let mut entries: Vec<DirEntry> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !options.exclude.iter().any(|x| *x == e.file_name().to_string_lossy()))
        .collect();

    entries.sort_by_key(|e| {
        (
            !e.file_type().is_dir(),
            e.file_name().to_string_lossy().to_lowercase(),
        )
    });

    let count = entries.len();
    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { "└── " } else { "├── " };
        let child_prefix = if is_last { "    " } else { "│   " };
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            if options.collapse.iter().any(|c| *c == name) {
                let files = fs::read_dir(entry.path()).map(|d| d.count()).unwrap_or(0);
                lines.push(format!("{}{}{}/  （{} ファイル）", prefix, connector, name, files));
            } else {
                lines.push(format!("{}{}{}/", prefix, connector, name));
                push_entries(
                    entry.path(),
                    &format!("{}{}", prefix, child_prefix),
                    options,
                    lines,
                );
            }
        } else {
            lines.push(format!("{}{}{}", prefix, connector, name));
        }
    }
}

/// Replace the first code block of a structure document with `tree`
///
/// Returns whether the file changed.
pub fn update_structure_file<P: AsRef<Path>>(path: P, tree: &str) -> Result<bool> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let Some(block) = CODE_BLOCK_RE.find(&content) else {
        return Err(Error::StructureBlockMissing(path.to_path_buf()));
    };

    let updated = format!(
        "{}```\n{}\n```{}",
        &content[..block.start()],
        tree,
        &content[block.end()..]
    );
    if updated == content {
        return Ok(false);
    }

    fs::write(path, updated)?;
    Ok(true)
}
