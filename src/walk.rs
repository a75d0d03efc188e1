use std::path::{Path, PathBuf};

use color_eyre::{eyre::eyre, Result};
use ignore::WalkBuilder;

/// A file to lex, and whether it was found by walking a directory rather
/// than named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub walked: bool,
}

/// Expands the command-line inputs into the files to lex. Files are kept as
/// given; directories are walked respecting `.gitignore` and friends, and
/// their files are returned in sorted order.
pub fn collect_files(inputs: &[PathBuf]) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            files.extend(
                walk_dir(input)?
                    .into_iter()
                    .map(|path| SourceFile { path, walked: true }),
            );
        } else if input.is_file() {
            files.push(SourceFile {
                path: input.clone(),
                walked: false,
            });
        } else {
            return Err(eyre!("No such file or directory: '{}'", input.display()));
        }
    }

    Ok(files)
}

fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkBuilder::new(dir).build() {
        let entry = entry?;
        if entry.file_type().map_or(false, |kind| kind.is_file()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), files = files.len(), "walked directory");

    Ok(files)
}
