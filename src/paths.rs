use std::path::{Path, PathBuf};

/// Resolve a configured locale path for a source file.
///
/// One leading `./` or `/` is dropped, so configured paths are always relative.
/// Paths under `packages/` belong to the monorepo and resolve against
/// `workspace_root` when one is known; everything else resolves next to the
/// source file.
pub fn resolve_output_path(input: &str, source_dir: &Path, workspace_root: Option<&Path>) -> PathBuf {
    let relative = input
        .strip_prefix("./")
        .or_else(|| input.strip_prefix('/'))
        .unwrap_or(input);

    match workspace_root {
        Some(root) if relative.starts_with("packages/") => root.join(relative),
        _ => source_dir.join(relative),
    }
}
