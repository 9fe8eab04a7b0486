//! Utility functions shared across the crate.

use std::path::{Path, PathBuf};

/// Get the user's config directory following XDG conventions.
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise `$HOME/.config`.
pub fn config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}

/// Default path for the translated text of `input`: `<stem>-<target>.txt`
/// next to the input file.
pub fn default_output_path(input: &Path, target: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("translated");
    input.with_file_name(format!("{stem}-{target}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(Path::new("/tmp/report.pdf"), "si");
        assert_eq!(path, PathBuf::from("/tmp/report-si.txt"));
    }
}
