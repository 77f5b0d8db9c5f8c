use anyhow::{Context, Result};
use std::path::PathBuf;

const GLOB_CHARS: &[char] = &['*', '?', '['];

/// Expand glob patterns; plain paths pass through untouched so a missing
/// file is reported per file instead of silently dropped.
pub fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !pattern.contains(GLOB_CHARS) {
            files.push(PathBuf::from(pattern));
            continue;
        }

        tracing::debug!("Glob pattern: {}", pattern);
        let mut matched = 0;
        for entry in glob::glob(pattern).with_context(|| format!("Invalid pattern: {}", pattern))? {
            match entry {
                Ok(path) if path.is_file() => {
                    files.push(path);
                    matched += 1;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Glob error: {}", e),
            }
        }

        if matched == 0 {
            tracing::warn!("No files matched pattern: {}", pattern);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_and_literal_inputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "c.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();

        let pattern = format!("{}/*.png", dir.path().display());
        let literal = dir.path().join("missing.gif").display().to_string();
        let files = resolve_inputs(&[pattern, literal]).unwrap();

        // glob yields sorted matches and skips directories
        assert_eq!(
            files,
            vec![
                dir.path().join("a.png"),
                dir.path().join("b.png"),
                dir.path().join("missing.gif"),
            ]
        );
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(resolve_inputs(&["[".to_string()]).is_err());
    }
}
