use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Image extensions accepted when no `--format` is given.
pub const DEFAULT_FORMATS: &str = "jpg,jpeg,png";

/// Parse a comma-separated extension list like `"jpg, PNG,.gif"`.
///
/// Extensions are lowercased and stripped of a leading dot.
pub fn parse_formats(spec: &str) -> Result<Vec<String>> {
    let formats: Vec<String> = spec
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();

    if formats.is_empty() {
        return Err(Error::Config(format!(
            "format specification is incorrect: {spec:?}"
        )));
    }
    Ok(formats)
}

/// Collect the image files to add from `path`.
///
/// A file path is returned as-is when its extension is accepted. A directory
/// is scanned for accepted files, descending into subdirectories only when
/// `recursive` is set. Hidden files and directories are skipped, and symbolic
/// links are collected only when they point at a file. Results are absolute
/// and sorted.
pub fn discover_images(
    path: &Path,
    recursive: bool,
    formats: &[String],
) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(Error::NotFound {
            kind: "path",
            name: path.display().to_string(),
        });
    }

    let canonical = path.canonicalize()?;
    let mut results = Vec::new();
    if canonical.is_file() {
        if is_supported(&canonical, formats) {
            results.push(canonical);
        }
    } else {
        walk_dir(&canonical, recursive, formats, &mut results)?;
        results.sort();
    }
    Ok(results)
}

fn walk_dir(
    current: &Path,
    recursive: bool,
    formats: &[String],
    results: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let file_name = entry.file_name();

        // Skip hidden files and directories.
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        let path = entry.path();

        if file_type.is_dir() {
            if recursive {
                walk_dir(&path, recursive, formats, results)?;
            }
        } else if file_type.is_symlink() {
            let resolved = match path.canonicalize() {
                Ok(p) => p,
                Err(_) => continue, // Skip broken symlinks
            };
            // Linked directories are never followed, so a link to the root
            // or one of its ancestors cannot loop the walk.
            if resolved.is_file() && is_supported(&path, formats) {
                results.push(path);
            }
        } else if file_type.is_file() && is_supported(&path, formats) {
            results.push(path);
        }
    }

    Ok(())
}

fn is_supported(path: &Path, formats: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            formats.iter().any(|f| f.eq_ignore_ascii_case(ext))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_formats() -> Vec<String> {
        parse_formats(DEFAULT_FORMATS).unwrap()
    }

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        files
            .iter()
            .map(|f| {
                f.strip_prefix(&root).unwrap().to_string_lossy().to_string()
            })
            .collect()
    }

    #[test]
    fn parse_formats_normalizes() {
        assert_eq!(
            parse_formats(" JPG,.png ,gif").unwrap(),
            vec!["jpg", "png", "gif"]
        );
    }

    #[test]
    fn parse_formats_rejects_empty() {
        assert!(matches!(parse_formats(" , "), Err(Error::Config(_))));
    }

    #[test]
    fn discovers_images_only() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.png"), "x").unwrap();
        std::fs::write(tmp.path().join("b.JPG"), "x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let files =
            discover_images(tmp.path(), false, &default_formats()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["a.png", "b.JPG"]);
    }

    #[test]
    fn non_recursive_ignores_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("deep.png"), "x").unwrap();
        std::fs::write(tmp.path().join("top.png"), "x").unwrap();

        let files =
            discover_images(tmp.path(), false, &default_formats()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["top.png"]);
    }

    #[test]
    fn recursive_descends_into_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("deep.png"), "x").unwrap();
        std::fs::write(tmp.path().join("top.png"), "x").unwrap();

        let files =
            discover_images(tmp.path(), true, &default_formats()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["sub/deep.png", "top.png"]);
    }

    #[test]
    fn skips_hidden_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let hidden = tmp.path().join(".cache");
        std::fs::create_dir(&hidden).unwrap();
        std::fs::write(hidden.join("a.png"), "x").unwrap();
        std::fs::write(tmp.path().join(".b.png"), "x").unwrap();
        std::fs::write(tmp.path().join("c.png"), "x").unwrap();

        let files =
            discover_images(tmp.path(), true, &default_formats()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["c.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_is_collected() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("memes");
        std::fs::create_dir(&root).unwrap();
        let target = tmp.path().join("elsewhere.png");
        std::fs::write(&target, "x").unwrap();
        std::os::unix::fs::symlink(&target, root.join("linked.png")).unwrap();

        let files = discover_images(&root, true, &default_formats()).unwrap();
        assert_eq!(names(&root, &files), vec!["linked.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_inside_root_is_not_walked_twice() {
        let tmp = tempfile::tempdir().unwrap();
        let sub = tmp.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("deep.png"), "x").unwrap();
        std::os::unix::fs::symlink(&sub, tmp.path().join("again")).unwrap();

        let files =
            discover_images(tmp.path(), true, &default_formats()).unwrap();
        assert_eq!(names(tmp.path(), &files), vec!["sub/deep.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_ancestor_does_not_loop() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("memes");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("a.png"), "x").unwrap();
        std::os::unix::fs::symlink(tmp.path(), root.join("up")).unwrap();
        std::os::unix::fs::symlink(&root, root.join("self")).unwrap();

        let files = discover_images(&root, true, &default_formats()).unwrap();
        assert_eq!(names(&root, &files), vec!["a.png"]);
    }

    #[test]
    fn single_file_is_returned() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("one.jpeg");
        std::fs::write(&file, "x").unwrap();

        let files = discover_images(&file, false, &default_formats()).unwrap();
        assert_eq!(files, vec![file.canonicalize().unwrap()]);
    }

    #[test]
    fn single_file_with_other_extension_is_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("one.gif");
        std::fs::write(&file, "x").unwrap();

        let files = discover_images(&file, false, &default_formats()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_path_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = discover_images(
            &tmp.path().join("missing"),
            false,
            &default_formats(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }
}
