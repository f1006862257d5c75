use std::fs;
use std::path::Path;

use anyhow::Context;
use pairflip_core::CardFace;

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}

/// Image files directly inside `folder`, sorted by path. Subfolders are not searched.
pub(crate) fn list_images(folder: &Path, extensions: &[String]) -> anyhow::Result<Vec<CardFace>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Could not read image folder {}", folder.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Could not list {}", folder.display()))?
            .path();
        if path.is_file() && has_image_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort();

    log::debug!("Found {} images in {}", paths.len(), folder.display());
    Ok(paths
        .into_iter()
        .map(|path| CardFace::new(path.to_string_lossy()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_EXTENSIONS;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pairflip-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn extensions() -> Vec<String> {
        DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect()
    }

    #[test_log::test]
    fn lists_only_images_sorted() {
        let dir = scratch_dir("mixed");
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.jpeg", "d.gif", "noext"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        fs::create_dir(dir.join("nested.png")).unwrap();

        let faces = list_images(&dir, &extensions()).unwrap();
        let names: Vec<_> = faces.iter().map(|face| face.label(16)).collect();

        assert_eq!(names, ["a", "b", "c", "d"]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test_log::test]
    fn empty_folder_gives_no_faces() {
        let dir = scratch_dir("empty");

        assert!(list_images(&dir, &extensions()).unwrap().is_empty());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = std::env::temp_dir().join("pairflip-does-not-exist-4f1c");
        assert!(list_images(&dir, &extensions()).is_err());
    }
}
