use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use log::info;
use uuid::Uuid;

use crate::error::AppError;

/// Asset types a result archive may carry
const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf", "obj"];

/// Locate the single 3D-asset entry inside a downloaded result archive and
/// write it into `dest_dir` under a fresh name. Everything else in the
/// archive (textures are referenced from glb/gltf, license files, etc.) is
/// left alone.
pub fn extract_model_archive(bytes: &[u8], dest_dir: &Path) -> Result<PathBuf, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Extract(format!("unreadable archive: {e}")))?;

    let mut asset = None;
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| AppError::Extract(format!("unreadable archive entry: {e}")))?;
        if entry.is_dir() {
            continue;
        }
        if let Some(ext) = Path::new(entry.name())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
        {
            if MODEL_EXTENSIONS.contains(&ext.as_str()) {
                asset = Some((i, ext));
                break;
            }
        }
    }

    let (index, ext) =
        asset.ok_or_else(|| AppError::Extract("no 3D asset entry in archive".to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let path = dest_dir.join(format!("{}.{ext}", Uuid::new_v4()));

    let mut entry = archive
        .by_index(index)
        .map_err(|e| AppError::Extract(format!("unreadable archive entry: {e}")))?;
    let mut out = fs::File::create(&path)?;
    std::io::copy(&mut entry, &mut out)?;

    info!("extracted {} to {}", entry.name(), path.display());
    Ok(path)
}

#[cfg(test)]
pub(crate) fn build_test_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
