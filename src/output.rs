use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use image::{GenericImageView, ImageFormat};
use log::info;
use serde::Serialize;

use crate::{
    error::{Result, ScheduleError},
    extractor::ExtractedImage,
};

pub const MANIFEST_NAME: &str = "manifest.json";

#[derive(Debug, Serialize)]
pub struct SavedImage {
    pub class_id: String,
    pub date: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl ExtractedImage {
    /// `<out_dir>/<class>/<date>.png`
    pub fn path_in(&self, out_dir: &Path) -> PathBuf {
        out_dir
            .join(&self.class_id)
            .join(format!("{}.png", self.date_token))
    }

    pub fn save_png(&self, out_dir: &Path) -> Result<SavedImage> {
        let path = self.path_in(out_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ScheduleError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| ScheduleError::Image {
                path: path.clone(),
                source,
            })?;

        let (width, height) = self.image.dimensions();
        Ok(SavedImage {
            class_id: self.class_id.clone(),
            date: self.date_token.to_string(),
            path,
            width,
            height,
        })
    }
}

/// Saves every image and writes a JSON manifest listing them next to the
/// class directories.
pub fn save_all(images: &[ExtractedImage], out_dir: &Path) -> Result<Vec<SavedImage>> {
    let saved = images
        .iter()
        .map(|image| image.save_png(out_dir))
        .collect::<Result<Vec<_>>>()?;

    let manifest_path = out_dir.join(MANIFEST_NAME);
    let io_err = |source| ScheduleError::Io {
        path: manifest_path.clone(),
        source,
    };
    fs::create_dir_all(out_dir).map_err(io_err)?;
    let mut writer = io::BufWriter::new(fs::File::create(&manifest_path).map_err(io_err)?);
    serde_json::to_writer_pretty(&mut writer, &saved).map_err(|e| io_err(e.into()))?;
    writer.flush().map_err(io_err)?;

    info!(
        "Saved {} image(s) under {}",
        saved.len(),
        out_dir.display()
    );
    Ok(saved)
}
