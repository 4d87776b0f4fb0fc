use std::path::Path;

use image::DynamicImage;
use log::{debug, warn};
use pdfium_render::prelude::*;

use crate::{
    config::DPI,
    error::{Result, ScheduleError},
};

/// PDF points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Turns document bytes into page images, first page first.
pub trait Rasterize {
    fn rasterize(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>>;
}

pub struct PdfiumRasterizer {
    pdfium: Pdfium,
    dpi: u32,
}

impl PdfiumRasterizer {
    /// Binds pdfium from `library_dir` if given, falling back to the system
    /// library path.
    pub fn new(library_dir: Option<&Path>) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                    .or_else(|e| {
                        warn!(
                            "No pdfium in {}: {e}, trying the system library",
                            dir.display()
                        );
                        Pdfium::bind_to_system_library()
                    })
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| ScheduleError::RasterizerUnavailable {
            reason: e.to_string(),
        })?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi: DPI,
        })
    }
}

impl Rasterize for PdfiumRasterizer {
    fn rasterize(&self, bytes: &[u8]) -> Result<Vec<DynamicImage>> {
        let format_error = |e: PdfiumError| ScheduleError::DocumentFormat {
            reason: e.to_string(),
        };

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(format_error)?;
        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(self.dpi as f32 / POINTS_PER_INCH);

        let mut pages = Vec::with_capacity(document.pages().len() as usize);
        for page in document.pages().iter() {
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(format_error)?;
            pages.push(DynamicImage::ImageRgb8(bitmap.as_image().into_rgb8()));
        }
        debug!("Rasterized {} page(s) at {} DPI", pages.len(), self.dpi);

        Ok(pages)
    }
}
