use image::{DynamicImage, GenericImageView, RgbImage, imageops};
use log::{info, warn};

use crate::{
    document_fetcher::fetch_all,
    error::{Result, ScheduleError},
    link_classifier::DateToken,
    link_discovery::LinkDiscovery,
    rasterizer::Rasterize,
    region_catalog::{Rect, RegionCatalog, RegionSpec},
    requests::Fetch,
};

#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub date_token: DateToken,
    pub class_id: String,
    pub image: DynamicImage,
}

/// Runs discovery, download, rasterization and cropping for one or more
/// classes. Nothing is cached between calls.
pub struct Extractor<'a, F, R> {
    fetcher: &'a F,
    rasterizer: &'a R,
    catalog: &'a RegionCatalog,
    page_url: String,
}

impl<'a, F: Fetch, R: Rasterize> Extractor<'a, F, R> {
    pub fn new(
        fetcher: &'a F,
        rasterizer: &'a R,
        catalog: &'a RegionCatalog,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            fetcher,
            rasterizer,
            catalog,
            page_url: page_url.into(),
        }
    }

    /// One cropped image per published document, in page order.
    ///
    /// The class is checked against the catalog before anything is fetched.
    pub async fn extract(&self, class_id: &str) -> Result<Vec<ExtractedImage>> {
        let target = self.catalog.lookup_croppable(class_id)?;
        self.crop_documents(&[target]).await
    }

    /// Crops every class that has a rectangle, sharing one download and one
    /// rasterization per document.
    pub async fn extract_all(&self) -> Result<Vec<ExtractedImage>> {
        let targets: Vec<_> = self.catalog.configured().collect();
        for spec in self.catalog.specs().filter(|spec| spec.rect.is_none()) {
            info!("Skipping {}: no crop rectangle yet", spec.class_id);
        }
        if targets.is_empty() {
            return Ok(vec![]);
        }
        self.crop_documents(&targets).await
    }

    async fn crop_documents(&self, targets: &[(&RegionSpec, Rect)]) -> Result<Vec<ExtractedImage>> {
        let links = LinkDiscovery::new(self.fetcher, self.page_url.as_str())?
            .discover_links()
            .await?;
        let documents = fetch_all(self.fetcher, &links).await?;

        let mut extracted = Vec::with_capacity(documents.len() * targets.len());
        for document in documents {
            let pages = self
                .rasterizer
                .rasterize(&document.bytes)
                .map_err(|e| match e {
                    ScheduleError::DocumentFormat { reason } => ScheduleError::DocumentFormat {
                        reason: format!("{}: {reason}", document.date_token),
                    },
                    other => other,
                })?;
            for &(spec, rect) in targets {
                extracted.push(crop_page(&document.date_token, &pages, spec, rect)?);
            }
        }

        info!("Extracted {} image(s)", extracted.len());
        Ok(extracted)
    }
}

fn crop_page(
    date_token: &DateToken,
    pages: &[DynamicImage],
    spec: &RegionSpec,
    rect: Rect,
) -> Result<ExtractedImage> {
    let page = pages
        .get(spec.page_index)
        .ok_or_else(|| ScheduleError::PageIndexOutOfRange {
            date: date_token.to_string(),
            class_id: spec.class_id.clone(),
            page_index: spec.page_index,
            page_count: pages.len(),
        })?;

    let (width, height) = page.dimensions();
    let (_, _, x1, y1) = rect.corners();
    if x1 > width || y1 > height {
        warn!(
            "Rect for {} exceeds page {} of {} ({width}x{height}), padding with black",
            spec.class_id, spec.page_index, date_token
        );
    }

    // The crop is always rect-sized; whatever lies off the page stays black.
    let mut cropped = RgbImage::new(rect.width(), rect.height());
    let overlap = page
        .crop_imm(rect.x(), rect.y(), rect.width(), rect.height())
        .to_rgb8();
    imageops::replace(&mut cropped, &overlap, 0, 0);

    Ok(ExtractedImage {
        date_token: date_token.clone(),
        class_id: spec.class_id.clone(),
        image: DynamicImage::ImageRgb8(cropped),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn page(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    fn spec(page_index: usize) -> RegionSpec {
        RegionSpec {
            class_id: "11.1".to_string(),
            page_index,
            rect: None,
        }
    }

    #[test]
    fn crops_the_selected_page() {
        let date = DateToken::parse("5 сентября").unwrap();
        let pages = vec![page(100, 100), page(50, 60)];
        let rect = Rect::new(10, 20, 40, 50).unwrap();

        let extracted = crop_page(&date, &pages, &spec(1), rect).unwrap();
        assert_eq!(extracted.image.dimensions(), (30, 30));
        assert_eq!(extracted.date_token, date);
        assert_eq!(extracted.class_id, "11.1");
    }

    #[test]
    fn missing_page_is_reported() {
        let date = DateToken::parse("5 сентября").unwrap();
        let rect = Rect::new(0, 0, 10, 10).unwrap();

        let err = crop_page(&date, &[page(20, 20)], &spec(2), rect).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::PageIndexOutOfRange { page_index: 2, page_count: 1, .. }
        ));
    }

    #[test]
    fn oversized_rect_is_padded_to_full_size() {
        let date = DateToken::parse("5 сентября").unwrap();
        let mut marked = RgbImage::new(100, 80);
        marked.put_pixel(10, 10, Rgb([200, 100, 50]));
        marked.put_pixel(99, 79, Rgb([255, 255, 255]));
        let rect = Rect::new(10, 10, 500, 500).unwrap();

        let extracted =
            crop_page(&date, &[DynamicImage::ImageRgb8(marked)], &spec(0), rect).unwrap();
        let image = extracted.image.to_rgb8();
        assert_eq!(image.dimensions(), (490, 490));
        assert_eq!(image.get_pixel(0, 0), &Rgb([200, 100, 50]));
        assert_eq!(image.get_pixel(89, 69), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(90, 69), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(489, 489), &Rgb([0, 0, 0]));
    }

    #[test]
    fn rect_entirely_off_the_page_is_black() {
        let date = DateToken::parse("5 сентября").unwrap();
        let rect = Rect::new(286, 370, 1314, 2923).unwrap();
        let mut white = RgbImage::new(200, 300);
        white.pixels_mut().for_each(|p| *p = Rgb([255, 255, 255]));

        let extracted =
            crop_page(&date, &[DynamicImage::ImageRgb8(white)], &spec(0), rect).unwrap();
        let image = extracted.image.to_rgb8();
        assert_eq!(image.dimensions(), (1028, 2553));
        assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }
}
