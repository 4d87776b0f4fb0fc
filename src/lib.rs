pub mod config;
mod document_fetcher;
mod error;
mod extractor;
mod link_classifier;
mod link_discovery;
mod output;
mod rasterizer;
mod region_catalog;
mod requests;
mod store;

pub use document_fetcher::{RawDocument, fetch_all};
pub use error::{Result, ScheduleError};
pub use extractor::{ExtractedImage, Extractor};
pub use link_classifier::{DateToken, MONTHS, extract_date_token, is_schedule_link};
pub use link_discovery::{LinkDiscovery, ScheduleLink};
pub use output::{SavedImage, save_all};
pub use rasterizer::{PdfiumRasterizer, Rasterize};
pub use region_catalog::{ClassIdValidator, Rect, RegionCatalog, RegionSpec};
pub use requests::{Fetch, RequestClient};
pub use store::{ScheduleRow, ScheduleStore};
