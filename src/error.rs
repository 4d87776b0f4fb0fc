use std::path::PathBuf;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every failure the pipeline can surface to its caller.
///
/// Link classification never produces one of these: a rejected href is
/// just dropped.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("invalid element selector `{selector}`: {reason}")]
    HtmlSelector { selector: String, reason: String },

    #[error("document could not be rasterized: {reason}")]
    DocumentFormat { reason: String },

    #[error("pdfium library is not available: {reason}")]
    RasterizerUnavailable { reason: String },

    #[error("class {0} is not in the region catalog")]
    UnknownClass(String),

    #[error("class {0} has no crop rectangle configured yet")]
    RegionNotConfigured(String),

    #[error(
        "document {date} has {page_count} page(s), class {class_id} needs page index {page_index}"
    )]
    PageIndexOutOfRange {
        date: String,
        class_id: String,
        page_index: usize,
        page_count: usize,
    },

    #[error("invalid crop rectangle ({x0}, {y0}, {x1}, {y1})")]
    InvalidRect { x0: u32, y0: u32, x1: u32, y1: u32 },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode image for {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("`{0}` can't be stored, it contains a separator or line break")]
    StoreField(String),

    #[error("malformed store row at line {line}: {reason}")]
    StoreFormat { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
