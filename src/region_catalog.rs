//! Where each class's timetable sits inside a rasterized schedule document.
//!
//! Coordinates are pixels at [`crate::config::DPI`]. Most classes only have
//! their page known so far; add the rectangle here once it's measured.

use regex::Regex;

use crate::error::{Result, ScheduleError};

/// `(page index, optional (x0, y0, x1, y1))` per class, in document order.
const BUILTIN_REGIONS: &[(&str, usize, Option<(u32, u32, u32, u32)>)] = &[
    ("11.1", 0, Some((286, 370, 1314, 2923))),
    ("11.2", 0, None),
    ("10.1", 0, None),
    ("10.2", 0, None),
    ("9.1", 1, None),
    ("9.2", 1, None),
    ("9.3", 1, None),
    ("9.4", 1, None),
    ("9.5.1", 2, None),
    ("9.5.2", 2, None),
    ("9.6.1", 2, None),
    ("9.6.2", 2, None),
    ("8.1", 3, None),
    ("8.2", 3, None),
    ("8.3", 3, None),
    ("8.4", 3, None),
    ("8.5", 3, None),
    ("7.1", 4, None),
    ("7.2", 4, None),
    ("7.3", 4, None),
    ("6.1", 5, None),
    ("6.2", 5, None),
    ("6.3", 5, None),
    ("5.1", 6, None),
    ("5.2", 6, None),
    ("5.3", 6, None),
    ("5.4", 6, None),
];

pub struct ClassIdValidator {
    // `<grade>.<section>` or `<grade>.<section>.<subsection>`.
    class_id_regex: Regex,
}

impl ClassIdValidator {
    pub fn new() -> anyhow::Result<Self> {
        let class_id_regex = Regex::new(r"^\d+\.\d+(\.\d+)?$")?;
        Ok(Self { class_id_regex })
    }

    pub fn is_well_formed(&self, class_id: &str) -> bool {
        self.class_id_regex.is_match(class_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Rect {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Result<Self> {
        if x0 >= x1 || y0 >= y1 {
            return Err(ScheduleError::InvalidRect { x0, y0, x1, y1 });
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    pub fn corners(&self) -> (u32, u32, u32, u32) {
        (self.x0, self.y0, self.x1, self.y1)
    }

    pub fn x(&self) -> u32 {
        self.x0
    }

    pub fn y(&self) -> u32 {
        self.y0
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSpec {
    pub class_id: String,
    pub page_index: usize,
    /// `None` until the class's rectangle has been measured.
    pub rect: Option<Rect>,
}

#[derive(Debug, Clone)]
pub struct RegionCatalog {
    regions: Vec<RegionSpec>,
}

impl RegionCatalog {
    pub fn builtin() -> Self {
        let regions = BUILTIN_REGIONS
            .iter()
            .map(|&(class_id, page_index, rect)| RegionSpec {
                class_id: class_id.to_string(),
                page_index,
                rect: rect.and_then(|(x0, y0, x1, y1)| Rect::new(x0, y0, x1, y1).ok()),
            })
            .collect();
        Self { regions }
    }

    pub fn from_specs(regions: Vec<RegionSpec>) -> Self {
        Self { regions }
    }

    pub fn lookup(&self, class_id: &str) -> Result<&RegionSpec> {
        self.regions
            .iter()
            .find(|spec| spec.class_id == class_id)
            .ok_or_else(|| ScheduleError::UnknownClass(class_id.to_string()))
    }

    /// Like [`Self::lookup`], but also requires a crop rectangle.
    pub fn lookup_croppable(&self, class_id: &str) -> Result<(&RegionSpec, Rect)> {
        let spec = self.lookup(class_id)?;
        let rect = spec
            .rect
            .ok_or_else(|| ScheduleError::RegionNotConfigured(class_id.to_string()))?;
        Ok((spec, rect))
    }

    pub fn specs(&self) -> impl Iterator<Item = &RegionSpec> {
        self.regions.iter()
    }

    /// Entries that can actually be cropped.
    pub fn configured(&self) -> impl Iterator<Item = (&RegionSpec, Rect)> {
        self.regions
            .iter()
            .filter_map(|spec| spec.rect.map(|rect| (spec, rect)))
    }
}
