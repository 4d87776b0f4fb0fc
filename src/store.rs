//! Record of which class schedules have been extracted for which dates.
//!
//! Stored as CSV with a `year,date,class` header. Loading and saving are
//! explicit; dropping a store never writes it.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::error::{Result, ScheduleError};

pub const COLUMNS: [&str; 3] = ["year", "date", "class"];

const SEP: char = ',';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub year: i32,
    pub date: String,
    pub class_id: String,
}

pub struct ScheduleStore {
    path: PathBuf,
    rows: Vec<ScheduleRow>,
}

impl ScheduleStore {
    /// Loads `path`, or starts empty if it doesn't exist yet.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let rows = match fs::read_to_string(&path) {
            Ok(text) => parse_rows(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                vec![]
            }
            Err(source) => return Err(ScheduleError::Io { path, source }),
        };
        Ok(Self { path, rows })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn contains(&self, year: i32, date: &str, class_id: &str) -> bool {
        self.rows
            .iter()
            .any(|r| r.year == year && r.date == date && r.class_id == class_id)
    }

    /// Adds a row unless the same one is already recorded. Returns whether it
    /// was added.
    ///
    /// Fields are written unquoted, so a field containing the separator or a
    /// line break is rejected.
    pub fn record(&mut self, year: i32, date: &str, class_id: &str) -> Result<bool> {
        for field in [date, class_id] {
            if field.contains([SEP, '\n', '\r']) {
                return Err(ScheduleError::StoreField(field.to_string()));
            }
        }
        if self.contains(year, date, class_id) {
            return Ok(false);
        }
        self.rows.push(ScheduleRow {
            year,
            date: date.to_string(),
            class_id: class_id.to_string(),
        });
        Ok(true)
    }

    pub fn save(&self) -> Result<()> {
        let io_err = |source| ScheduleError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = fs::File::create(&self.path).map_err(io_err)?;
        let mut writer = io::BufWriter::new(file);
        write_rows(&mut writer, &self.rows).map_err(io_err)?;
        writer.flush().map_err(io_err)?;

        info!("Saved {} row(s) to {}", self.rows.len(), self.path.display());
        Ok(())
    }
}

fn write_rows<W: Write>(mut w: W, rows: &[ScheduleRow]) -> io::Result<()> {
    writeln!(w, "{}", COLUMNS.join(&SEP.to_string()))?;
    for row in rows {
        writeln!(w, "{}{SEP}{}{SEP}{}", row.year, row.date, row.class_id)?;
    }
    Ok(())
}

fn parse_rows(text: &str) -> Result<Vec<ScheduleRow>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Ok(vec![]);
    };
    if header.split(SEP).ne(COLUMNS) {
        return Err(ScheduleError::StoreFormat {
            line: header_line,
            reason: format!("expected header `{}`, got `{header}`", COLUMNS.join(",")),
        });
    }

    lines
        .map(|(line, text)| {
            let fields: Vec<&str> = text.split(SEP).collect();
            let &[year, date, class_id] = fields.as_slice() else {
                return Err(ScheduleError::StoreFormat {
                    line,
                    reason: format!("expected {} fields, got {}", COLUMNS.len(), fields.len()),
                });
            };
            let year = year.trim().parse().map_err(|e| ScheduleError::StoreFormat {
                line,
                reason: format!("bad year `{year}`: {e}"),
            })?;
            Ok(ScheduleRow {
                year,
                date: date.to_string(),
                class_id: class_id.to_string(),
            })
        })
        .collect()
}
