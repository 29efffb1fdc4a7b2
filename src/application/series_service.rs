// Series service - Use cases behind the command line
use crate::domain::timeseries::{TimeDataFrame, TimeSeries, TimeSeriesBase, TimeSeriesCollection};
use crate::domain::timestamp::Zone;
use crate::infrastructure::config::Settings;
use crate::infrastructure::json_store::{self, TextEncoding, WriteOptions};
use crate::presentation::render::{render_column, render_frame};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Which model a JSON document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Series,
    Frame,
    Collection,
}

impl DocumentKind {
    /// Guess the model from the document's top-level fields.
    pub fn detect(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).context("Document is not valid JSON")?;
        let object = value
            .as_object()
            .context("Document is not a JSON object")?;

        Ok(if object.contains_key("columns") {
            Self::Frame
        } else if object.contains_key("data") {
            Self::Series
        } else {
            Self::Collection
        })
    }
}

#[derive(Debug, Clone)]
pub struct SeriesService {
    zone: Zone,
    encoding: TextEncoding,
    write_options: WriteOptions,
}

impl SeriesService {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            zone: settings.zone().context("Invalid timezone in settings")?,
            encoding: settings.text_encoding().context("Invalid encoding in settings")?,
            write_options: settings
                .write_options()
                .context("Invalid write options in settings")?,
        })
    }

    /// Render a JSON document as a text table in `zone` (or the configured zone).
    pub fn render(
        &self,
        path: &Path,
        kind: Option<DocumentKind>,
        zone: Option<Zone>,
    ) -> Result<String> {
        let text = json_store::read_text(path, self.encoding)?;
        let kind = match kind {
            Some(kind) => kind,
            None => DocumentKind::detect(&text)?,
        };
        let zone = zone.unwrap_or(self.zone);
        tracing::info!("Rendering {} as {:?} in {}", path.display(), kind, zone);

        let rendered = match kind {
            DocumentKind::Series => {
                let series = TimeSeries::from_json_str(&text)?;
                render_column(&series.to_column(zone)?)
            }
            DocumentKind::Frame => {
                let frame = TimeDataFrame::from_json_str(&text)?;
                render_frame(&frame.to_frame(zone)?)
            }
            DocumentKind::Collection => {
                let collection = TimeSeriesCollection::from_json_str(&text)?;
                render_frame(&collection.to_frame(zone)?)
            }
        };
        Ok(rendered)
    }

    /// Write one single-series document per column of a frame into `out_dir`.
    pub fn split(&self, frame_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let frame = TimeDataFrame::from_json_file(frame_path, self.encoding)
            .with_context(|| format!("Failed to load frame from {}", frame_path.display()))?;

        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create directory {}", out_dir.display()))?;

        let mut used = HashSet::new();
        let mut written = Vec::new();
        for series in frame.to_timeseries()? {
            let name = series.name.as_deref().unwrap_or_default();
            let file_name = format!("{}.json", file_stem(name));
            if !used.insert(file_name.clone()) {
                anyhow::bail!("Columns map onto the same file name {}", file_name);
            }

            let path = out_dir.join(file_name);
            series.to_json_file(&path, self.write_options)?;
            tracing::debug!("Wrote column {:?} to {}", name, path.display());
            written.push(path);
        }

        tracing::info!(
            "Split {} into {} series files",
            frame_path.display(),
            written.len()
        );
        Ok(written)
    }

    /// Merge single-series documents into one frame written to `output`.
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<TimeDataFrame> {
        let series = inputs
            .iter()
            .map(|path| {
                TimeSeries::from_json_file(path, self.encoding)
                    .with_context(|| format!("Failed to load series from {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?;

        let frame = TimeDataFrame::from_timeseries(&series).context("Series cannot be merged")?;
        frame.to_json_file(output, self.write_options)?;

        tracing::info!(
            "Merged {} series into {}",
            frame.columns.len(),
            output.display()
        );
        Ok(frame)
    }
}

/// Turn a column name into a file-system friendly stem.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}
