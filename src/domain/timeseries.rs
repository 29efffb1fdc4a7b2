// Time series data-transfer models
use crate::domain::error::{Result, TimeSeriesError};
use crate::domain::table::{Column, Frame};
use crate::domain::timestamp::{Timestamp, Zone};
use crate::infrastructure::json_store::{self, JsonSource, TextEncoding, WriteOptions};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Capabilities shared by every model: a timestamp axis plus JSON text and file I/O.
pub trait TimeSeriesBase: Serialize + DeserializeOwned + Sized {
    fn index(&self) -> &[Timestamp];

    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(TimeSeriesError::Serialization)
    }

    fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(TimeSeriesError::Serialization)
    }

    /// Write the JSON form to `path`, creating or overwriting it.
    fn to_json_file(&self, path: &Path, options: WriteOptions) -> Result<()> {
        let text = if options.pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        json_store::write_text(path, &text, options.encoding)
    }

    fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(TimeSeriesError::SchemaValidation)
    }

    fn from_json_file(path: &Path, encoding: TextEncoding) -> Result<Self> {
        let text = json_store::read_text(path, encoding)?;
        Self::from_json_str(&text)
    }

    fn from_source(source: JsonSource<'_>, encoding: TextEncoding) -> Result<Self> {
        match source {
            JsonSource::Text(text) => Self::from_json_str(text),
            JsonSource::File(path) => Self::from_json_file(path, encoding),
        }
    }

    /// Load from either a JSON string or a UTF-8 file. The string takes
    /// precedence when both are given.
    fn from_json(string: Option<&str>, path: Option<&Path>) -> Result<Self> {
        Self::from_source(JsonSource::resolve(string, path)?, TextEncoding::default())
    }
}

/// serde_json writes non-finite floats as `null`; read them back as NaN.
mod nullable_values {
    use serde::{Deserialize, Deserializer};

    pub fn column<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let values = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    pub fn rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error> {
        let rows = Vec::<Vec<Option<f64>>>::deserialize(deserializer)?;
        Ok(rows
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
            .collect())
    }
}

fn localize_index(index: &[Timestamp], zone: Zone) -> Result<Vec<Timestamp>> {
    let localized = index
        .iter()
        .map(|ts| ts.to_utc().map(|utc| Timestamp::Aware(zone.localize(utc))))
        .collect::<Result<Vec<_>>>()?;

    let unsorted = localized.windows(2).any(|pair| match (&pair[0], &pair[1]) {
        (Timestamp::Aware(a), Timestamp::Aware(b)) => a > b,
        _ => false,
    });
    if unsorted {
        tracing::warn!("Timestamp index of {} labels is not sorted", localized.len());
    }

    Ok(localized)
}

/// Time series data with a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub index: Vec<Timestamp>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable_values::column")]
    pub data: Vec<f64>,
}

impl TimeSeries {
    /// Index and data lengths are not checked here; see [`TimeSeries::to_column`].
    pub fn new(name: Option<String>, index: Vec<Timestamp>, data: Vec<f64>) -> Self {
        Self { index, name, data }
    }

    pub fn from_column(column: Column) -> Self {
        Self::new(column.name, column.index, column.values)
    }

    /// Convert to a column whose index is normalized to UTC and then expressed in `zone`.
    pub fn to_column(&self, zone: Zone) -> Result<Column> {
        if self.index.len() != self.data.len() {
            return Err(TimeSeriesError::ShapeMismatch(format!(
                "index has {} labels but data has {} values",
                self.index.len(),
                self.data.len()
            )));
        }
        let index = localize_index(&self.index, zone)?;
        tracing::debug!(
            "Converted series {:?} with {} points to {}",
            self.name,
            self.data.len(),
            zone
        );
        Ok(Column::new(self.name.clone(), index, self.data.clone()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl TimeSeriesBase for TimeSeries {
    fn index(&self) -> &[Timestamp] {
        &self.index
    }
}

/// Time series data with multiple columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDataFrame {
    pub index: Vec<Timestamp>,
    pub columns: Vec<String>,
    /// Row-major: one row per index label, one value per column
    #[serde(deserialize_with = "nullable_values::rows")]
    pub data: Vec<Vec<f64>>,
}

impl TimeDataFrame {
    pub fn new(columns: Vec<String>, index: Vec<Timestamp>, data: Vec<Vec<f64>>) -> Self {
        Self {
            index,
            columns,
            data,
        }
    }

    pub fn from_frame(frame: Frame) -> Self {
        Self::new(frame.columns, frame.index, frame.rows)
    }

    pub fn to_frame(&self, zone: Zone) -> Result<Frame> {
        self.check_shape()?;
        let index = localize_index(&self.index, zone)?;
        tracing::debug!(
            "Converted frame with {} rows and {} columns to {}",
            self.data.len(),
            self.columns.len(),
            zone
        );
        Ok(Frame::new(self.columns.clone(), index, self.data.clone()))
    }

    /// Assemble a frame from single-column series that share one timestamp axis.
    ///
    /// Column order follows the input order and the index is taken from the
    /// first series. Every series must be named, names must be unique and every
    /// index must equal the first one.
    pub fn from_timeseries(series: &[TimeSeries]) -> Result<Self> {
        let first = series.first().ok_or_else(|| {
            TimeSeriesError::Argument("cannot build a frame from an empty series list".to_string())
        })?;

        let mut columns = Vec::with_capacity(series.len());
        let mut seen = HashSet::new();
        for (position, s) in series.iter().enumerate() {
            let name = s.name.clone().ok_or_else(|| {
                TimeSeriesError::Argument(format!("series at position {position} has no name"))
            })?;
            if !seen.insert(name.clone()) {
                return Err(TimeSeriesError::Argument(format!("duplicate column name {name:?}")));
            }
            if s.data.len() != s.index.len() {
                return Err(TimeSeriesError::ShapeMismatch(format!(
                    "series {name:?} has {} labels but {} values",
                    s.index.len(),
                    s.data.len()
                )));
            }
            if let Some(reason) = index_difference(&first.index, &s.index) {
                return Err(TimeSeriesError::Misaligned { name, reason });
            }
            columns.push(name);
        }

        let data = (0..first.index.len())
            .map(|row| series.iter().map(|s| s.data[row]).collect())
            .collect();

        Ok(Self::new(columns, first.index.clone(), data))
    }

    /// Split into one series per column, each carrying the shared index.
    pub fn to_timeseries(&self) -> Result<Vec<TimeSeries>> {
        self.check_shape()?;
        Ok(self
            .columns
            .iter()
            .enumerate()
            .map(|(position, column)| {
                let values = self.data.iter().map(|row| row[position]).collect();
                TimeSeries::new(Some(column.clone()), self.index.clone(), values)
            })
            .collect())
    }

    fn check_shape(&self) -> Result<()> {
        if self.index.len() != self.data.len() {
            return Err(TimeSeriesError::ShapeMismatch(format!(
                "index has {} labels but data has {} rows",
                self.index.len(),
                self.data.len()
            )));
        }
        if let Some((row, values)) = self
            .data
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != self.columns.len())
        {
            return Err(TimeSeriesError::ShapeMismatch(format!(
                "row {row} has {} values but there are {} columns",
                values.len(),
                self.columns.len()
            )));
        }
        let mut seen = HashSet::new();
        if let Some(name) = self.columns.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(TimeSeriesError::Argument(format!("duplicate column name {name:?}")));
        }
        Ok(())
    }
}

impl TimeSeriesBase for TimeDataFrame {
    fn index(&self) -> &[Timestamp] {
        &self.index
    }
}

fn index_difference(expected: &[Timestamp], actual: &[Timestamp]) -> Option<String> {
    if expected.len() != actual.len() {
        return Some(format!(
            "index has {} labels, expected {}",
            actual.len(),
            expected.len()
        ));
    }
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .map(|position| {
            format!(
                "label {position} is {} instead of {}",
                actual[position], expected[position]
            )
        })
}

/// A bare timestamp axis, without values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesCollection {
    pub index: Vec<Timestamp>,
}

impl TimeSeriesCollection {
    pub fn new(index: Vec<Timestamp>) -> Self {
        Self { index }
    }

    /// Keep only the frame's timestamp axis.
    pub fn from_frame(frame: Frame) -> Self {
        Self::new(frame.index)
    }

    /// There are no values to lay out, so this always fails.
    pub fn to_frame(&self, _zone: Zone) -> Result<Frame> {
        Err(TimeSeriesError::NotImplemented("TimeSeriesCollection::to_frame"))
    }
}

impl TimeSeriesBase for TimeSeriesCollection {
    fn index(&self) -> &[Timestamp] {
        &self.index
    }
}
