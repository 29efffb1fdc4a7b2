//! Data-transfer models for energy metering time series: single series,
//! multi-column frames and bare timestamp axes, with JSON and table conversion.
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::error::{Result, TimeSeriesError};
pub use domain::table::{Column, Frame};
pub use domain::timeseries::{TimeDataFrame, TimeSeries, TimeSeriesBase, TimeSeriesCollection};
pub use domain::timestamp::{Timestamp, Zone};
pub use infrastructure::json_store::{JsonSource, TextEncoding, WriteOptions};
