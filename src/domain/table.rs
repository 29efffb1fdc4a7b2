// In-memory tabular interchange: a labelled column and a multi-column frame
use crate::domain::timestamp::Timestamp;

/// One named column of values on a timestamp axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: Option<String>,
    pub index: Vec<Timestamp>,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: Option<String>, index: Vec<Timestamp>, values: Vec<f64>) -> Self {
        Self {
            name,
            index,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Timestamp, f64)> {
        self.index.iter().zip(self.values.iter().copied())
    }
}

/// Named columns sharing one timestamp axis, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub columns: Vec<String>,
    pub index: Vec<Timestamp>,
    pub rows: Vec<Vec<f64>>,
}

impl Frame {
    pub fn new(columns: Vec<String>, index: Vec<Timestamp>, rows: Vec<Vec<f64>>) -> Self {
        Self {
            columns,
            index,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Extract one column by name. Short rows yield `NaN` for the missing cell.
    pub fn column(&self, name: &str) -> Option<Column> {
        let position = self.columns.iter().position(|c| c == name)?;
        let values = self
            .rows
            .iter()
            .map(|row| row.get(position).copied().unwrap_or(f64::NAN))
            .collect();
        Some(Column::new(Some(name.to_string()), self.index.clone(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> Frame {
        Frame::new(
            vec!["consumption".to_string(), "production".to_string()],
            vec![
                Timestamp::raw("2024-01-01T00:00:00Z"),
                Timestamp::raw("2024-01-01T00:15:00Z"),
            ],
            vec![vec![1.5, 0.0], vec![2.0, 0.25]],
        )
    }

    #[test]
    fn test_frame_column_extraction() {
        let frame = sample_frame();
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.width(), 2);

        let production = frame.column("production").unwrap();
        assert_eq!(production.name.as_deref(), Some("production"));
        assert_eq!(production.values, vec![0.0, 0.25]);
        assert_eq!(production.index, frame.index);

        assert!(frame.column("injection").is_none());
    }

    #[test]
    fn test_column_iter_pairs() {
        let column = sample_frame().column("consumption").unwrap();
        let pairs: Vec<f64> = column.iter().map(|(_, v)| v).collect();
        assert_eq!(pairs, vec![1.5, 2.0]);
        assert!(!column.is_empty());
    }
}
