// JSON text sources and encoded file I/O
use crate::domain::error::{Result, TimeSeriesError};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Text encodings accepted for JSON files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
}

impl TextEncoding {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
            Self::Latin1 => "latin-1",
        }
    }

    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Utf8 => Ok(text.as_bytes().to_vec()),
            Self::Utf16Le => Ok(text.encode_utf16().flat_map(u16::to_le_bytes).collect()),
            Self::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| self.error("encode", format!("{c:?} is outside latin-1")))
                })
                .collect(),
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| self.error("decode", e.to_string())),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(self.error("decode", "odd number of bytes".to_string()));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units).map_err(|e| self.error("decode", e.to_string()))
            }
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    fn error(&self, action: &'static str, reason: String) -> TimeSeriesError {
        TimeSeriesError::Encoding {
            action,
            encoding: self.name(),
            reason,
        }
    }
}

impl FromStr for TextEncoding {
    type Err = TimeSeriesError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "utf-16le" | "utf-16-le" | "utf16le" => Ok(Self::Utf16Le),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(TimeSeriesError::Argument(format!("unsupported encoding {s:?}"))),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options applied when writing a model to a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub encoding: TextEncoding,
    pub pretty: bool,
}

impl WriteOptions {
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            ..Self::default()
        }
    }
}

/// Where JSON text is read from.
#[derive(Debug, Clone, Copy)]
pub enum JsonSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

impl<'a> JsonSource<'a> {
    /// Pick a source out of an optional string and an optional path.
    /// A non-empty string wins; the path is then ignored.
    pub fn resolve(string: Option<&'a str>, path: Option<&'a Path>) -> Result<Self> {
        match (string.filter(|s| !s.is_empty()), path) {
            (Some(text), _) => Ok(Self::Text(text)),
            (None, Some(path)) if !path.as_os_str().is_empty() => Ok(Self::File(path)),
            _ => Err(TimeSeriesError::Argument(
                "either string or path must be provided".to_string(),
            )),
        }
    }
}

pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| TimeSeriesError::io(path, e))?;
    tracing::debug!("Read {} bytes from {} as {}", bytes.len(), path.display(), encoding);
    encoding.decode(&bytes)
}

/// Write `text` to `path`, replacing any existing file.
pub fn write_text(path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
    let bytes = encoding.encode(text)?;
    std::fs::write(path, &bytes).map_err(|e| TimeSeriesError::io(path, e))?;
    tracing::debug!("Wrote {} bytes to {} as {}", bytes.len(), path.display(), encoding);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_precedence() {
        let path = Path::new("ignored.json");
        assert!(matches!(
            JsonSource::resolve(Some("{}"), Some(path)),
            Ok(JsonSource::Text("{}"))
        ));
        assert!(matches!(
            JsonSource::resolve(Some(""), Some(path)),
            Ok(JsonSource::File(_))
        ));

        let err = JsonSource::resolve(None, None).unwrap_err();
        assert!(matches!(err, TimeSeriesError::Argument(_)));
        assert!(err.to_string().contains("either string or path must be provided"));
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<TextEncoding>().unwrap(), TextEncoding::Utf8);
        assert_eq!("utf_16_le".parse::<TextEncoding>().unwrap(), TextEncoding::Utf16Le);
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().unwrap(), TextEncoding::Latin1);
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }

    #[test]
    fn test_latin1_rejects_wide_chars() {
        assert_eq!(TextEncoding::Latin1.encode("café").unwrap(), b"caf\xe9".to_vec());
        assert!(matches!(
            TextEncoding::Latin1.encode("€"),
            Err(TimeSeriesError::Encoding { .. })
        ));
    }

    #[test]
    fn test_write_then_read_utf16() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meter.json");

        write_text(&path, "{\"name\":\"Zählerstand\"}", TextEncoding::Utf16Le).unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_eq!(raw.len() % 2, 0);

        let text = read_text(&path, TextEncoding::Utf16Le).unwrap();
        assert_eq!(text, "{\"name\":\"Zählerstand\"}");
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_text(&path, "first version, longer", TextEncoding::Utf8).unwrap();
        write_text(&path, "second", TextEncoding::Utf8).unwrap();
        assert_eq!(read_text(&path, TextEncoding::Utf8).unwrap(), "second");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = read_text(Path::new("/nonexistent/meter.json"), TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, TimeSeriesError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/meter.json"));
    }
}
