//! Character encodings supported for the history file.

use crate::error::HistoryError;
use std::fmt;
use std::io;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    pub fn decode(&self, bytes: Vec<u8>) -> io::Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
        }
    }

    pub fn encode(&self, text: &str) -> io::Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(c).map_err(|_| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("character {c:?} is not representable in ISO-8859-1"),
                        )
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("UTF-8"),
            Encoding::Latin1 => f.write_str("ISO-8859-1"),
        }
    }
}

impl FromStr for Encoding {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            _ => Err(HistoryError::InvalidArgument(format!(
                "Unsupported charset: {}. Supported charsets are: UTF-8, ISO-8859-1",
                s
            ))),
        }
    }
}
