use crate::PathExtension;
use std::path::Path;

/// Represents the declared format of an input dataset, inferred from its file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileExtension {
    /// Comma-separated values.
    Csv,
    /// Tab-separated text.
    Txt,
    /// Legacy Excel workbook (BIFF).
    Xls,
    /// Modern Excel workbook (OOXML).
    Xlsx,
    /// Unknown file extension, storing the extension as a string.
    Unknown(String),
    /// Missing file extension, when no extension is present in the path.
    Missing,
}

impl FileExtension {
    /// Determines the file extension from a given path.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension_as_lowercase()
            .as_deref() // Converts `Option<String>` to `Option<&str>` for matching.
        {
            Some("csv") => FileExtension::Csv,
            Some("txt") => FileExtension::Txt,
            Some("xls") => FileExtension::Xls,
            Some("xlsx") => FileExtension::Xlsx,
            Some(ext) => FileExtension::Unknown(ext.to_owned()),
            None => FileExtension::Missing,
        }
    }

    /// Field separator for the delimited-text formats; `None` for workbooks.
    pub fn separator(&self) -> Option<u8> {
        match self {
            FileExtension::Csv => Some(b','),
            FileExtension::Txt => Some(b'\t'),
            _ => None,
        }
    }
}
