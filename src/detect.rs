//! PDF header sniffing.
//!
//! Report files are fetched by hand and occasionally turn out to be HTML
//! error pages saved with a `.pdf` extension, so the header is checked before
//! handing the file to the parser.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3;

/// Check the `%PDF-x.y` header of a file and return its version string.
pub fn pdf_version_from_path<P: AsRef<Path>>(path: P) -> Result<String> {
    let mut header = [0u8; 16];
    let mut file = File::open(path)?;
    let read = file.read(&mut header)?;
    pdf_version_from_bytes(&header[..read])
}

/// Check the `%PDF-x.y` header of a byte slice and return its version string.
pub fn pdf_version_from_bytes(data: &[u8]) -> Result<String> {
    let rest = data.strip_prefix(PDF_MAGIC).ok_or(Error::UnknownFormat)?;
    if rest.len() < VERSION_LEN {
        return Err(Error::UnknownFormat);
    }

    let version = String::from_utf8_lossy(&rest[..VERSION_LEN]).to_string();
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => Ok(version),
        _ => Err(Error::UnsupportedVersion(version)),
    }
}

/// Whether the bytes start with a PDF header.
pub fn is_pdf(data: &[u8]) -> bool {
    pdf_version_from_bytes(data).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_bytes() {
        assert_eq!(pdf_version_from_bytes(b"%PDF-1.4\n%\xe2\xe3").unwrap(), "1.4");
        assert_eq!(pdf_version_from_bytes(b"%PDF-2.0\n").unwrap(), "2.0");
    }

    #[test]
    fn test_html_is_rejected() {
        let result = pdf_version_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnknownFormat)));
        assert!(!is_pdf(b"<html>"));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF-1"),
            Err(Error::UnknownFormat)
        ));
    }

    #[test]
    fn test_bad_version() {
        assert!(matches!(
            pdf_version_from_bytes(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(v)) if v == "x.y"
        ));
    }

    #[test]
    fn test_version_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.7\n1 0 obj").unwrap();
        assert_eq!(pdf_version_from_path(&path).unwrap(), "1.7");

        let fake = dir.path().join("fake.pdf");
        std::fs::write(&fake, b"404").unwrap();
        assert!(pdf_version_from_path(&fake).is_err());
    }
}
