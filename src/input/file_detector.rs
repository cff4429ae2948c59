//! File type detection

use crate::processing::document::SourceFormat;

const PDF_MAGIC: &[u8; 4] = b"%PDF";
const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";
const OLE_MAGIC: &[u8; 4] = b"\xD0\xCF\x11\xE0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    /// Legacy binary Word document (OLE compound file)
    Doc,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "doc" => FileType::Doc,
            _ => FileType::Unknown,
        }
    }

    /// Classify by the first four bytes of the file
    pub fn from_signature(header: &[u8]) -> Self {
        match header.get(..4) {
            Some(magic) if magic == PDF_MAGIC.as_slice() => FileType::Pdf,
            Some(magic) if magic == ZIP_MAGIC.as_slice() => FileType::Docx,
            Some(magic) if magic == OLE_MAGIC.as_slice() => FileType::Doc,
            _ => FileType::Unknown,
        }
    }

    pub fn is_ole_container(header: &[u8]) -> bool {
        header.get(..4) == Some(OLE_MAGIC.as_slice())
    }

    pub fn source_format(&self) -> Option<SourceFormat> {
        match self {
            FileType::Pdf => Some(SourceFormat::Pdf),
            FileType::Docx | FileType::Doc => Some(SourceFormat::WordDoc),
            FileType::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("docx"), FileType::Docx);
        assert_eq!(FileType::from_extension("Doc"), FileType::Doc);
        assert_eq!(FileType::from_extension("txt"), FileType::Unknown);
    }

    #[test]
    fn test_from_signature() {
        assert_eq!(FileType::from_signature(b"%PDF-1.7\n"), FileType::Pdf);
        assert_eq!(FileType::from_signature(b"PK\x03\x04rest"), FileType::Docx);
        assert_eq!(FileType::from_signature(b"\xD0\xCF\x11\xE0\xA1\xB1"), FileType::Doc);
        assert_eq!(FileType::from_signature(b"Hello"), FileType::Unknown);
        assert_eq!(FileType::from_signature(b"%P"), FileType::Unknown);
    }

    #[test]
    fn test_source_format() {
        assert_eq!(FileType::Doc.source_format(), Some(SourceFormat::WordDoc));
        assert_eq!(FileType::Pdf.source_format(), Some(SourceFormat::Pdf));
        assert_eq!(FileType::Unknown.source_format(), None);
    }
}
