//! File system helpers: encoding-aware source reading and writing.
use encoding_rs::Encoding;
use std::path::Path;

/// Decoded source text together with the byte form it was read from.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub encoding: &'static Encoding,
    /// The file started with a byte order mark
    pub bom: bool,
}

impl SourceText {
    /// Encodes `text` the way the original file was encoded, BOM included.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(text.len() + 3);
        if self.encoding == encoding_rs::UTF_16LE || self.encoding == encoding_rs::UTF_16BE {
            let little = self.encoding == encoding_rs::UTF_16LE;
            let units = std::iter::once(0xFEFF).filter(|_| self.bom).chain(text.encode_utf16());
            for unit in units {
                bytes.extend_from_slice(&if little { unit.to_le_bytes() } else { unit.to_be_bytes() });
            }
            return bytes;
        }
        if self.bom {
            bytes.extend_from_slice(&[0xEF, 0xBB, 0xBF]);
        }
        let (encoded, _, had_unmappable) = self.encoding.encode(text);
        if had_unmappable {
            tracing::warn!("Characters not representable in {} were replaced", self.encoding.name());
        }
        bytes.extend_from_slice(&encoded);
        bytes
    }
}

/// Reads a source file as UTF-8 text.
///
/// UTF-16 files are recognised by their BOM, invalid UTF-8 falls back to
/// Windows-1251, and a leading BOM is stripped from the result.
pub fn read_source_file(path: &Path) -> std::io::Result<String> {
    read_source(path).map(|source| source.text)
}

/// Like [`read_source_file`], keeping the encoding for [`write_source`].
pub fn read_source(path: &Path) -> std::io::Result<SourceText> {
    let bytes = std::fs::read(path)?;
    Ok(decode_source(bytes))
}

/// Writes `text` back in the encoding `source` was read with.
pub fn write_source(path: &Path, source: &SourceText, text: &str) -> std::io::Result<()> {
    std::fs::write(path, source.encode(text))
}

pub(crate) fn decode_source(bytes: Vec<u8>) -> SourceText {
    let (content, encoding, bom) = match bytes.as_slice() {
        [0xFF, 0xFE, ..] => (decode_with(encoding_rs::UTF_16LE, &bytes), encoding_rs::UTF_16LE, true),
        [0xFE, 0xFF, ..] => (decode_with(encoding_rs::UTF_16BE, &bytes), encoding_rs::UTF_16BE, true),
        _ => {
            let bom = bytes.starts_with(&[0xEF, 0xBB, 0xBF]);
            match String::from_utf8(bytes) {
                Ok(text) => (text, encoding_rs::UTF_8, bom),
                Err(err) => {
                    tracing::debug!("UTF-8 decoding failed, trying Windows-1251");
                    (decode_with(encoding_rs::WINDOWS_1251, err.as_bytes()), encoding_rs::WINDOWS_1251, false)
                }
            }
        }
    };
    let text = match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    };
    SourceText { text, encoding, bom }
}

fn decode_with(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!("Errors detected while decoding {} input", encoding.name());
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn utf16le(text: &str) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"var a;\n");
        let source = decode_source(bytes);
        assert_eq!(source.text, "var a;\n");
        assert!(source.bom);
    }

    #[test]
    fn decodes_utf16le() {
        let source = decode_source(utf16le("if (a) {}"));
        assert_eq!(source.text, "if (a) {}");
        assert_eq!(source.encoding, encoding_rs::UTF_16LE);
    }

    #[test]
    fn falls_back_to_windows_1251() {
        // "я" in Windows-1251
        assert_eq!(decode_source(vec![b'/', b'/', 0xFF]).text, "//я");
    }

    #[test]
    fn encodes_back_to_the_original_form() {
        let mut utf8 = vec![0xEF, 0xBB, 0xBF];
        utf8.extend_from_slice(b"a;\n");
        let source = decode_source(utf8.clone());
        assert_eq!(source.encode(&source.text), utf8);

        let source = decode_source(utf16le("if (a) {\n  b();\n}"));
        assert_eq!(source.encode("if (a) {\n    b();\n}"), utf16le("if (a) {\n    b();\n}"));

        let cp1251 = vec![b'/', b'/', 0xFF, b'\n'];
        let source = decode_source(cp1251.clone());
        assert_eq!(source.encode(&source.text), cp1251);

        let plain = decode_source(b"x;\n".to_vec());
        assert!(!plain.bom);
        assert_eq!(plain.encode("x;\n"), b"x;\n".to_vec());
    }
}
