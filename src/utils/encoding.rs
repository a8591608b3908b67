//! Encoding detection and conversion utilities
//!
//! Song lists exported from older spreadsheet tools are often not UTF-8.
//! CSV input is sniffed and decoded to UTF-8 before parsing.

use chardetng::EncodingDetector as ChardetngDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Encoding sniffer for text input files
pub struct EncodingDetector {
    /// Number of leading bytes inspected
    buffer_size: usize,
}

impl Default for EncodingDetector {
    fn default() -> Self {
        Self { buffer_size: 8192 }
    }
}

impl EncodingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect file encoding: BOM first, then chardetng, then UTF-8.
    pub fn detect_encoding<P: AsRef<Path>>(&self, file_path: P) -> io::Result<&'static Encoding> {
        let path = file_path.as_ref();
        let mut file = File::open(path)?;
        let mut buffer = Vec::with_capacity(self.buffer_size + 1);
        file.by_ref()
            .take(self.buffer_size as u64 + 1)
            .read_to_end(&mut buffer)?;

        // one byte past the window tells whether the sample was cut short
        let complete = buffer.len() <= self.buffer_size;
        buffer.truncate(self.buffer_size);

        let encoding = self.detect_sample(&buffer, complete);
        debug!("Detected encoding {} for {}", encoding.name(), path.display());
        Ok(encoding)
    }

    /// Detect the encoding of `sample`, which is the whole text when
    /// `complete` and only its leading bytes otherwise.
    fn detect_sample(&self, sample: &[u8], complete: bool) -> &'static Encoding {
        if sample.is_empty() {
            return UTF_8;
        }

        if let Some(encoding) = detect_bom(sample) {
            return encoding;
        }

        match std::str::from_utf8(sample) {
            Ok(_) => return UTF_8,
            // a cut sample may end in the middle of a multi-byte character
            Err(e) if !complete && e.error_len().is_none() => return UTF_8,
            Err(_) => {}
        }

        let mut detector = ChardetngDetector::new();
        detector.feed(sample, complete);
        let guess = detector.guess(None, true);

        let (_, _, has_errors) = guess.decode(sample);
        if has_errors {
            UTF_8
        } else {
            guess
        }
    }

    /// Wrap a reader so it yields UTF-8
    pub fn create_decode_reader<R: Read + 'static>(
        &self,
        reader: R,
        encoding: &'static Encoding,
    ) -> Box<dyn BufRead> {
        // BOM sniffing stays on so a UTF-8 BOM is stripped as well
        let decode_reader = DecodeReaderBytesBuilder::new()
            .encoding(Some(encoding))
            .build(reader);
        Box::new(BufReader::new(decode_reader))
    }

    /// Detect and open a UTF-8 reader over the file
    pub fn detect_and_create_reader<P: AsRef<Path>>(
        &self,
        file_path: P,
    ) -> io::Result<(Box<dyn BufRead>, &'static Encoding)> {
        let path = file_path.as_ref();
        let encoding = self.detect_encoding(path)?;
        let file = File::open(path)?;
        Ok((self.create_decode_reader(file, encoding), encoding))
    }
}

fn detect_bom(data: &[u8]) -> Option<&'static Encoding> {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        Some(UTF_8)
    } else if data.starts_with(&[0xFF, 0xFE]) {
        Some(UTF_16LE)
    } else if data.starts_with(&[0xFE, 0xFF]) {
        Some(UTF_16BE)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::WINDOWS_1252;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_plain_ascii_is_utf8() {
        let detector = EncodingDetector::new();
        assert_eq!(detector.detect_sample(b"Track1,Queen\n", true), UTF_8);
        assert_eq!(detector.detect_sample(b"", true), UTF_8);
    }

    #[test]
    fn test_bom_detection() {
        let detector = EncodingDetector::new();
        assert_eq!(detector.detect_sample(&[0xEF, 0xBB, 0xBF, b'a'], true), UTF_8);
        assert_eq!(detector.detect_sample(&[0xFF, 0xFE, b'a', 0], true), UTF_16LE);
    }

    #[test]
    fn test_legacy_encoding_is_decoded() {
        let content = "Für Elise,Beethoven\nJoga,Björk\n";
        let (encoded, _, _) = WINDOWS_1252.encode(content);

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&encoded).unwrap();
        file.flush().unwrap();

        let detector = EncodingDetector::new();
        let (mut reader, encoding) = detector.detect_and_create_reader(file.path()).unwrap();
        assert_ne!(encoding, UTF_8);

        let mut decoded = String::new();
        reader.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_utf8_split_at_sample_boundary() {
        // 'é' straddles the end of the default 8192-byte window
        let mut content = "a".repeat(8191);
        content.push_str("é,Björk\n");

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();

        let detector = EncodingDetector::new();
        let (mut reader, encoding) = detector.detect_and_create_reader(file.path()).unwrap();
        assert_eq!(encoding, UTF_8);

        let mut decoded = String::new();
        reader.read_to_string(&mut decoded).unwrap();
        assert!(decoded.ends_with("é,Björk\n"));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xEF, 0xBB, 0xBF]).unwrap();
        file.write_all("Track1,Queen".as_bytes()).unwrap();
        file.flush().unwrap();

        let detector = EncodingDetector::new();
        let (mut reader, _) = detector.detect_and_create_reader(file.path()).unwrap();
        let mut decoded = String::new();
        reader.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "Track1,Queen");
    }
}
