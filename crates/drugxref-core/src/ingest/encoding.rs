/// Bytes inspected when guessing an encoding. Matches the upstream exports,
/// which are either pure ASCII, UTF-8, or Latin-1 spreadsheets; sniffing a
/// prefix keeps large files cheap.
const SNIFF_LIMIT: usize = 10_000;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Ascii,
    Utf8,
    Latin1,
}

impl SourceEncoding {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

impl std::fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn detect(bytes: &[u8]) -> SourceEncoding {
    let head = &bytes[..bytes.len().min(SNIFF_LIMIT)];
    if head.starts_with(UTF8_BOM) {
        return SourceEncoding::Utf8;
    }
    if head.is_ascii() {
        return SourceEncoding::Ascii;
    }
    match std::str::from_utf8(head) {
        Ok(_) => SourceEncoding::Utf8,
        // The sniff window may split a multibyte sequence at its edge; an
        // incomplete tail is not evidence against UTF-8.
        Err(err) if err.error_len().is_none() => SourceEncoding::Utf8,
        Err(_) => SourceEncoding::Latin1,
    }
}

/// Decodes a whole file under the sniffed label. Total: when a full UTF-8
/// pass contradicts the sniff window, the file falls back to Latin-1, which
/// accepts any byte sequence.
#[must_use]
pub fn decode_bytes(bytes: &[u8]) -> (String, SourceEncoding) {
    let encoding = detect(bytes);
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match encoding {
        SourceEncoding::Ascii | SourceEncoding::Utf8 => match std::str::from_utf8(body) {
            Ok(text) => (text.to_string(), encoding),
            Err(_) => (decode_latin1(body), SourceEncoding::Latin1),
        },
        SourceEncoding::Latin1 => (decode_latin1(body), SourceEncoding::Latin1),
    }
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
