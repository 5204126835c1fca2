use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Serialize;

/// Encodings the export is known to arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    Utf8,
    Windows1252,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: TextEncoding,
    /// True when the primary decoding was rejected by the validator.
    pub fallback_used: bool,
}

/// Decodes `bytes` with `encoding`. A leading BOM is dropped and invalid
/// sequences become U+FFFD; decoding itself never fails.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let codec = match encoding {
        TextEncoding::Utf8 => UTF_8,
        TextEncoding::Windows1252 => WINDOWS_1252,
    };
    let (text, _had_errors) = codec.decode_with_bom_removal(bytes);
    text.into_owned()
}

/// Two-step strategy: decode as UTF-8, run `is_valid` on the result, and
/// re-decode once as Windows-1252 if it is rejected. There is no further cascade.
pub fn decode_with_fallback(bytes: &[u8], is_valid: impl Fn(&str) -> bool) -> DecodedText {
    let primary = decode(bytes, TextEncoding::Utf8);
    if is_valid(&primary) {
        return DecodedText {
            text: primary,
            encoding: TextEncoding::Utf8,
            fallback_used: false,
        };
    }

    log::warn!("UTF-8 sample rejected, re-decoding as windows-1252");
    DecodedText {
        text: decode(bytes, TextEncoding::Windows1252),
        encoding: TextEncoding::Windows1252,
        fallback_used: true,
    }
}
