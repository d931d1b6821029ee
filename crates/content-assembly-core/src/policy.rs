//! Mimetype → default administrative flags.
//!
//! Mimetype strings are mapped once onto a closed [`PolicyKey`]; the two
//! tables are exhaustive matches over that key, so an unknown mimetype can
//! only ever land on [`PolicyKey::Fallback`].
//!
//! | key | default table | OCR-aware table |
//! |-----|---------------|-----------------|
//! | tiff, jpeg | preserve | preserve |
//! | jp2 | publish + shelve | preserve |
//! | png | preserve + shelve | preserve |
//! | wav | preserve | (default) |
//! | mp3 | publish + shelve | (default) |
//! | pdf, text, json | all three | all three |
//! | html | (fallback) | all three |
//! | xml | (fallback) | all three, role `transcription` |
//! | zip | preserve | (default) |
//! | anything else | preserve | (default) |

use crate::models::ROLE_TRANSCRIPTION;

/// Closed set of mimetypes the policy tables know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKey {
    Tiff,
    Jp2,
    Jpeg,
    Png,
    Wav,
    Mp3,
    Pdf,
    PlainText,
    Html,
    Xml,
    Zip,
    Json,
    Fallback,
}

impl PolicyKey {
    pub fn from_mimetype(mimetype: &str) -> PolicyKey {
        let normalized = mimetype
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "image/tiff" | "image/tif" => PolicyKey::Tiff,
            "image/jp2" => PolicyKey::Jp2,
            "image/jpeg" => PolicyKey::Jpeg,
            "image/png" => PolicyKey::Png,
            "audio/wav" | "audio/x-wav" => PolicyKey::Wav,
            "audio/mp3" | "audio/mpeg" => PolicyKey::Mp3,
            "application/pdf" => PolicyKey::Pdf,
            "text/plain" | "plain/text" => PolicyKey::PlainText,
            "text/html" | "application/xhtml+xml" => PolicyKey::Html,
            "application/xml" | "text/xml" => PolicyKey::Xml,
            "application/zip" => PolicyKey::Zip,
            "application/json" => PolicyKey::Json,
            _ => PolicyKey::Fallback,
        }
    }
}

/// Default flags (and optional role) for one mimetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDefaults {
    pub preserve: bool,
    pub publish: bool,
    pub shelve: bool,
    pub role: Option<&'static str>,
}

impl FileDefaults {
    const fn flags(preserve: bool, publish: bool, shelve: bool) -> Self {
        Self {
            preserve,
            publish,
            shelve,
            role: None,
        }
    }
}

const PRESERVE_ONLY: FileDefaults = FileDefaults::flags(true, false, false);
const ACCESS_COPY: FileDefaults = FileDefaults::flags(false, true, true);
const EVERYTHING: FileDefaults = FileDefaults::flags(true, true, true);
const PRESERVE_AND_SHELVE: FileDefaults = FileDefaults::flags(true, false, true);

/// Defaults for `mimetype`, consulting the OCR-aware table first when
/// `ocr_aware` is set.
pub fn defaults_for(mimetype: &str, ocr_aware: bool) -> FileDefaults {
    let key = PolicyKey::from_mimetype(mimetype);
    if ocr_aware {
        if let Some(defaults) = ocr_entry(key) {
            return defaults;
        }
    }
    default_entry(key)
}

fn default_entry(key: PolicyKey) -> FileDefaults {
    match key {
        PolicyKey::Tiff | PolicyKey::Jpeg | PolicyKey::Wav | PolicyKey::Zip => PRESERVE_ONLY,
        PolicyKey::Jp2 | PolicyKey::Mp3 => ACCESS_COPY,
        PolicyKey::Png => PRESERVE_AND_SHELVE,
        PolicyKey::Pdf | PolicyKey::PlainText | PolicyKey::Json => EVERYTHING,
        PolicyKey::Html | PolicyKey::Xml | PolicyKey::Fallback => PRESERVE_ONLY,
    }
}

fn ocr_entry(key: PolicyKey) -> Option<FileDefaults> {
    match key {
        PolicyKey::Tiff | PolicyKey::Jpeg | PolicyKey::Jp2 | PolicyKey::Png => Some(PRESERVE_ONLY),
        PolicyKey::Pdf | PolicyKey::PlainText | PolicyKey::Html => Some(EVERYTHING),
        PolicyKey::Xml => Some(FileDefaults {
            role: Some(ROLE_TRANSCRIPTION),
            ..EVERYTHING
        }),
        _ => None,
    }
}
