//! Core data model for the assembly engine.
//!
//! Input side: [`ObjectFileDescriptor`] (one staged file) and
//! [`AccessPolicy`] (object-level rights). Output side: the
//! [`StructuralGraph`] of [`FileSetRecord`]s and [`FileRecord`]s, plus the
//! [`DiffResult`] produced when a new graph is compared with a prior one.
//!
//! Closed vocabularies (content structure, grouping mode, resource type,
//! access enumerants) are enums with serde tokens and a [`FromStr`] impl
//! that reports unknown tokens as [`AssemblyError`]s. Checksum algorithms
//! only arrive through configuration and use serde alone.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AssemblyError;

/// Role tag for machine- or human-produced text that transcribes a page.
pub const ROLE_TRANSCRIPTION: &str = "transcription";

/// High-level shape policy for an object; drives resource classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStructure {
    SimpleImage,
    Maps,
    WebarchiveSeed,
    File,
    /// Paginated book read left-to-right.
    SimpleBook,
    /// Paginated book read right-to-left.
    SimpleBookRtl,
    BookAsImage,
    /// Paginated book whose folders may carry a cover document (PDF etc.).
    BookWithPdf,
    Document,
    #[serde(rename = "3d")]
    ThreeD,
}

impl ContentStructure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStructure::SimpleImage => "simple_image",
            ContentStructure::Maps => "maps",
            ContentStructure::WebarchiveSeed => "webarchive_seed",
            ContentStructure::File => "file",
            ContentStructure::SimpleBook => "simple_book",
            ContentStructure::SimpleBookRtl => "simple_book_rtl",
            ContentStructure::BookAsImage => "book_as_image",
            ContentStructure::BookWithPdf => "book_with_pdf",
            ContentStructure::Document => "document",
            ContentStructure::ThreeD => "3d",
        }
    }

    /// Reading direction for paginated book styles, `None` otherwise.
    pub fn viewing_direction(&self) -> Option<ViewingDirection> {
        match self {
            ContentStructure::SimpleBook => Some(ViewingDirection::LeftToRight),
            ContentStructure::SimpleBookRtl => Some(ViewingDirection::RightToLeft),
            _ => None,
        }
    }
}

impl FromStr for ContentStructure {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple_image" => Ok(ContentStructure::SimpleImage),
            "maps" => Ok(ContentStructure::Maps),
            "webarchive_seed" => Ok(ContentStructure::WebarchiveSeed),
            "file" => Ok(ContentStructure::File),
            "simple_book" => Ok(ContentStructure::SimpleBook),
            "simple_book_rtl" => Ok(ContentStructure::SimpleBookRtl),
            "book_as_image" => Ok(ContentStructure::BookAsImage),
            "book_with_pdf" => Ok(ContentStructure::BookWithPdf),
            "document" => Ok(ContentStructure::Document),
            "3d" => Ok(ContentStructure::ThreeD),
            other => Err(AssemblyError::UnknownContentStructure(other.to_string())),
        }
    }
}

impl fmt::Display for ContentStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How raw files are partitioned into resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    /// One resource per file.
    #[default]
    Default,
    /// Files sharing a base filename form one resource.
    Filename,
    /// As [`GroupingMode::Filename`], with the OCR-aware policy table.
    FilenameWithOcr,
}

impl GroupingMode {
    pub fn is_ocr_aware(&self) -> bool {
        matches!(self, GroupingMode::FilenameWithOcr)
    }
}

impl FromStr for GroupingMode {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(GroupingMode::Default),
            "filename" => Ok(GroupingMode::Filename),
            "filename_with_ocr" => Ok(GroupingMode::FilenameWithOcr),
            other => Err(AssemblyError::UnknownGroupingMode(other.to_string())),
        }
    }
}

/// Semantic type of one FileSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Image,
    Page,
    Object,
    File,
    Document,
    #[serde(rename = "3d")]
    ThreeD,
    Audio,
    Video,
    Text,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Image => "image",
            ResourceType::Page => "page",
            ResourceType::Object => "object",
            ResourceType::File => "file",
            ResourceType::Document => "document",
            ResourceType::ThreeD => "3d",
            ResourceType::Audio => "audio",
            ResourceType::Video => "video",
            ResourceType::Text => "text",
        }
    }

    /// External vocabulary term the repository expects for this type.
    pub fn vocabulary_uri(&self) -> &'static str {
        match self {
            ResourceType::Image => "https://cocina.sul.stanford.edu/models/resources/image",
            ResourceType::Page => "https://cocina.sul.stanford.edu/models/resources/page",
            ResourceType::Object => "https://cocina.sul.stanford.edu/models/resources/object",
            ResourceType::File => "https://cocina.sul.stanford.edu/models/resources/file",
            ResourceType::Document => "https://cocina.sul.stanford.edu/models/resources/document",
            ResourceType::ThreeD => "https://cocina.sul.stanford.edu/models/resources/3d",
            ResourceType::Audio => "https://cocina.sul.stanford.edu/models/resources/audio",
            ResourceType::Video => "https://cocina.sul.stanford.edu/models/resources/video",
            ResourceType::Text => "https://cocina.sul.stanford.edu/models/resources/text",
        }
    }

    /// Auto-generated label, e.g. `"Page 3"`.
    pub fn default_label(&self, counter: u32) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("{} {}", capitalized, counter)
    }
}

impl FromStr for ResourceType {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(ResourceType::Image),
            "page" => Ok(ResourceType::Page),
            "object" => Ok(ResourceType::Object),
            "file" => Ok(ResourceType::File),
            "document" => Ok(ResourceType::Document),
            "3d" => Ok(ResourceType::ThreeD),
            "audio" => Ok(ResourceType::Audio),
            "video" => Ok(ResourceType::Video),
            "text" => Ok(ResourceType::Text),
            _ => Err(AssemblyError::UnknownResourceType(s.to_string())),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    World,
    Stanford,
    LocationBased,
    CitationOnly,
    Dark,
}

impl FromStr for View {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "world" => Ok(View::World),
            "stanford" => Ok(View::Stanford),
            "location-based" => Ok(View::LocationBased),
            "citation-only" => Ok(View::CitationOnly),
            "dark" => Ok(View::Dark),
            other => Err(AssemblyError::UnknownAccessValue {
                field: "view",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Download {
    #[default]
    World,
    Stanford,
    LocationBased,
    None,
}

impl FromStr for Download {
    type Err = AssemblyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "world" => Ok(Download::World),
            "stanford" => Ok(Download::Stanford),
            "location-based" => Ok(Download::LocationBased),
            "none" => Ok(Download::None),
            other => Err(AssemblyError::UnknownAccessValue {
                field: "download",
                value: other.to_string(),
            }),
        }
    }
}

/// Object-level access settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub download: Download,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub controlled_digital_lending: bool,
    /// Forces preserve/publish/shelve on for every file.
    #[serde(default)]
    pub all_files_public: bool,
    #[serde(default)]
    pub ocr_available: bool,
    #[serde(default)]
    pub manually_corrected_ocr: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha1,
    Sha256,
}

impl ChecksumAlgorithm {
    /// Extension used by sidecar files, e.g. `page1.tif.md5`.
    pub fn extension(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Md5 => "md5",
            ChecksumAlgorithm::Sha1 => "sha1",
            ChecksumAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of a hex-encoded digest.
    pub fn hex_len(&self) -> usize {
        match self {
            ChecksumAlgorithm::Md5 => 32,
            ChecksumAlgorithm::Sha1 => 40,
            ChecksumAlgorithm::Sha256 => 64,
        }
    }
}

/// Caller-supplied per-file overrides. `None` fields defer to policy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileAttributes {
    pub preserve: Option<bool>,
    pub publish: Option<bool>,
    pub shelve: Option<bool>,
    pub role: Option<String>,
    /// Label for the resource this file ends up in.
    pub label: Option<String>,
}

/// One physical file belonging to an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectFileDescriptor {
    pub path: PathBuf,
    /// `path` with the object's base directory stripped, `/`-separated.
    pub relative_path: String,
    pub size: u64,
    pub mimetype: String,
    pub checksums: BTreeMap<ChecksumAlgorithm, String>,
    pub attributes: Option<FileAttributes>,
}

impl ObjectFileDescriptor {
    pub fn new(path: impl Into<PathBuf>, relative_path: &str, size: u64, mimetype: &str) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.to_string(),
            size,
            mimetype: mimetype.to_string(),
            checksums: BTreeMap::new(),
            attributes: None,
        }
    }

    pub fn with_attributes(mut self, attributes: FileAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_checksum(mut self, algorithm: ChecksumAlgorithm, digest: &str) -> Self {
        self.checksums.insert(algorithm, digest.to_string());
        self
    }

    /// Final path component, e.g. `page1.tif`.
    pub fn filename(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Filename with its last extension removed, e.g. `page1`.
    pub fn filename_without_ext(&self) -> &str {
        Path::new(self.filename())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_else(|| self.filename())
    }

    /// Lowercased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(self.filename())
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    pub fn is_image(&self) -> bool {
        self.mimetype.starts_with("image/")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrative {
    pub preserve: bool,
    pub publish: bool,
    pub shelve: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAccess {
    pub view: View,
    pub download: Download,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub controlled_digital_lending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Accessibility {
    pub generated_by_text_recognition: bool,
    pub corrected_for_accessibility: bool,
}

/// One file inside the final graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    pub version: u32,
    pub size: u64,
    #[serde(default)]
    pub checksums: BTreeMap<ChecksumAlgorithm, String>,
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub access: FileAccess,
    pub administrative: Administrative,
    pub accessibility: Accessibility,
}

/// Ordered container of files forming one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSetRecord {
    pub id: String,
    pub label: String,
    pub resource_type: ResourceType,
    pub sequence: u32,
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewingDirection {
    LeftToRight,
    RightToLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingOrder {
    pub viewing_direction: ViewingDirection,
}

/// Root of an object's structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StructuralGraph {
    pub contains: Vec<FileSetRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_order: Option<ReadingOrder>,
    /// Parent/collection references carried over from the prior record.
    #[serde(default)]
    pub is_member_of: Vec<String>,
}

impl StructuralGraph {
    /// Every filename in the graph, ignoring FileSet boundaries.
    pub fn filenames(&self) -> BTreeSet<String> {
        self.contains
            .iter()
            .flat_map(|fs| fs.files.iter().map(|f| f.filename.clone()))
            .collect()
    }

    pub fn file_count(&self) -> usize {
        self.contains.iter().map(|fs| fs.files.len()).sum()
    }

    /// Copy of the graph with generated identifiers blanked, for
    /// structural comparison between builds.
    pub fn without_identifiers(&self) -> StructuralGraph {
        let mut graph = self.clone();
        for file_set in &mut graph.contains {
            file_set.id.clear();
            for file in &mut file_set.files {
                file.id.clear();
            }
        }
        graph
    }
}

/// Filename sets produced by comparing a prior graph to a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffResult {
    pub added: BTreeSet<String>,
    pub deleted: BTreeSet<String>,
    pub updated: BTreeSet<String>,
}
