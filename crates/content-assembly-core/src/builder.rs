//! Structural graph construction.
//!
//! Two entry points produce the same [`StructuralGraph`] shape:
//!
//! - [`build_from_staging`] derives resources from discovered files:
//!   grouping → classification → per-file policy and access.
//! - [`build_from_manifest`] takes resources already partitioned by an
//!   explicit sequence number, with a caller-supplied type per resource.
//!
//! # Guarantees
//!
//! - FileSet sequence numbers are `1..=n` in output order.
//! - Auto labels are `"<Type> <n>"` with a per-type counter that lives
//!   only for one build call.
//! - Generated identifiers are the only non-deterministic output; compare
//!   graphs with [`StructuralGraph::without_identifiers`].
//! - A configuration error aborts the build before any graph is returned.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use uuid::Uuid;

use crate::access::{fold_citation_only, resolve, ResolvedFile};
use crate::checksum::{merged_checksums, ChecksumSource};
use crate::classify::classify;
use crate::error::{AssemblyError, AssemblyResult};
use crate::grouping::group;
use crate::models::{
    AccessPolicy, ContentStructure, FileRecord, FileSetRecord, GroupingMode,
    ObjectFileDescriptor, ReadingOrder, ResourceType, StructuralGraph,
};

/// Per-build inputs shared by both variants.
pub struct BuildContext<'a> {
    /// Object identifier, embedded in generated ids.
    pub object_id: &'a str,
    /// Version stamped on every file record.
    pub version: u32,
    /// Previously persisted graph; its `is_member_of` is carried forward.
    pub prior: Option<&'a StructuralGraph>,
    pub checksums: &'a dyn ChecksumSource,
}

/// One resource from a file manifest, flags already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestResource {
    pub label: Option<String>,
    pub resource_type: ResourceType,
    pub files: Vec<ObjectFileDescriptor>,
}

/// Running per-type counters for auto-generated labels.
#[derive(Debug, Default)]
struct LabelCounters(HashMap<ResourceType, u32>);

impl LabelCounters {
    fn next_label(&mut self, resource_type: ResourceType, supplied: Option<&str>) -> String {
        let counter = self.0.entry(resource_type).or_insert(0);
        *counter += 1;
        match supplied {
            Some(label) => label.to_string(),
            None => resource_type.default_label(*counter),
        }
    }
}

pub fn build_from_staging(
    style: ContentStructure,
    descriptors: &[ObjectFileDescriptor],
    access_policy: &AccessPolicy,
    mode: GroupingMode,
    ctx: &BuildContext<'_>,
) -> AssemblyResult<StructuralGraph> {
    let groups = group(descriptors, mode);
    let mut counters = LabelCounters::default();
    let mut file_sets = Vec::with_capacity(groups.len());

    for (index, resource) in groups.iter().enumerate() {
        let resource_type = classify(style, &resource.files);
        let label = counters.next_label(resource_type, first_supplied_label(&resource.files));
        let file_set = assemble_file_set(
            ctx,
            index as u32 + 1,
            label,
            resource_type,
            &resource.files,
            |d| resolve(d, access_policy, mode.is_ocr_aware()),
        );
        debug!(
            key = %resource.key,
            resource_type = %resource_type,
            files = resource.files.len(),
            "assembled file set"
        );
        file_sets.push(file_set);
    }

    let reading_order = style
        .viewing_direction()
        .map(|viewing_direction| ReadingOrder { viewing_direction });
    Ok(finish(ctx, file_sets, reading_order))
}

pub fn build_from_manifest(
    resources: &BTreeMap<u32, ManifestResource>,
    access_policy: &AccessPolicy,
    ocr_aware: bool,
    ctx: &BuildContext<'_>,
) -> AssemblyResult<StructuralGraph> {
    if let Some((sequence, _)) = resources.iter().find(|(_, r)| r.files.is_empty()) {
        return Err(AssemblyError::EmptyResource {
            sequence: *sequence,
        });
    }

    let mut counters = LabelCounters::default();
    let mut file_sets = Vec::with_capacity(resources.len());

    for (index, (sequence, resource)) in resources.iter().enumerate() {
        let supplied = resource
            .label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| first_supplied_label(&resource.files));
        let label = counters.next_label(resource.resource_type, supplied);
        let file_set = assemble_file_set(
            ctx,
            index as u32 + 1,
            label,
            resource.resource_type,
            &resource.files,
            |d| {
                let mut resolved = resolve(d, access_policy, ocr_aware);
                resolved.access = fold_citation_only(resolved.access);
                resolved
            },
        );
        debug!(
            manifest_sequence = sequence,
            resource_type = %resource.resource_type,
            files = resource.files.len(),
            "assembled file set from manifest"
        );
        file_sets.push(file_set);
    }

    Ok(finish(ctx, file_sets, None))
}

fn first_supplied_label(files: &[ObjectFileDescriptor]) -> Option<&str> {
    files
        .iter()
        .filter_map(|d| d.attributes.as_ref()?.label.as_deref())
        .find(|l| !l.trim().is_empty())
}

fn assemble_file_set<F>(
    ctx: &BuildContext<'_>,
    sequence: u32,
    label: String,
    resource_type: ResourceType,
    files: &[ObjectFileDescriptor],
    resolve_file: F,
) -> FileSetRecord
where
    F: Fn(&ObjectFileDescriptor) -> ResolvedFile,
{
    let set_uuid = Uuid::new_v4();

    let files = files
        .iter()
        .map(|descriptor| {
            let resolved = resolve_file(descriptor);
            FileRecord {
                id: format!("file/{}-{}/{}", ctx.object_id, set_uuid, descriptor.relative_path),
                filename: descriptor.relative_path.clone(),
                version: ctx.version,
                size: descriptor.size,
                checksums: merged_checksums(descriptor, ctx.checksums),
                mimetype: descriptor.mimetype.clone(),
                role: resolved.role,
                access: resolved.access,
                administrative: resolved.administrative,
                accessibility: resolved.accessibility,
            }
        })
        .collect();

    FileSetRecord {
        id: format!("fileSet/{}-{}", ctx.object_id, set_uuid),
        label,
        resource_type,
        sequence,
        files,
    }
}

fn finish(
    ctx: &BuildContext<'_>,
    contains: Vec<FileSetRecord>,
    reading_order: Option<ReadingOrder>,
) -> StructuralGraph {
    StructuralGraph {
        contains,
        reading_order,
        is_member_of: ctx
            .prior
            .map(|g| g.is_member_of.clone())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{MemoryChecksums, NoChecksums};
    use crate::models::{
        ChecksumAlgorithm, FileAttributes, View, ViewingDirection, ROLE_TRANSCRIPTION,
    };

    fn file(name: &str, mimetype: &str) -> ObjectFileDescriptor {
        ObjectFileDescriptor::new(format!("/staging/bb000cc1111/{}", name), name, 10, mimetype)
    }

    fn ctx<'a>(checksums: &'a dyn ChecksumSource) -> BuildContext<'a> {
        BuildContext {
            object_id: "bb000cc1111",
            version: 1,
            prior: None,
            checksums,
        }
    }

    fn book_files() -> Vec<ObjectFileDescriptor> {
        vec![
            file("page1.tif", "image/tiff"),
            file("page1.xml", "application/xml"),
            file("page2.tif", "image/tiff"),
            file("readme.txt", "text/plain"),
        ]
    }

    #[test]
    fn test_sequences_are_contiguous() {
        let graph = build_from_staging(
            ContentStructure::SimpleBook,
            &book_files(),
            &AccessPolicy::default(),
            GroupingMode::Filename,
            &ctx(&NoChecksums),
        )
        .unwrap();
        let sequences: Vec<u32> = graph.contains.iter().map(|fs| fs.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn test_staging_build_is_deterministic() {
        let build = || {
            build_from_staging(
                ContentStructure::SimpleBook,
                &book_files(),
                &AccessPolicy::default(),
                GroupingMode::FilenameWithOcr,
                &ctx(&NoChecksums),
            )
            .unwrap()
        };
        let (a, b) = (build(), build());
        assert_ne!(a.contains[0].id, b.contains[0].id);
        assert_eq!(a.without_identifiers(), b.without_identifiers());
    }

    #[test]
    fn test_types_and_labels() {
        let graph = build_from_staging(
            ContentStructure::SimpleBook,
            &book_files(),
            &AccessPolicy::default(),
            GroupingMode::Filename,
            &ctx(&NoChecksums),
        )
        .unwrap();
        let summary: Vec<(ResourceType, &str)> = graph
            .contains
            .iter()
            .map(|fs| (fs.resource_type, fs.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (ResourceType::Page, "Page 1"),
                (ResourceType::Page, "Page 2"),
                (ResourceType::Object, "Object 1"),
            ]
        );
        assert_eq!(
            graph.reading_order.map(|o| o.viewing_direction),
            Some(ViewingDirection::LeftToRight)
        );
    }

    #[test]
    fn test_supplied_label_wins_but_counter_advances() {
        let files = vec![
            file("a.tif", "image/tiff").with_attributes(FileAttributes {
                label: Some("Cover".to_string()),
                ..Default::default()
            }),
            file("b.tif", "image/tiff"),
        ];
        let graph = build_from_staging(
            ContentStructure::SimpleImage,
            &files,
            &AccessPolicy::default(),
            GroupingMode::Default,
            &ctx(&NoChecksums),
        )
        .unwrap();
        assert_eq!(graph.contains[0].label, "Cover");
        assert_eq!(graph.contains[1].label, "Image 2");
        assert!(graph.reading_order.is_none());
    }

    #[test]
    fn test_ocr_mode_tags_transcriptions() {
        let policy = AccessPolicy {
            manually_corrected_ocr: true,
            ..Default::default()
        };
        let graph = build_from_staging(
            ContentStructure::SimpleBook,
            &book_files(),
            &policy,
            GroupingMode::FilenameWithOcr,
            &ctx(&NoChecksums),
        )
        .unwrap();
        let xml = &graph.contains[0].files[1];
        assert_eq!(xml.filename, "page1.xml");
        assert_eq!(xml.role.as_deref(), Some(ROLE_TRANSCRIPTION));
        assert!(xml.accessibility.corrected_for_accessibility);
        assert!(xml.administrative.shelve);
    }

    #[test]
    fn test_checksums_and_ids() {
        let mut sums = MemoryChecksums::new();
        sums.insert("page2.tif", ChecksumAlgorithm::Md5, "0123456789abcdef0123456789abcdef");
        let graph = build_from_staging(
            ContentStructure::SimpleBook,
            &book_files(),
            &AccessPolicy::default(),
            GroupingMode::Filename,
            &ctx(&sums),
        )
        .unwrap();
        let page2 = &graph.contains[1];
        assert!(page2.id.starts_with("fileSet/bb000cc1111-"));
        assert!(page2.files[0].id.ends_with("/page2.tif"));
        assert_eq!(
            page2.files[0].checksums.get(&ChecksumAlgorithm::Md5).map(String::as_str),
            Some("0123456789abcdef0123456789abcdef")
        );
        assert!(graph.contains[0].files[0].checksums.is_empty());
    }

    #[test]
    fn test_prior_membership_carried_forward() {
        let prior = StructuralGraph {
            is_member_of: vec!["collection/druid:xx111yy2222".to_string()],
            ..Default::default()
        };
        let context = BuildContext {
            prior: Some(&prior),
            ..ctx(&NoChecksums)
        };
        let graph = build_from_staging(
            ContentStructure::File,
            &book_files(),
            &AccessPolicy::default(),
            GroupingMode::Default,
            &context,
        )
        .unwrap();
        assert_eq!(graph.is_member_of, prior.is_member_of);
    }

    fn manifest() -> BTreeMap<u32, ManifestResource> {
        let mut resources = BTreeMap::new();
        resources.insert(
            7,
            ManifestResource {
                label: None,
                resource_type: ResourceType::Video,
                files: vec![file("clip.mp4", "video/mp4")],
            },
        );
        resources.insert(
            2,
            ManifestResource {
                label: Some("Transcript".to_string()),
                resource_type: ResourceType::Text,
                files: vec![file("t.txt", "text/plain").with_attributes(FileAttributes {
                    preserve: Some(true),
                    publish: Some(false),
                    shelve: Some(false),
                    role: Some(ROLE_TRANSCRIPTION.to_string()),
                    label: None,
                })],
            },
        );
        resources
    }

    #[test]
    fn test_manifest_orders_by_sequence_key() {
        let graph = build_from_manifest(
            &manifest(),
            &AccessPolicy::default(),
            false,
            &ctx(&NoChecksums),
        )
        .unwrap();
        assert_eq!(graph.contains.len(), 2);
        assert_eq!(graph.contains[0].label, "Transcript");
        assert_eq!(graph.contains[0].sequence, 1);
        assert_eq!(graph.contains[1].label, "Video 1");
        assert_eq!(graph.contains[1].sequence, 2);

        let t = &graph.contains[0].files[0];
        assert_eq!(t.role.as_deref(), Some(ROLE_TRANSCRIPTION));
        assert!(!t.administrative.publish);
        assert!(graph.reading_order.is_none());
    }

    #[test]
    fn test_manifest_folds_citation_only() {
        let policy = AccessPolicy {
            view: View::CitationOnly,
            ..Default::default()
        };
        let graph =
            build_from_manifest(&manifest(), &policy, false, &ctx(&NoChecksums)).unwrap();
        assert!(graph
            .contains
            .iter()
            .flat_map(|fs| &fs.files)
            .all(|f| f.access.view == View::Dark));

        let staged = build_from_staging(
            ContentStructure::File,
            &book_files(),
            &policy,
            GroupingMode::Default,
            &ctx(&NoChecksums),
        )
        .unwrap();
        assert_eq!(staged.contains[0].files[0].access.view, View::CitationOnly);
    }

    #[test]
    fn test_manifest_empty_resource_is_fatal() {
        let mut resources = manifest();
        resources.insert(
            3,
            ManifestResource {
                label: None,
                resource_type: ResourceType::File,
                files: vec![],
            },
        );
        let err = build_from_manifest(&resources, &AccessPolicy::default(), false, &ctx(&NoChecksums))
            .unwrap_err();
        assert_eq!(err, AssemblyError::EmptyResource { sequence: 3 });
    }
}
