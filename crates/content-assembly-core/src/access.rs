//! Per-file access, administrative and accessibility resolution.
//!
//! Administrative flags follow a strict precedence:
//!
//! 1. `all_files_public` → preserve, publish and shelve all on.
//! 2. object view `dark` → preserve only.
//! 3. otherwise the mimetype policy (OCR-aware table when requested),
//!    with any caller-supplied per-file override applied field by field.
//!
//! The access block is always the object-level tuple.

use crate::models::{
    Accessibility, AccessPolicy, Administrative, FileAccess, ObjectFileDescriptor, View,
    ROLE_TRANSCRIPTION,
};
use crate::policy::defaults_for;

/// Everything the resolver decides for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub administrative: Administrative,
    pub access: FileAccess,
    pub accessibility: Accessibility,
    pub role: Option<String>,
}

pub fn resolve(
    descriptor: &ObjectFileDescriptor,
    policy: &AccessPolicy,
    ocr_aware: bool,
) -> ResolvedFile {
    let defaults = defaults_for(&descriptor.mimetype, ocr_aware);
    let overrides = descriptor.attributes.as_ref();

    let role = overrides
        .and_then(|a| a.role.clone())
        .or_else(|| defaults.role.map(str::to_string));

    let administrative = if policy.all_files_public {
        Administrative {
            preserve: true,
            publish: true,
            shelve: true,
        }
    } else if policy.view == View::Dark {
        Administrative {
            preserve: true,
            publish: false,
            shelve: false,
        }
    } else {
        Administrative {
            preserve: overrides
                .and_then(|a| a.preserve)
                .unwrap_or(defaults.preserve),
            publish: overrides
                .and_then(|a| a.publish)
                .unwrap_or(defaults.publish),
            shelve: overrides.and_then(|a| a.shelve).unwrap_or(defaults.shelve),
        }
    };

    let accessibility = Accessibility {
        generated_by_text_recognition: false,
        corrected_for_accessibility: policy.manually_corrected_ocr
            && role.as_deref() == Some(ROLE_TRANSCRIPTION),
    };

    ResolvedFile {
        administrative,
        access: object_access(policy),
        accessibility,
        role,
    }
}

/// The object-level access tuple as a file access block.
pub fn object_access(policy: &AccessPolicy) -> FileAccess {
    FileAccess {
        view: policy.view,
        download: policy.download,
        location: policy.location.clone(),
        controlled_digital_lending: policy.controlled_digital_lending,
    }
}

/// Files cannot be citation-only; they are dark instead.
pub fn fold_citation_only(access: FileAccess) -> FileAccess {
    if access.view == View::CitationOnly {
        FileAccess {
            view: View::Dark,
            ..access
        }
    } else {
        access
    }
}
