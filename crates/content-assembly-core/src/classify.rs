//! Resource classification.
//!
//! Decides the [`ResourceType`] of one candidate group from the object's
//! [`ContentStructure`] and the kinds of files in the group (image vs.
//! non-image). Page-oriented styles fall back to `object` when a group
//! holds material a viewer could not render as a page.

use crate::models::{ContentStructure, ObjectFileDescriptor, ResourceType};

/// Extensions recognized as 3D models.
pub const THREE_D_EXTENSIONS: &[&str] = &["obj", "ply", "glb", "gltf"];

pub fn classify(style: ContentStructure, group: &[ObjectFileDescriptor]) -> ResourceType {
    let has_image = group.iter().any(|d| d.is_image());
    let has_non_image = group.iter().any(|d| !d.is_image());

    match style {
        ContentStructure::SimpleImage | ContentStructure::Maps | ContentStructure::WebarchiveSeed => {
            ResourceType::Image
        }
        ContentStructure::File => ResourceType::File,
        ContentStructure::SimpleBook | ContentStructure::SimpleBookRtl => {
            if has_non_image && !has_image {
                ResourceType::Object
            } else {
                ResourceType::Page
            }
        }
        ContentStructure::BookAsImage => {
            if has_non_image && !has_image {
                ResourceType::Object
            } else {
                ResourceType::Image
            }
        }
        ContentStructure::BookWithPdf => {
            if has_non_image {
                ResourceType::Object
            } else {
                ResourceType::Page
            }
        }
        ContentStructure::Document => ResourceType::Document,
        ContentStructure::ThreeD => {
            let is_model = group.iter().any(|d| {
                d.extension()
                    .is_some_and(|ext| THREE_D_EXTENSIONS.contains(&ext.as_str()))
            });
            if is_model {
                ResourceType::ThreeD
            } else {
                ResourceType::File
            }
        }
    }
}
