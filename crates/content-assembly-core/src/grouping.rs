//! Partitioning of discovered files into resource groups.
//!
//! Input order is significant: callers pass descriptors in lexicographic
//! relative-path order and every mode preserves it. In filename modes the
//! groups appear in order of each key's first occurrence.

use std::collections::HashMap;

use crate::models::{GroupingMode, ObjectFileDescriptor};

/// Files that will become one FileSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// Grouping key; only meaningful while building.
    pub key: String,
    pub files: Vec<ObjectFileDescriptor>,
}

pub fn group(descriptors: &[ObjectFileDescriptor], mode: GroupingMode) -> Vec<ResourceGroup> {
    match mode {
        GroupingMode::Default => descriptors
            .iter()
            .map(|d| ResourceGroup {
                key: d.relative_path.clone(),
                files: vec![d.clone()],
            })
            .collect(),
        GroupingMode::Filename | GroupingMode::FilenameWithOcr => group_by_filename(descriptors),
    }
}

fn group_by_filename(descriptors: &[ObjectFileDescriptor]) -> Vec<ResourceGroup> {
    let mut groups: Vec<ResourceGroup> = Vec::new();
    let mut index_of: HashMap<&str, usize> = HashMap::new();

    for descriptor in descriptors {
        let key = descriptor.filename_without_ext();
        match index_of.get(key) {
            Some(&i) => groups[i].files.push(descriptor.clone()),
            None => {
                index_of.insert(key, groups.len());
                groups.push(ResourceGroup {
                    key: key.to_string(),
                    files: vec![descriptor.clone()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> ObjectFileDescriptor {
        ObjectFileDescriptor::new(format!("/staging/obj/{}", name), name, 1, "image/tiff")
    }

    fn names(group: &ResourceGroup) -> Vec<&str> {
        group.files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn test_group_by_filename() {
        let files = vec![file("page1.tif"), file("page1.xml"), file("page2.tif")];
        let groups = group(&files, GroupingMode::Filename);
        assert_eq!(groups.len(), 2);
        assert_eq!(names(&groups[0]), vec!["page1.tif", "page1.xml"]);
        assert_eq!(names(&groups[1]), vec!["page2.tif"]);
        assert_eq!(groups[0].key, "page1");
    }

    #[test]
    fn test_ocr_mode_groups_like_filename_mode() {
        let files = vec![file("a.tif"), file("b.tif"), file("a.xml")];
        assert_eq!(
            group(&files, GroupingMode::FilenameWithOcr),
            group(&files, GroupingMode::Filename)
        );
    }

    #[test]
    fn test_first_appearance_order() {
        let files = vec![file("b.jp2"), file("a.tif"), file("b.tif")];
        let groups = group(&files, GroupingMode::Filename);
        assert_eq!(names(&groups[0]), vec!["b.jp2", "b.tif"]);
        assert_eq!(names(&groups[1]), vec!["a.tif"]);
    }

    #[test]
    fn test_default_mode_singletons() {
        let files = vec![file("page1.tif"), file("page1.xml")];
        let groups = group(&files, GroupingMode::Default);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.files.len() == 1));
    }

    #[test]
    fn test_empty_input() {
        assert!(group(&[], GroupingMode::Filename).is_empty());
        assert!(group(&[], GroupingMode::Default).is_empty());
    }
}
