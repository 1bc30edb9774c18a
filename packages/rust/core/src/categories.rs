//! Grouping projects by tag for the homepage.

use std::collections::HashMap;

use tracing::debug;

use allweneed_shared::{CategoryGroup, OTHER_CATEGORY, ProjectRecord};

/// Group projects by tag.
///
/// A project appears once under each of its tags; untagged projects go to
/// [`OTHER_CATEGORY`]. Groups are ordered by size, largest first; equal sizes
/// keep the order in which their tag was first seen. Projects keep their
/// input order within a group.
pub fn group_by_tag(projects: &[ProjectRecord]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for project in projects {
        let tags: Vec<&str> = if project.tags.is_empty() {
            vec![OTHER_CATEGORY]
        } else {
            project.tags.iter().map(String::as_str).collect()
        };

        for tag in tags {
            let slot = *index.entry(tag.to_string()).or_insert_with(|| {
                groups.push(CategoryGroup {
                    name: tag.to_string(),
                    projects: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].projects.push(project.clone());
        }
    }

    // Stable: ties stay in first-seen order.
    groups.sort_by(|a, b| b.len().cmp(&a.len()));

    debug!(groups = groups.len(), "grouped projects by tag");
    groups
}
