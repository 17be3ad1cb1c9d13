//! Grouping of fetched playlists by exact title.

use bridge_traits::CollectionDetail;
use std::collections::HashMap;

/// Playlists sharing one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameGroup {
    pub name: String,
    pub members: Vec<CollectionDetail>,
}

impl NameGroup {
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }
}

/// Group details by title.
///
/// Titles compare exactly (case and whitespace sensitive). Groups appear in
/// the order their first member was seen, members in input order.
pub fn group_by_title(details: impl IntoIterator<Item = CollectionDetail>) -> Vec<NameGroup> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<NameGroup> = Vec::new();

    for detail in details {
        match index.get(detail.title()) {
            Some(&position) => groups[position].members.push(detail),
            None => {
                index.insert(detail.title().to_string(), groups.len());
                groups.push(NameGroup {
                    name: detail.title().to_string(),
                    members: vec![detail],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::CollectionRef;

    fn detail(id: &str, title: &str) -> CollectionDetail {
        CollectionDetail::new(CollectionRef::new(id, title), Vec::new())
    }

    #[test]
    fn test_groups_partition_input() {
        let input = vec![
            detail("1", "Chill"),
            detail("2", "Workout"),
            detail("3", "Chill"),
            detail("4", "chill"),
            detail("5", "Chill "),
        ];

        let groups = group_by_title(input);

        let total: usize = groups.iter().map(|g| g.members.len()).sum();
        assert_eq!(total, 5);
        assert_eq!(groups.len(), 4);
        for group in &groups {
            assert!(group.members.iter().all(|m| m.title() == group.name));
        }
    }

    #[test]
    fn test_first_seen_order() {
        let groups = group_by_title(vec![
            detail("1", "B"),
            detail("2", "A"),
            detail("3", "B"),
        ]);

        assert_eq!(groups[0].name, "B");
        assert!(groups[0].is_duplicate());
        assert_eq!(groups[0].members[1].id(), "3");
        assert_eq!(groups[1].name, "A");
        assert!(!groups[1].is_duplicate());
    }

    #[test]
    fn test_empty() {
        assert!(group_by_title(Vec::new()).is_empty());
    }
}
