//! Split a flat partition result into parent and children.
//!
//! `get_parent_with_children` deliberately returns the raw ordered list;
//! callers that want a nested view build one here.

use serde::Serialize;

use crate::item::Item;

/// A partition grouped by item type.
///
/// Every input item lands in exactly one field, and each field keeps the
/// sort-key order of the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParentWithChildren {
    /// First parent-typed item in sort order.
    pub parent: Option<Item>,
    pub children: Vec<Item>,
    /// Extra parent-typed items and items of any other type.
    pub other: Vec<Item>,
}

impl ParentWithChildren {
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut grouped = Self::default();

        for item in items {
            if item.item_type.is_child() {
                grouped.children.push(item);
            } else if item.item_type.is_parent() && grouped.parent.is_none() {
                grouped.parent = Some(item);
            } else {
                grouped.other.push(item);
            }
        }

        grouped
    }

    /// True when the partition held children but no parent item.
    pub fn is_orphaned(&self) -> bool {
        self.parent.is_none() && !self.children.is_empty()
    }
}

impl From<Vec<Item>> for ParentWithChildren {
    fn from(items: Vec<Item>) -> Self {
        Self::from_items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemType;
    use serde_json::json;

    fn item(sk: &str, item_type: ItemType) -> Item {
        Item::new("p1", sk, item_type, json!({"sk": sk}))
    }

    #[test]
    fn test_splits_parent_and_children() {
        let grouped = ParentWithChildren::from_items(vec![
            item("c#1", ItemType::Child),
            item("c#2", ItemType::Child),
            item("meta", ItemType::Parent),
        ]);

        assert_eq!(grouped.parent, Some(item("meta", ItemType::Parent)));
        assert_eq!(
            grouped.children,
            vec![item("c#1", ItemType::Child), item("c#2", ItemType::Child)]
        );
        assert!(grouped.other.is_empty());
        assert!(!grouped.is_orphaned());
    }

    #[test]
    fn test_extra_parents_and_unknown_types_go_to_other() {
        let grouped = ParentWithChildren::from_items(vec![
            item("a", ItemType::Parent),
            item("b", ItemType::Other("Note".into())),
            item("c", ItemType::Parent),
        ]);

        assert_eq!(grouped.parent, Some(item("a", ItemType::Parent)));
        assert_eq!(
            grouped.other,
            vec![
                item("b", ItemType::Other("Note".into())),
                item("c", ItemType::Parent)
            ]
        );
    }

    #[test]
    fn test_orphaned_children() {
        let grouped: ParentWithChildren = vec![item("c#1", ItemType::Child)].into();
        assert!(grouped.parent.is_none());
        assert!(grouped.is_orphaned());
    }

    #[test]
    fn test_empty_partition() {
        let grouped = ParentWithChildren::from_items(Vec::new());
        assert_eq!(grouped, ParentWithChildren::default());
        assert!(!grouped.is_orphaned());
    }
}
