//! Content type registry
//!
//! The host owns the list of public post types. The manager only reads it
//! to reconcile per-post-type flags and to list toggles for the admin UI.

use crate::sync::RwLockExt;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// A public content type of the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostType {
    /// Machine name, e.g. `post`
    pub name: String,
    /// Human readable plural label
    pub label: String,
}

impl PostType {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }
}

/// Source of the currently registered public post types
pub trait PostTypeRegistry: Send + Sync {
    fn public_post_types(&self) -> Vec<PostType>;

    /// Machine names of [`public_post_types`](Self::public_post_types)
    fn post_type_names(&self) -> Vec<String> {
        self.public_post_types()
            .into_iter()
            .map(|post_type| post_type.name)
            .collect()
    }
}

/// Registry kept in memory, changeable at runtime
#[derive(Debug, Default)]
pub struct StaticPostTypes {
    types: RwLock<Vec<PostType>>,
}

impl StaticPostTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in public types of a stock install
    pub fn builtin() -> Self {
        Self::new()
            .with("post", "Posts")
            .with("page", "Pages")
            .with("attachment", "Media")
    }

    pub fn with(self, name: &str, label: &str) -> Self {
        self.register(name, label);
        self
    }

    /// Add a type, replacing the label of an existing one
    pub fn register(&self, name: &str, label: &str) {
        let mut types = self.types.write_recovered();
        match types.iter_mut().find(|post_type| post_type.name == name) {
            Some(existing) => existing.label = label.to_string(),
            None => types.push(PostType::new(name, label)),
        }
    }

    pub fn unregister(&self, name: &str) -> bool {
        let mut types = self.types.write_recovered();
        let before = types.len();
        types.retain(|post_type| post_type.name != name);
        types.len() != before
    }
}

impl PostTypeRegistry for StaticPostTypes {
    fn public_post_types(&self) -> Vec<PostType> {
        self.types.read_recovered().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_types() {
        let registry = StaticPostTypes::builtin();
        assert_eq!(registry.post_type_names(), vec!["post", "page", "attachment"]);
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = StaticPostTypes::new().with("post", "Posts");
        registry.register("book", "Books");
        registry.register("book", "Library");
        assert_eq!(registry.public_post_types().len(), 2);
        assert_eq!(registry.public_post_types()[1].label, "Library");

        assert!(registry.unregister("book"));
        assert!(!registry.unregister("book"));
        assert_eq!(registry.post_type_names(), vec!["post"]);
    }
}
