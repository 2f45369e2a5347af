use crate::url::{canonical_url, entity_id};
use url::Url;

/// One profile document to extract from, as found under one category
///
/// Two links with different categories may point at the same entity; the
/// entity id, not the URL, is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProfileLink {
    /// Absolute profile URL, category segment included
    pub url: Url,

    /// Category whose listing produced this link
    pub category: String,
}

impl ProfileLink {
    pub fn new(url: Url, category: impl Into<String>) -> Self {
        Self {
            url,
            category: category.into(),
        }
    }

    /// The entity id embedded in the URL path, if any
    pub fn entity_id(&self) -> Option<u64> {
        entity_id(&self.url)
    }

    /// The profile URL with the category segment stripped
    pub fn canonical_url(&self) -> Url {
        canonical_url(&self.url)
    }

    /// Records which category this entity was found under
    pub fn membership(&self) -> Option<CategoryMembership> {
        self.entity_id().map(|entity_id| CategoryMembership {
            entity_id,
            category: self.category.clone(),
        })
    }
}

/// An (entity id, category) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryMembership {
    pub entity_id: u64,
    pub category: String,
}
