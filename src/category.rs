//! Module with the category type.
//! Categories are hierarchical tags that are attached to rules and thereby to the tokens they
//! produce. They allow a parser to test tokens coarsely, e.g. "is this any kind of literal",
//! without enumerating every token type.

use std::sync::Arc;

/// A named, immutable category.
///
/// The ancestors of a category are flattened once when the category is created: a category
/// inherits its parents and all of their ancestors. Thus the runtime never walks a category graph.
///
/// Cloning a category is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    name: Arc<str>,
    ancestors: Arc<[Arc<str>]>,
}

impl Category {
    /// Create a new root category.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            ancestors: Arc::from(Vec::new()),
        }
    }

    /// Create a new category with the given parent categories.
    ///
    /// The ancestors of the new category are the parents followed by the parents' ancestors.
    /// Duplicates are removed, the first occurrence is kept.
    pub fn with_parents<'a, I>(name: &str, parents: I) -> Self
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let mut ancestors: Vec<Arc<str>> = Vec::new();
        for parent in parents {
            push_unique(&mut ancestors, &parent.name);
            for ancestor in parent.ancestors.iter() {
                push_unique(&mut ancestors, ancestor);
            }
        }
        Self {
            name: name.into(),
            ancestors: ancestors.into(),
        }
    }

    /// Get the name of the category.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the flattened ancestors of the category.
    #[inline]
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.ancestors.iter().map(|a| a.as_ref())
    }

    /// Check if this category is `other` or descends from it.
    pub fn is_a(&self, other: &Category) -> bool {
        self.name == other.name || self.ancestors.iter().any(|a| *a == other.name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn push_unique(names: &mut Vec<Arc<str>>, name: &Arc<str>) {
    if !names.iter().any(|n| n == name) {
        names.push(Arc::clone(name));
    }
}

/// Flattens the given categories into the list of names attached to a token: each category
/// followed by its ancestors, without duplicates.
pub(crate) fn flatten_categories<'a, I>(categories: I) -> Vec<Arc<str>>
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut flattened = Vec::new();
    for category in categories {
        push_unique(&mut flattened, &category.name);
        for ancestor in category.ancestors.iter() {
            push_unique(&mut flattened, ancestor);
        }
    }
    flattened
}
