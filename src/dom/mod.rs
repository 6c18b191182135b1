//! Document access for the news helpers.
//!
//! Page scripts normally reach for the global `document`. Here the document is
//! a capability: every operation takes a [`Dom`] implementation, and lookups
//! can be scoped to a node instead of the whole document.
//!
//! # Implementations
//!
//! | Type | Notes |
//! |------|-------|
//! | [`memory::MemoryDom`] | Arena tree built from an html5ever parse via `scraper` |
//!
//! Lookups never fail. A miss is reported as [`Lookup::NotFound`], and the
//! caller decides whether that is an error ([`Lookup::found_or_missing`]) or
//! something to skip.

pub mod memory;

use crate::error::{NewsError, Result};

/// Handle to a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Result of an element lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound => None,
        }
    }

    /// Turn a miss into [`NewsError::MissingElement`] naming `what`.
    pub fn found_or_missing(self, what: &str) -> Result<T> {
        self.into_option()
            .ok_or_else(|| NewsError::MissingElement(what.to_string()))
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(found) => Lookup::Found(found),
            None => Lookup::NotFound,
        }
    }
}

/// The subset of the browser document API the news helpers rely on.
///
/// Lookup methods search descendants of `scope` in document order, or the
/// whole document when `scope` is `None`, and return the first match.
pub trait Dom {
    /// The root `<html>` element.
    fn document_element(&self) -> Lookup<NodeId>;

    fn find_by_class(&self, class: &str, scope: Option<NodeId>) -> Lookup<NodeId>;

    fn find_by_id(&self, id: &str, scope: Option<NodeId>) -> Lookup<NodeId>;

    fn find_by_tag(&self, tag: &str, scope: Option<NodeId>) -> Lookup<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Serialized markup of the node's children.
    fn inner_html(&self, node: NodeId) -> String;

    /// Replace the node's children with the parsed `html`.
    fn set_inner_html(&mut self, node: NodeId, html: &str);

    /// Equivalent of `node.innerHTML += html`.
    fn append_html(&mut self, node: NodeId, html: &str) {
        let mut markup = self.inner_html(node);
        markup.push_str(html);
        self.set_inner_html(node, &markup);
    }

    /// Remove `node` from its parent. Returns false if it was not attached.
    fn detach(&mut self, node: NodeId) -> bool;

    /// Move `child` to the end of `parent`'s children.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Nearest positioned ancestor, as `offsetParent` reports it.
    fn offset_parent(&self, node: NodeId) -> Option<NodeId>;

    /// `offsetTop` relative to the offset parent.
    fn offset_top(&self, node: NodeId) -> f64;

    /// `offsetLeft` relative to the offset parent.
    fn offset_left(&self, node: NodeId) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_from_option() {
        assert_eq!(Lookup::from(Some(3)), Lookup::Found(3));
        assert_eq!(Lookup::<i32>::from(None), Lookup::NotFound);
    }

    #[test]
    fn test_found_or_missing_names_target() {
        let err = Lookup::<NodeId>::NotFound
            .found_or_missing(".user_content")
            .unwrap_err();
        assert!(matches!(err, NewsError::MissingElement(ref what) if what == ".user_content"));
        assert_eq!(Lookup::Found(1).found_or_missing("x").unwrap(), 1);
    }
}
