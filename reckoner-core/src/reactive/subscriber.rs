//! Subscriber index.
//!
//! Maps a dependency's name to the derived nodes that must recalculate when
//! it changes. Inputs and fields have separate namespaces, so there are two
//! maps. Subscribers are stored as registration positions in the
//! calculator's node map and kept in registration order, which is the order
//! a cascade visits them.
//!
//! The index is filled while the calculator is building and never changes
//! afterwards.

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::field::Field;

/// Position of a field or row in the calculator's node map.
pub type NodePosition = usize;

/// Ordered subscribers of one dependency.
pub type Subscribers = SmallVec<[NodePosition; 4]>;

#[derive(Debug, Default, Clone)]
pub struct SubscriberIndex {
    inputs: IndexMap<String, Subscribers>,
    fields: IndexMap<String, Subscribers>,
}

impl SubscriberIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every dependency `field` declares, with `field` living at
    /// `position`.
    ///
    /// Dependencies may name nodes that are not registered yet.
    pub(crate) fn register(&mut self, position: NodePosition, field: &Field) {
        for input in field.input_dependencies() {
            self.inputs.entry(input.clone()).or_default().push(position);
        }
        for dependency in field.field_dependencies() {
            self.fields.entry(dependency.clone()).or_default().push(position);
        }
    }

    /// Nodes to recalculate when the input `name` is set.
    pub fn input_subscribers(&self, name: &str) -> &[NodePosition] {
        self.inputs.get(name).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Nodes to recalculate when the field `name` changes.
    pub fn field_subscribers(&self, name: &str) -> &[NodePosition] {
        self.fields.get(name).map(|s| s.as_slice()).unwrap_or(&[])
    }
}
