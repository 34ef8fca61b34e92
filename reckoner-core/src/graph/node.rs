//! Graph Nodes
//!
//! Derived nodes come in two kinds sharing one recalculation protocol. A
//! `Node` wraps either and exposes the shared [`Field`] part.

use crate::reactive::{Field, Row};

/// A derived node in the calculator.
#[derive(Debug)]
pub enum Node {
    Field(Field),
    Row(Row),
}

impl Node {
    pub fn name(&self) -> &str {
        self.field().name()
    }

    /// The value-carrying part shared by both kinds.
    pub fn field(&self) -> &Field {
        match self {
            Node::Field(field) => field,
            Node::Row(row) => row.field(),
        }
    }

    pub(crate) fn field_mut(&mut self) -> &mut Field {
        match self {
            Node::Field(field) => field,
            Node::Row(row) => row.field_mut(),
        }
    }

    pub fn as_row(&self) -> Option<&Row> {
        match self {
            Node::Row(row) => Some(row),
            Node::Field(_) => None,
        }
    }

    pub(crate) fn as_row_mut(&mut self) -> Option<&mut Row> {
        match self {
            Node::Row(row) => Some(row),
            Node::Field(_) => None,
        }
    }

    /// Whether this is a row that is currently visible.
    pub fn is_visible_row(&self) -> bool {
        self.as_row().is_some_and(Row::is_visible)
    }
}
