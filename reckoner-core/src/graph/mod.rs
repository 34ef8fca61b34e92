//! Dependency Graph
//!
//! This module holds the derived nodes of a calculator and the planner used
//! for coalesced cascades.
//!
//! # Overview
//!
//! The graph is implicit: nodes live in an insertion-ordered map owned by
//! the calculator, and edges live in the
//! [`SubscriberIndex`](crate::reactive::SubscriberIndex), keyed by name.
//!
//! - Nodes are fields or rows.
//! - An edge from A to B means B declared A as a dependency, so a change of
//!   A recalculates B.
//!
//! # Design Decisions
//!
//! 1. Nodes are addressed by registration position. Nodes are never removed,
//!    so positions are stable and double as the tie-breaker that keeps
//!    cascades deterministic.
//!
//! 2. The default cascade needs no planning: it follows subscriber lists
//!    depth-first. The [`UpdateScheduler`] is only used by the coalesced
//!    mode, which recalculates each affected node once in topological order.

mod node;
mod scheduler;

pub use node::Node;
pub use scheduler::UpdateScheduler;
