//! Drag-and-drop reordering for nested task lists.
//!
//! The core is [`tracker::DragTracker`], which turns a stream of drag
//! gestures over an item forest into at most one normalized
//! [`tracker::MoveIntent`] per drag. [`ops::reorder_ops::apply_move`] applies
//! an intent to an [`model::ItemTree`]; the remaining modules load and save
//! tree files, persist session state, and drive everything from the
//! `reorder` CLI.

pub mod cli;
pub mod io;
pub mod logging;
pub mod model;
pub mod ops;
pub mod parse;
pub mod tracker;
