//! Operate Selection
//!
//! A selection is a saved group of workflow instances: everything matching a
//! filter, narrowed or widened by manual picks. This crate holds the selection
//! types, the request payload built from the filter and the selection in
//! progress, and the [`SelectionList`] with its counters.
//!
//! [`SelectionList`] transitions never mutate in place. Each returns a new
//! list, so a caller either commits the whole result or nothing.

mod error;
mod fragment;
mod instance;
mod list;
mod payload;
mod selection;

pub use error::SelectionError;
pub use fragment::SelectionFragment;
pub use instance::{InstanceState, InstancesDetails, WorkflowInstance};
pub use list::SelectionList;
pub use payload::{SelectionPayload, SelectionQuery, get_payload};
pub use selection::Selection;
