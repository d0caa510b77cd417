//! Operate Filter
//!
//! The filter narrows the set of workflow instances shown on the instances
//! page. It lives in three shapes:
//!
//! - [`Filter`]: the decoded, in-memory form (typed dates, id lists, variable)
//! - [`WireFilter`]: the form carried in the URL, where lists are comma-joined
//!   and the variable pair is a JSON-encoded string
//! - [`FilterRequest`]: the criteria sent to the backend count and selection
//!   endpoints
//!
//! A change made in the filters panel is a [`FilterPatch`], which can also
//! clear fields.
//!
//! The URL carries the wire form in a single `filter` query parameter:
//!
//! ```text
//! ?filter={"active":true,"incidents":true,"ids":"1,2","variable":"{\"name\":\"a\",\"value\":\"1\"}"}
//! ```

mod error;
mod filter;
mod patch;
mod query;
mod request;
mod wire;

pub use error::FilterError;
pub use filter::{Filter, VariableFilter, WorkflowVersion, default_filter};
pub use patch::FilterPatch;
pub use query::{filter_from_query, filter_query_string, parse_query_string};
pub use request::FilterRequest;
pub use wire::{WireFilter, decode_fields, decode_patch, encode_fields};
