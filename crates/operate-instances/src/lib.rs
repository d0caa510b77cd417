//! Operate Instances
//!
//! State machine behind the instances page of the operate console. It owns
//! the active filter (read from the URL), the saved selections and the
//! derived counters, and keeps three things in step with them:
//!
//! - the URL, so every filter is an explicit, shareable query string
//! - the [`StateStore`](operate_store::StateStore), so counts and selections
//!   survive a reload
//! - the presentation components, through [`InstancesPage::subscribe`]
//!
//! # Usage
//!
//! ```ignore
//! use operate_instances::{InstancesPage, Location, MemoryHistory, PageEvent};
//!
//! let history = Arc::new(MemoryHistory::new(Location::new("/instances", "")));
//! let mut page = InstancesPage::mount(client, store, history).await;
//!
//! page.dispatch(PageEvent::SelectAll);
//! page.dispatch(PageEvent::AddNewSelection);
//! page.settle().await;
//!
//! assert_eq!(page.state().selections.selection_count(), 1);
//! ```

mod activity;
mod error;
mod event;
mod history;
mod page;
mod persist;
mod state;
mod token;
mod view;

pub use activity::{ActivityOption, FlowNode, FlowNodeType, UNNAMED_TASK, activity_options};
pub use error::PageError;
pub use event::PageEvent;
pub use history::{History, Location, MemoryHistory};
pub use page::{InstancesPage, PageHandle};
pub use state::{InstancesState, WorkflowRef};
pub use token::{RequestSequence, RequestToken};
pub use view::{DEFAULT_PANE_TITLE, HeaderView};
