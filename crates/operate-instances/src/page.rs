//! The instances page controller.
//!
//! All state transitions happen on the page's own loop, one message at a
//! time. Fetches run as spawned tasks and report back through the same
//! channel, so their results are just more messages.
//!
//! ```text
//!  router / panels / diagram ──PageEvent──┐
//!                                         ▼
//!                  ┌──────────── InstancesPage loop ────────────┐
//!                  │ transition snapshot → commit → side effects│
//!                  └──────┬──────────────┬──────────────┬───────┘
//!                   fetch tasks     Persister task   watch channel
//!                  (Completion)      (StateStore)    (presentation)
//! ```

use std::future::Future;
use std::sync::Arc;

use operate_client::InstancesClient;
use operate_filter::{
  Filter, FilterPatch, FilterRequest, default_filter, filter_from_query, filter_query_string,
};
use operate_selection::get_payload;
use operate_store::{PersistedState, StatePatch, StateStore};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::PageError;
use crate::event::{Completion, PageEvent, PageMessage};
use crate::history::{History, Location};
use crate::persist::Persister;
use crate::state::InstancesState;
use crate::token::RequestSequence;

/// Cloneable handle for sending events to a page from other tasks.
#[derive(Debug, Clone)]
pub struct PageHandle {
  sender: mpsc::UnboundedSender<PageMessage>,
}

impl PageHandle {
  /// Queue an event. Fails once the page has detached.
  pub fn dispatch(&self, event: PageEvent) -> Result<(), PageError> {
    self
      .sender
      .send(PageMessage::Event(event))
      .map_err(|_| PageError::Detached)
  }
}

/// Owner of the instances page state.
pub struct InstancesPage {
  state: InstancesState,
  client: Arc<dyn InstancesClient>,
  history: Arc<dyn History>,
  persister: Persister,
  count_requests: RequestSequence,
  /// Query string the current filter was read from.
  current_search: Option<String>,
  in_flight: usize,
  sender: mpsc::UnboundedSender<PageMessage>,
  receiver: mpsc::UnboundedReceiver<PageMessage>,
  snapshot: watch::Sender<InstancesState>,
}

impl InstancesPage {
  /// Load the stored state, read the filter from the current URL and start
  /// counting the matching instances.
  ///
  /// An unreadable store is logged and treated as empty.
  pub async fn mount(
    client: Arc<dyn InstancesClient>,
    store: Arc<dyn StateStore>,
    history: Arc<dyn History>,
  ) -> Self {
    let persisted = match store.get().await {
      Ok(persisted) => persisted,
      Err(e) => {
        warn!(error = %e, "failed to read stored instances state, starting empty");
        PersistedState::default()
      }
    };

    let state = InstancesState::from_persisted(&persisted);
    let (sender, receiver) = mpsc::unbounded_channel();
    let (snapshot, _) = watch::channel(state.clone());

    let mut page = Self {
      state,
      client,
      history,
      persister: Persister::spawn(store),
      count_requests: RequestSequence::new(),
      current_search: None,
      in_flight: 0,
      sender,
      receiver,
      snapshot,
    };

    info!(
      selections = page.state.selections.selection_count(),
      "mounted instances page"
    );

    let location = page.history.location();
    page.set_filter_from_url(&location.search);
    page
  }

  /// The current snapshot.
  pub fn state(&self) -> &InstancesState {
    &self.state
  }

  /// Watch committed snapshots. The receiver keeps the last snapshot after
  /// the page detaches.
  pub fn subscribe(&self) -> watch::Receiver<InstancesState> {
    self.snapshot.subscribe()
  }

  pub fn handle(&self) -> PageHandle {
    PageHandle {
      sender: self.sender.clone(),
    }
  }

  /// Number of fetches whose results have not been processed yet.
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  /// Apply one event immediately.
  pub fn dispatch(&mut self, event: PageEvent) {
    match event {
      PageEvent::LocationChanged(location) => self.on_location_changed(&location.search),
      PageEvent::FilterChanged(patch) => self.handle_filter_change(&patch),
      PageEvent::FilterReset => self.handle_filter_reset(),
      PageEvent::WorkflowChanged(workflow) => {
        let next = self.state.with_workflow(workflow);
        self.commit(next);
      }
      PageEvent::FlowNodesReady(nodes) => {
        let next = self.state.with_flow_nodes(&nodes);
        debug!(options = next.activity_ids.len(), "activity options updated");
        self.commit(next);
      }
      PageEvent::UpdateSelection(fragment) => {
        let next = self.state.with_selection_fragment(fragment);
        self.commit(next);
      }
      PageEvent::ToggleInstance(instance_id) => {
        let mut fragment = self.state.selection.clone();
        fragment.toggle(&instance_id);
        let next = self.state.with_selection_fragment(fragment);
        self.commit(next);
      }
      PageEvent::SelectAll => {
        let mut fragment = self.state.selection.clone();
        fragment.select_all();
        let next = self.state.with_selection_fragment(fragment);
        self.commit(next);
      }
      PageEvent::AddNewSelection => self.handle_add_new_selection(),
      PageEvent::AddToSelection(selection_id) => self.handle_add_to_selection_by_id(selection_id),
      PageEvent::AddToOpenSelection => match self.state.open_selection {
        Some(selection_id) => self.handle_add_to_selection_by_id(selection_id),
        None => self.show_error(PageError::NoOpenSelection),
      },
      PageEvent::ToggleOpenSelection(selection_id) => {
        match self.state.with_open_selection_toggled(selection_id) {
          Ok(next) => self.commit(next),
          Err(e) => self.show_error(e),
        }
      }
      PageEvent::RemoveSelection(selection_id) => self.handle_remove_selection(selection_id),
      PageEvent::DismissError => {
        let next = self.state.without_error();
        self.commit(next);
      }
    }
  }

  /// Wait for the next queued message and apply it.
  pub async fn process_next(&mut self) -> bool {
    match self.receiver.recv().await {
      Some(message) => {
        self.handle_message(message);
        true
      }
      None => false,
    }
  }

  /// Apply queued messages until no fetch is outstanding, then wait for the
  /// pending writes to reach the store.
  pub async fn settle(&mut self) {
    loop {
      while let Ok(message) = self.receiver.try_recv() {
        self.handle_message(message);
      }
      if self.in_flight == 0 {
        break;
      }
      if let Some(message) = self.receiver.recv().await {
        self.handle_message(message);
      }
    }
    self.persister.flush().await;
  }

  /// Run the event loop until cancelled, then detach.
  pub async fn run(mut self, cancel: CancellationToken) {
    info!("instances page running");

    loop {
      tokio::select! {
        biased;
        _ = cancel.cancelled() => break,
        message = self.receiver.recv() => match message {
          Some(message) => self.handle_message(message),
          None => break,
        },
      }
    }

    self.detach().await;
  }

  /// Unmount the page. Results of fetches still in flight are dropped with
  /// the receiver; writes already queued are finished.
  pub async fn detach(self) {
    self.persister.flush().await;
    info!(dropped_fetches = self.in_flight, "instances page detached");
  }

  fn handle_message(&mut self, message: PageMessage) {
    match message {
      PageMessage::Event(event) => self.dispatch(event),
      PageMessage::Completion(completion) => self.handle_completion(completion),
    }
  }

  fn commit(&mut self, next: InstancesState) {
    self.state = next;
    self.snapshot.send_replace(self.state.clone());
  }

  fn show_error(&mut self, error: PageError) {
    warn!(error = %error, "instances page error");
    let next = self.state.with_error(error.to_string());
    self.commit(next);
  }

  fn spawn_fetch<F>(&mut self, fetch: F)
  where
    F: Future<Output = Completion> + Send + 'static,
  {
    self.in_flight += 1;
    let sender = self.sender.clone();
    tokio::spawn(async move {
      let completion = fetch.await;
      // the receiver is gone once the page detached
      let _ = sender.send(PageMessage::Completion(completion));
    });
  }

  fn on_location_changed(&mut self, search: &str) {
    if self.current_search.as_deref() == Some(search) {
      return;
    }
    self.set_filter_from_url(search);
  }

  fn set_filter_from_url(&mut self, search: &str) {
    let filter = match filter_from_query(search) {
      Ok(filter) => {
        self.current_search = Some(search.to_string());
        filter
      }
      Err(e) => {
        debug!(error = %e, search, "no valid filter in url, using default");
        let filter = default_filter();
        let search = self.set_filter_in_url(&filter);
        self.current_search = Some(search);
        filter
      }
    };

    let next = self.state.with_filter(filter);
    self.commit(next);
    self.handle_filter_count();
  }

  /// Push the filter's query string and return it.
  fn set_filter_in_url(&mut self, filter: &Filter) -> String {
    let search = filter_query_string(filter);
    let pathname = self.history.location().pathname;
    self.history.push(Location::new(pathname, search.clone()));
    search
  }

  fn navigate(&mut self, filter: &Filter) {
    let search = self.set_filter_in_url(filter);
    self.on_location_changed(&search);
  }

  fn handle_filter_count(&mut self) {
    let token = self.count_requests.issue();
    let criteria = FilterRequest::from(&self.state.filter);
    let client = Arc::clone(&self.client);

    debug!(token = token.value(), "requesting filter count");
    self.spawn_fetch(async move {
      let result = client.fetch_workflow_instances_count(&criteria).await;
      Completion::FilterCount { token, result }
    });
  }

  fn handle_filter_change(&mut self, patch: &FilterPatch) {
    let merged = self.state.filter.merge(patch);
    // a merge that leaves nothing set falls back to the default
    let filter = if merged.is_empty() {
      default_filter()
    } else {
      merged
    };
    self.apply_filter(&filter);
  }

  fn handle_filter_reset(&mut self) {
    self.apply_filter(&default_filter());
  }

  /// Navigate to `filter` and store the filter the page ends up using.
  fn apply_filter(&mut self, filter: &Filter) {
    self.navigate(filter);
    self
      .persister
      .put(StatePatch::filter(self.state.filter.clone()));
  }

  fn handle_add_new_selection(&mut self) {
    if self.state.selection.is_empty() {
      self.show_error(PageError::EmptySelection);
      return;
    }

    let payload = get_payload(&self.state.filter, &self.state.selection, None);
    let client = Arc::clone(&self.client);
    self.spawn_fetch(async move {
      let result = client.fetch_workflow_instance_by_selection(&payload).await;
      Completion::NewSelection { payload, result }
    });
  }

  fn handle_add_to_selection_by_id(&mut self, selection_id: u64) {
    let payload = match self.state.selections.get(selection_id) {
      None => {
        self.show_error(PageError::SelectionNotFound(selection_id));
        return;
      }
      Some(_) if self.state.selection.is_empty() => {
        self.show_error(PageError::EmptySelection);
        return;
      }
      Some(existing) => get_payload(&self.state.filter, &self.state.selection, Some(existing)),
    };

    let client = Arc::clone(&self.client);
    self.spawn_fetch(async move {
      let result = client.fetch_workflow_instance_by_selection(&payload).await;
      Completion::SelectionExtended {
        selection_id,
        payload,
        result,
      }
    });
  }

  fn handle_remove_selection(&mut self, selection_id: u64) {
    match self.state.without_selection(selection_id) {
      Ok(next) => {
        let patch = StatePatch::selection_list(&next.selections);
        self.commit(next);
        self.persister.put(patch);
        info!(selection_id, "removed selection");
      }
      Err(e) => self.show_error(e),
    }
  }

  fn handle_completion(&mut self, completion: Completion) {
    self.in_flight = self.in_flight.saturating_sub(1);

    match completion {
      Completion::FilterCount { token, result } => {
        if !self.count_requests.is_latest(token) {
          debug!(token = token.value(), "discarding stale filter count");
          return;
        }
        match result {
          Ok(filter_count) => {
            let next = self.state.with_filter_count(filter_count);
            self.commit(next);
            self.persister.put(StatePatch::filter_count(filter_count));
          }
          Err(e) => self.show_error(e.into()),
        }
      }

      Completion::NewSelection { payload, result } => match result {
        Ok(details) => {
          let total_count = details.total_count;
          let next = self.state.with_new_selection(payload, details);
          let patch = StatePatch::selection_list(&next.selections);
          self.commit(next);
          self.persister.put(patch);
          info!(
            selection_id = self.state.selections.rolling_selection_index(),
            total_count, "created selection"
          );
        }
        Err(e) => self.show_error(e.into()),
      },

      Completion::SelectionExtended {
        selection_id,
        payload,
        result,
      } => {
        let next = result
          .map_err(PageError::from)
          .and_then(|details| self.state.with_merged_selection(selection_id, payload, details));
        match next {
          Ok(next) => {
            let patch = StatePatch::selection_list(&next.selections);
            self.commit(next);
            self.persister.put(patch);
            info!(selection_id, "extended selection");
          }
          Err(e) => self.show_error(e),
        }
      }
    }
  }
}
