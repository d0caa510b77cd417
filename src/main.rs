use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use operate_client::HttpInstancesClient;
use operate_filter::{WireFilter, decode_patch, filter_query_string};
use operate_instances::{
  HeaderView, History, InstancesPage, InstancesState, Location, MemoryHistory, PageEvent,
};
use operate_store::{FileStateStore, StateStore};

const INSTANCES_PATH: &str = "/instances";
const STATE_FILE: &str = "instances.json";

/// Operate - inspect and group workflow instances from the command line
#[derive(Parser)]
#[command(name = "operate")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Base URL of the operate backend
  #[arg(
    long,
    global = true,
    env = "OPERATE_BASE_URL",
    default_value = "http://localhost:8080/"
  )]
  base_url: String,

  /// Path to the data directory (default: ~/.operate)
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,

  /// Query string to read the filter from (default: the stored filter)
  #[arg(long, global = true)]
  query: Option<String>,

  /// Log at debug level
  #[arg(long, short, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the page state for the current filter
  Show,

  /// Merge filter fields into the current filter
  Filter {
    /// Filter fields in URL encoding, e.g. '{"completed":true,"ids":"1,2"}'.
    /// An empty string clears a field: '{"startDate":""}'
    patch: String,
  },

  /// Go back to the default filter
  Reset,

  /// Manage saved selections
  Select {
    #[command(subcommand)]
    target: SelectTarget,
  },
}

#[derive(Subcommand)]
enum SelectTarget {
  /// Save instances as a new selection
  Add {
    /// Instance ids to pick (default: everything matching the filter)
    #[arg(long = "instance")]
    instances: Vec<String>,
  },

  /// Add instances to an existing selection
  Extend {
    selection_id: u64,

    /// Instance ids to pick (default: everything matching the filter)
    #[arg(long = "instance")]
    instances: Vec<String>,
  },

  /// Delete a selection
  Remove { selection_id: u64 },
}

/// What gets printed after a command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
  search: String,
  header: HeaderView,
  #[serde(flatten)]
  state: &'a InstancesState,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let data_dir = match &cli.data_dir {
    Some(dir) => dir.clone(),
    None => dirs::home_dir()
      .context("could not determine home directory")?
      .join(".operate"),
  };

  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run(cli, data_dir).await })
}

fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "info" };
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_level.into()),
    )
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time(),
    )
    .init();
}

async fn run(cli: Cli, data_dir: PathBuf) -> Result<()> {
  let events = match cli.command {
    Some(command) => command_events(command)?,
    None => {
      println!("operate - use --help to see available commands");
      return Ok(());
    }
  };

  let client = HttpInstancesClient::new(&cli.base_url)
    .with_context(|| format!("invalid base url: {}", cli.base_url))?;

  let store = Arc::new(FileStateStore::new(data_dir.join(STATE_FILE)));
  tracing::debug!(
    base_url = %client.base_url(),
    state_file = %store.path().display(),
    "mounting instances page"
  );

  let search = match cli.query {
    Some(query) => query,
    None => stored_search(&*store).await,
  };
  let history = Arc::new(MemoryHistory::new(Location::new(INSTANCES_PATH, search)));

  let mut page = InstancesPage::mount(Arc::new(client), store, history.clone()).await;
  page.settle().await;

  for event in events {
    page.dispatch(event);
    page.settle().await;
  }

  let state = page.state();
  let output = Output {
    search: history.location().search,
    header: state.header(),
    state,
  };
  println!("{}", serde_json::to_string_pretty(&output)?);

  if let Some(message) = &state.error_message {
    bail!("{message}");
  }
  Ok(())
}

/// Events a subcommand sends to the page after it has mounted.
fn command_events(command: Commands) -> Result<Vec<PageEvent>> {
  let events = match command {
    Commands::Show => vec![],
    Commands::Filter { patch } => {
      let wire: WireFilter =
        serde_json::from_str(&patch).context("failed to parse filter patch")?;
      let patch = decode_patch(wire).context("invalid filter patch")?;
      if patch.is_empty() {
        bail!("filter patch sets no fields");
      }
      vec![PageEvent::FilterChanged(patch)]
    }
    Commands::Reset => vec![PageEvent::FilterReset],
    Commands::Select { target } => match target {
      SelectTarget::Add { instances } => {
        let mut events = pick(instances);
        events.push(PageEvent::AddNewSelection);
        events
      }
      SelectTarget::Extend {
        selection_id,
        instances,
      } => {
        let mut events = pick(instances);
        events.push(PageEvent::AddToSelection(selection_id));
        events
      }
      SelectTarget::Remove { selection_id } => vec![PageEvent::RemoveSelection(selection_id)],
    },
  };
  Ok(events)
}

fn pick(instances: Vec<String>) -> Vec<PageEvent> {
  if instances.is_empty() {
    vec![PageEvent::SelectAll]
  } else {
    instances.into_iter().map(PageEvent::ToggleInstance).collect()
  }
}

/// Query string of the stored filter, or empty when there is none.
async fn stored_search(store: &dyn StateStore) -> String {
  match store.get().await {
    Ok(state) => state
      .filter
      .map(|filter| filter_query_string(&filter))
      .unwrap_or_default(),
    Err(e) => {
      tracing::warn!(error = %e, "failed to read stored filter");
      String::new()
    }
  }
}
