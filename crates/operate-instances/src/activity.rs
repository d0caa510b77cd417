//! Activity id options derived from the diagram's flow nodes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Label used for tasks without a name.
pub const UNNAMED_TASK: &str = "Unnamed task";

/// Kind of a flow node in a process diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowNodeType {
  Task,
  StartEvent,
  EndEvent,
  Event,
  ExclusiveGateway,
  ParallelGateway,
  Gateway,
  SubProcess,
  #[serde(other)]
  Other,
}

/// A flow node as reported by the diagram once it has rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
  #[serde(rename = "type")]
  pub node_type: FlowNodeType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
}

/// One entry of the activity id filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOption {
  pub value: String,
  pub label: String,
}

/// Task nodes as options sorted by label.
///
/// Labels compare byte-wise, so uppercase sorts before lowercase. Equal labels
/// fall back to the node id, which keeps the order independent of map
/// iteration.
pub fn activity_options(nodes: &HashMap<String, FlowNode>) -> Vec<ActivityOption> {
  let mut options: Vec<ActivityOption> = nodes
    .iter()
    .filter(|(_, node)| node.node_type == FlowNodeType::Task)
    .map(|(id, node)| ActivityOption {
      value: id.clone(),
      label: node
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNNAMED_TASK)
        .to_string(),
    })
    .collect();

  options.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| a.value.cmp(&b.value)));
  options
}
