//! Fan-out of requests to cluster nodes
//!
//! Each node gets its own scoped worker thread. Every node is attempted;
//! failures are collected and raised once as `AggregateRemote` after the
//! whole batch finished. Successful nodes are not rolled back.

use serde::Deserialize;

use crate::errors::{CibError, NodeFailure, Result};

/// Transport to a single cluster node
pub trait NodeCommunicator: Sync {
    /// Send `request` with form `data` to `node` and return the response body
    ///
    /// # Errors
    ///
    /// `NodeCommunication` when the node cannot be reached or rejects the
    /// request.
    fn call_node(&self, node: &str, request: &str, data: &[(String, String)]) -> Result<String>;
}

/// Run `task` for every node concurrently and return the results in node order
pub fn run_parallel_on_nodes<T, F>(nodes: &[String], task: F) -> Vec<(String, Result<T>)>
where
    T: Send,
    F: Fn(&str) -> Result<T> + Sync,
{
    let task = &task;
    std::thread::scope(|scope| {
        let handles: Vec<_> = nodes
            .iter()
            .map(|node| (node, scope.spawn(move || task(node.as_str()))))
            .collect();
        handles
            .into_iter()
            .map(|(node, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(CibError::Internal {
                        message: format!("worker for node {} panicked", node),
                    })
                });
                (node.clone(), result)
            })
            .collect()
    })
}

fn failure_reason(err: &CibError) -> String {
    match err {
        CibError::NodeCommunication { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

/// Turn per-node results into successes or one aggregate error
///
/// # Errors
///
/// `AggregateRemote` listing every failed node.
pub fn collect_node_results<T>(results: Vec<(String, Result<T>)>) -> Result<Vec<(String, T)>> {
    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for (node, result) in results {
        match result {
            Ok(value) => successes.push((node, value)),
            Err(err) => {
                tracing::debug!(node = %node, error = %err, "node call failed");
                failures.push(NodeFailure {
                    reason: failure_reason(&err),
                    node,
                });
            }
        }
    }
    if failures.is_empty() {
        Ok(successes)
    } else {
        Err(CibError::AggregateRemote { failures })
    }
}

/// Service management actions available on every node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Enable,
    Disable,
    Start,
    Stop,
    Kill,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Enable => "enable",
            ServiceAction::Disable => "disable",
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Kill => "kill",
        }
    }
}

/// Request path for an action on a service, e.g. `remote/sbd_enable`
pub fn service_request(service: &str, action: ServiceAction) -> String {
    format!("remote/{}_{}", service, action.as_str())
}

/// Run a service action on every node
///
/// # Errors
///
/// `AggregateRemote` when any node failed; the others still ran the action.
pub fn service_action_on_all_nodes(
    communicator: &dyn NodeCommunicator,
    nodes: &[String],
    service: &str,
    action: ServiceAction,
) -> Result<()> {
    let request = service_request(service, action);
    let results = run_parallel_on_nodes(nodes, |node| {
        communicator.call_node(node, &request, &[]).map(|_| ())
    });
    collect_node_results(results).map(|_| ())
}

/// Service state reported by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ServiceStatus {
    pub installed: bool,
    pub running: bool,
}

/// Ask every node whether `service` is installed and running
///
/// A node answering with anything but `{"installed": bool, "running": bool}`
/// counts as failed.
///
/// # Errors
///
/// `AggregateRemote` listing unreachable nodes and invalid responses.
pub fn check_service_on_all_nodes(
    communicator: &dyn NodeCommunicator,
    nodes: &[String],
    service: &str,
) -> Result<Vec<(String, ServiceStatus)>> {
    let request = format!("remote/check_{}", service);
    let results = run_parallel_on_nodes(nodes, |node| {
        let body = communicator.call_node(node, &request, &[])?;
        serde_json::from_str::<ServiceStatus>(&body).map_err(|_| CibError::NodeCommunication {
            node: node.to_string(),
            reason: "invalid data received".to_string(),
        })
    });
    collect_node_results(results)
}
