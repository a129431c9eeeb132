//! Job planning: assigning nodes to jobs and deriving `needs`.
//!
//! Multi-job boundaries follow one rule: an edge `u -> v` stays inside a job
//! iff `u` has exactly one successor and `v` has exactly one predecessor.
//! Every other edge crosses jobs and becomes exactly one `needs` entry, so the
//! job graph mirrors the edge set. For a nested diamond with edges
//! `a->b, a->c, b->d, b->e, d->f, e->f, c->f`, every node starts its own job:
//! each edge leaves a fan-out (`a`, `b`) or enters a fan-in (`f`). A plain
//! chain `x -> y -> z` collapses into one job.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::error::{Phase, Result};
use crate::graph::{DependencyIndex, Node, Position};

/// A synthesis-time job: ordered node ids plus the jobs it waits for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: String,
    pub steps: Vec<String>,
    pub needs: Vec<String>,
}

pub const SINGLE_JOB_ID: &str = "build";

/// One job with all nodes sorted top-to-bottom (stable, so ties keep array order).
pub fn plan_single_job(nodes: &[Node]) -> Vec<Job> {
    let mut ordered: Vec<&Node> = nodes.iter().collect();
    ordered.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    vec![Job {
        id: SINGLE_JOB_ID.to_string(),
        steps: ordered.into_iter().map(|n| n.id.clone()).collect(),
        needs: Vec::new(),
    }]
}

/// Split the graph into chain jobs in dependency order.
pub fn plan_multi_job(nodes: &[Node], index: &DependencyIndex) -> Result<Vec<Job>> {
    index.ensure_acyclic(Phase::Synthesize)?;

    let positions: HashMap<&str, Position> =
        nodes.iter().map(|n| (n.id.as_str(), n.position)).collect();
    let order = index.topological_order(Phase::Synthesize, |id| {
        LayoutKey(positions.get(id).copied().unwrap_or_default())
    })?;

    let mut jobs: Vec<Job> = Vec::new();
    let mut job_of: HashMap<&str, usize> = HashMap::new();

    for id in &order {
        let continues_chain = match index.predecessors(id).as_slice() {
            [only] if index.out_degree(only) == 1 => job_of.get(only).copied(),
            _ => None,
        };

        let slot = match continues_chain {
            Some(slot) => {
                jobs[slot].steps.push(id.clone());
                slot
            }
            None => {
                jobs.push(Job {
                    id: format!("job_{}", jobs.len() + 1),
                    steps: vec![id.clone()],
                    needs: Vec::new(),
                });
                jobs.len() - 1
            }
        };
        job_of.insert(id.as_str(), slot);
    }

    // Heads only have cross-job predecessors.
    for slot in 0..jobs.len() {
        let head = jobs[slot].steps[0].clone();
        let mut needed: Vec<usize> = index
            .predecessors(&head)
            .into_iter()
            .filter_map(|pred| job_of.get(pred).copied())
            .collect();
        needed.sort_unstable();
        needed.dedup();
        let needs: Vec<String> = needed.into_iter().map(|n| jobs[n].id.clone()).collect();
        jobs[slot].needs = needs;
    }

    debug!(jobs = jobs.len(), nodes = order.len(), "planned multi-job workflow");
    Ok(jobs)
}

/// Ready-queue priority: top-to-bottom, then left-to-right.
#[derive(Debug, Clone, Copy)]
struct LayoutKey(Position);

impl PartialEq for LayoutKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LayoutKey {}

impl PartialOrd for LayoutKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LayoutKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .y
            .total_cmp(&other.0.y)
            .then_with(|| self.0.x.total_cmp(&other.0.x))
    }
}
