//! Discrete Bayesian networks with exact inference.
//!
//! Conditional tables use the column layout common to most BN toolkits:
//! `values[state][column]`, where the column indexes the joint parent
//! assignment in mixed radix with the first parent most significant.

mod factor;
mod inference;

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use factor::Factor;
pub use inference::InferenceError;

const COLUMN_SUM_TOLERANCE: f64 = 1e-6;
const POSTERIOR_SCALE: f64 = 1e10;

#[derive(Debug, Clone, PartialEq)]
pub struct TabularCpd {
    variable: String,
    cardinality: usize,
    values: Vec<Vec<f64>>,
    parents: Vec<String>,
}

impl TabularCpd {
    pub fn root(variable: &str, prior: &[f64]) -> Self {
        Self {
            variable: variable.to_string(),
            cardinality: prior.len(),
            values: prior.iter().map(|probability| vec![*probability]).collect(),
            parents: Vec::new(),
        }
    }

    pub fn conditional(variable: &str, values: &[&[f64]], parents: &[&str]) -> Self {
        Self {
            variable: variable.to_string(),
            cardinality: values.len(),
            values: values.iter().map(|row| row.to_vec()).collect(),
            parents: parents.iter().map(|parent| parent.to_string()).collect(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn parents(&self) -> &[String] {
        &self.parents
    }

    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelValidationError {
    #[error("node '{0}' is declared more than once")]
    DuplicateNode(String),
    #[error("node '{node}' has cardinality {found}; at least 2 states are required")]
    Cardinality { node: String, found: usize },
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent { node: String, parent: String },
    #[error("node '{node}' lists parent '{parent}' twice")]
    DuplicateParent { node: String, parent: String },
    #[error("state row {row} of node '{node}' has {found} columns, expected {expected}")]
    ColumnCount {
        node: String,
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("node '{node}' holds probability {value} outside [0, 1]")]
    ProbabilityRange { node: String, value: f64 },
    #[error("column {column} of node '{node}' sums to {sum}, expected 1")]
    ColumnSum {
        node: String,
        column: usize,
        sum: f64,
    },
    #[error("network contains a cycle through {0:?}")]
    Cycle(Vec<String>),
    #[error("node '{0}' is not part of the network")]
    UnknownNode(String),
}

#[derive(Debug, Clone)]
struct Node {
    cpd: TabularCpd,
    parents: Vec<usize>,
}

/// Validated DAG of conditional probability tables.
#[derive(Debug, Clone)]
pub struct BayesianNetwork {
    nodes: Vec<Node>,
    index: BTreeMap<String, usize>,
}

impl BayesianNetwork {
    pub fn builder() -> NetworkBuilder {
        NetworkBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn cpd(&self, name: &str) -> Option<&TabularCpd> {
        self.index_of(name).map(|index| &self.nodes[index].cpd)
    }

    /// Every table in insertion order.
    pub fn cpds(&self) -> impl Iterator<Item = &TabularCpd> {
        self.nodes.iter().map(|node| &node.cpd)
    }

    /// Directed edges as `(parent, child)` pairs.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|node| {
                node.cpd
                    .parents
                    .iter()
                    .map(move |parent| (parent.as_str(), node.cpd.variable.as_str()))
            })
            .collect()
    }

    /// Posterior distribution of `variable` given `evidence`.
    pub fn query(&self, variable: &str, evidence: &Evidence) -> Result<Vec<f64>, InferenceError> {
        inference::variable_elimination(self, variable, evidence)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn cardinality_of(&self, index: usize) -> usize {
        self.nodes[index].cpd.cardinality
    }

    /// CPD of one node as a factor over `[parents..., node]`.
    fn factor(&self, index: usize) -> Factor {
        let node = &self.nodes[index];
        let card = node.cpd.cardinality;
        let mut vars = node.parents.clone();
        vars.push(index);
        let cards: Vec<usize> = vars.iter().map(|var| self.cardinality_of(*var)).collect();

        let columns = node.cpd.values.first().map_or(0, Vec::len);
        let mut values = vec![0.0; columns * card];
        for (state, row) in node.cpd.values.iter().enumerate() {
            for (column, probability) in row.iter().enumerate() {
                values[column * card + state] = *probability;
            }
        }
        Factor::new(vars, cards, values)
    }

    /// Seeds plus all of their ancestors, sorted by node index.
    fn ancestral_set(&self, seeds: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut seen = vec![false; self.nodes.len()];
        let mut pending: Vec<usize> = seeds.into_iter().collect();
        while let Some(index) = pending.pop() {
            if std::mem::replace(&mut seen[index], true) {
                continue;
            }
            pending.extend(self.nodes[index].parents.iter().copied());
        }
        seen.iter()
            .enumerate()
            .filter_map(|(index, kept)| kept.then_some(index))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct NetworkBuilder {
    cpds: Vec<TabularCpd>,
}

impl NetworkBuilder {
    pub fn cpd(mut self, cpd: TabularCpd) -> Self {
        self.cpds.push(cpd);
        self
    }

    pub fn build(self) -> Result<BayesianNetwork, ModelValidationError> {
        let mut index = BTreeMap::new();
        for (position, cpd) in self.cpds.iter().enumerate() {
            if index.insert(cpd.variable.clone(), position).is_some() {
                return Err(ModelValidationError::DuplicateNode(cpd.variable.clone()));
            }
            if cpd.cardinality < 2 {
                return Err(ModelValidationError::Cardinality {
                    node: cpd.variable.clone(),
                    found: cpd.cardinality,
                });
            }
        }

        let mut nodes = Vec::with_capacity(self.cpds.len());
        for cpd in self.cpds.iter() {
            let mut parents = Vec::with_capacity(cpd.parents.len());
            for parent in &cpd.parents {
                let position = index.get(parent).copied().ok_or_else(|| {
                    ModelValidationError::UnknownParent {
                        node: cpd.variable.clone(),
                        parent: parent.clone(),
                    }
                })?;
                if parents.contains(&position) {
                    return Err(ModelValidationError::DuplicateParent {
                        node: cpd.variable.clone(),
                        parent: parent.clone(),
                    });
                }
                parents.push(position);
            }

            let columns: usize = parents
                .iter()
                .map(|position| self.cpds[*position].cardinality)
                .product();
            validate_table(cpd, columns)?;
            nodes.push(Node {
                cpd: cpd.clone(),
                parents,
            });
        }

        reject_cycles(&nodes)?;
        Ok(BayesianNetwork { nodes, index })
    }
}

fn validate_table(cpd: &TabularCpd, columns: usize) -> Result<(), ModelValidationError> {
    for (row, values) in cpd.values.iter().enumerate() {
        if values.len() != columns {
            return Err(ModelValidationError::ColumnCount {
                node: cpd.variable.clone(),
                row,
                expected: columns,
                found: values.len(),
            });
        }
        if let Some(value) = values
            .iter()
            .find(|value| !(0.0..=1.0).contains(*value))
        {
            return Err(ModelValidationError::ProbabilityRange {
                node: cpd.variable.clone(),
                value: *value,
            });
        }
    }

    for column in 0..columns {
        let sum: f64 = cpd.values.iter().map(|row| row[column]).sum();
        if (sum - 1.0).abs() > COLUMN_SUM_TOLERANCE {
            return Err(ModelValidationError::ColumnSum {
                node: cpd.variable.clone(),
                column,
                sum,
            });
        }
    }
    Ok(())
}

fn reject_cycles(nodes: &[Node]) -> Result<(), ModelValidationError> {
    let mut in_degree: Vec<usize> = nodes.iter().map(|node| node.parents.len()).collect();
    let mut children = vec![Vec::new(); nodes.len()];
    for (child, node) in nodes.iter().enumerate() {
        for parent in &node.parents {
            children[*parent].push(child);
        }
    }

    let mut ready: VecDeque<usize> = (0..nodes.len())
        .filter(|position| in_degree[*position] == 0)
        .collect();
    let mut visited = 0;
    while let Some(position) = ready.pop_front() {
        visited += 1;
        for child in &children[position] {
            in_degree[*child] -= 1;
            if in_degree[*child] == 0 {
                ready.push_back(*child);
            }
        }
    }

    if visited == nodes.len() {
        return Ok(());
    }
    let stuck = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree > 0)
        .map(|(position, _)| nodes[position].cpd.variable.clone())
        .collect();
    Err(ModelValidationError::Cycle(stuck))
}

/// Observed node states keyed by node name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Evidence(BTreeMap<String, usize>);

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: impl Into<String>, state: usize) {
        self.0.insert(node.into(), state);
    }

    pub fn with(mut self, node: impl Into<String>, state: usize) -> Self {
        self.insert(node, state);
        self
    }

    pub fn get(&self, node: &str) -> Option<usize> {
        self.0.get(node).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(node, state)| (node.as_str(), *state))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, usize)> for Evidence {
    fn from_iter<T: IntoIterator<Item = (&'a str, usize)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(node, state)| (node.to_string(), state))
                .collect(),
        )
    }
}

/// A network bound to the binary outcome node a condition reports on.
#[derive(Debug, Clone)]
pub struct RiskModel {
    network: BayesianNetwork,
    outcome: String,
    evidence_nodes: Vec<String>,
}

impl RiskModel {
    pub fn new(
        network: BayesianNetwork,
        outcome: &str,
        evidence_nodes: &[&str],
    ) -> Result<Self, ModelValidationError> {
        for node in std::iter::once(&outcome).chain(evidence_nodes) {
            if !network.contains(node) {
                return Err(ModelValidationError::UnknownNode(node.to_string()));
            }
        }
        Ok(Self {
            network,
            outcome: outcome.to_string(),
            evidence_nodes: evidence_nodes.iter().map(|node| node.to_string()).collect(),
        })
    }

    pub fn network(&self) -> &BayesianNetwork {
        &self.network
    }

    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    pub fn evidence_nodes(&self) -> &[String] {
        &self.evidence_nodes
    }

    /// Posterior probability of the outcome's state 1, rounded to 10 decimals.
    pub fn probability(&self, evidence: &Evidence) -> Result<f64, InferenceError> {
        if let Some(missing) = self
            .evidence_nodes
            .iter()
            .find(|node| evidence.get(node).is_none())
        {
            return Err(InferenceError::MissingEvidence(missing.clone()));
        }
        let posterior = self.network.query(&self.outcome, evidence)?;
        let present = posterior.get(1).copied().unwrap_or_default();
        Ok((present * POSTERIOR_SCALE).round() / POSTERIOR_SCALE)
    }
}
