use tracing::trace;

use super::factor::Factor;
use super::{BayesianNetwork, Evidence};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    #[error("unknown network variable '{0}'")]
    UnknownVariable(String),
    #[error("state {state} is out of range for '{variable}' ({cardinality} states)")]
    StateOutOfRange {
        variable: String,
        state: usize,
        cardinality: usize,
    },
    #[error("query variable '{0}' cannot also be observed")]
    QueryObserved(String),
    #[error("evidence for network node '{0}' is required")]
    MissingEvidence(String),
    #[error("observed evidence has zero probability under the model")]
    ImpossibleEvidence,
}

/// Exact posterior by variable elimination over the query's ancestral
/// subgraph. Barren descendants are never touched.
pub(super) fn variable_elimination(
    network: &BayesianNetwork,
    query: &str,
    evidence: &Evidence,
) -> Result<Vec<f64>, InferenceError> {
    let target = network
        .index_of(query)
        .ok_or_else(|| InferenceError::UnknownVariable(query.to_string()))?;

    let mut observed = Vec::with_capacity(evidence.len());
    for (name, state) in evidence.iter() {
        let index = network
            .index_of(name)
            .ok_or_else(|| InferenceError::UnknownVariable(name.to_string()))?;
        if index == target {
            return Err(InferenceError::QueryObserved(name.to_string()));
        }
        let cardinality = network.cardinality_of(index);
        if state >= cardinality {
            return Err(InferenceError::StateOutOfRange {
                variable: name.to_string(),
                state,
                cardinality,
            });
        }
        observed.push((index, state));
    }

    let relevant = network.ancestral_set(
        std::iter::once(target).chain(observed.iter().map(|(index, _)| *index)),
    );

    // Constant factors left by evidence reduction only rescale the result,
    // but a zero constant means the evidence is impossible.
    let mut constant = 1.0;
    let mut factors = Vec::with_capacity(relevant.len());
    for index in &relevant {
        let mut factor = network.factor(*index);
        for (var, state) in &observed {
            factor = factor.reduce(*var, *state);
        }
        if factor.is_scalar() {
            constant *= factor.scalar_value();
        } else {
            factors.push(factor);
        }
    }

    let mut hidden: Vec<usize> = relevant
        .into_iter()
        .filter(|index| *index != target && !observed.iter().any(|(var, _)| var == index))
        .collect();

    while !hidden.is_empty() {
        let slot = cheapest_elimination(&hidden, &factors);
        let var = hidden.remove(slot);
        trace!(variable = var, "eliminating network variable");

        let (touching, rest): (Vec<Factor>, Vec<Factor>) =
            factors.into_iter().partition(|factor| factor.contains(var));
        factors = rest;
        if let Some(product) = touching.into_iter().reduce(|left, right| left.product(&right)) {
            let summed = product.sum_out(var);
            if summed.is_scalar() {
                constant *= summed.scalar_value();
            } else {
                factors.push(summed);
            }
        }
    }

    let joint = factors
        .into_iter()
        .reduce(|left, right| left.product(&right))
        .ok_or(InferenceError::ImpossibleEvidence)?;
    let total: f64 = joint.values().iter().sum();
    if constant <= 0.0 || total <= 0.0 {
        return Err(InferenceError::ImpossibleEvidence);
    }
    Ok(joint.values().iter().map(|value| value / total).collect())
}

/// Index into `hidden` of the variable whose elimination builds the smallest
/// intermediate table. Ties keep network order.
fn cheapest_elimination(hidden: &[usize], factors: &[Factor]) -> usize {
    let mut best = (0, usize::MAX);
    for (slot, var) in hidden.iter().enumerate() {
        let mut scope: Vec<(usize, usize)> = Vec::new();
        for factor in factors.iter().filter(|factor| factor.contains(*var)) {
            for (member, card) in factor.vars().iter().zip(factor.cards()) {
                if !scope.iter().any(|(existing, _)| existing == member) {
                    scope.push((*member, *card));
                }
            }
        }
        let cost: usize = scope.iter().map(|(_, card)| *card).product();
        if cost < best.1 {
            best = (slot, cost);
        }
    }
    best.0
}
