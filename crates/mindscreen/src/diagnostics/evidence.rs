use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bayes::Evidence;
use super::domain::DiagnosticError;
use super::facts::WorkingMemory;

/// How answer codes without an explicit network state are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidencePolicy {
    /// Unmapped codes are an error.
    #[default]
    Strict,
    /// Unmapped codes fall back to state 0 (absent) and are logged.
    Lenient,
}

/// Maps one answered fact onto a binary network node.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceRule {
    pub node: &'static str,
    pub fact: &'static str,
    pub present: &'static [u8],
    pub absent: &'static [u8],
}

impl EvidenceRule {
    pub const fn new(
        node: &'static str,
        fact: &'static str,
        present: &'static [u8],
        absent: &'static [u8],
    ) -> Self {
        Self {
            node,
            fact,
            present,
            absent,
        }
    }

    pub fn state_for(&self, code: u8) -> Option<usize> {
        if self.present.contains(&code) {
            Some(1)
        } else if self.absent.contains(&code) {
            Some(0)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EvidenceMapper {
    rules: &'static [EvidenceRule],
}

impl EvidenceMapper {
    pub const fn new(rules: &'static [EvidenceRule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [EvidenceRule] {
        self.rules
    }

    pub fn nodes(&self) -> impl Iterator<Item = &'static str> {
        self.rules.iter().map(|rule| rule.node)
    }

    pub fn map(
        &self,
        memory: &WorkingMemory,
        policy: EvidencePolicy,
    ) -> Result<Evidence, DiagnosticError> {
        let mut evidence = Evidence::new();
        for rule in self.rules {
            let code = memory.code(rule.fact)?;
            let state = match (rule.state_for(code), policy) {
                (Some(state), _) => state,
                (None, EvidencePolicy::Strict) => {
                    warn!(node = rule.node, fact = rule.fact, code, "answer code has no evidence mapping");
                    return Err(DiagnosticError::UnmappedEvidenceCode {
                        node: rule.node,
                        key: rule.fact,
                        code,
                    });
                }
                (None, EvidencePolicy::Lenient) => {
                    warn!(
                        node = rule.node,
                        fact = rule.fact,
                        code,
                        "answer code has no evidence mapping; treating as absent"
                    );
                    0
                }
            };
            evidence.insert(rule.node, state);
        }
        Ok(evidence)
    }
}
