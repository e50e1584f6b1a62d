use std::collections::HashMap;
use std::sync::Arc;

use rand::RngCore;
use serde::Serialize;
use serde_json::Value;

use super::generators::{ConstantDummy, ExpGrowth1, LinearEq1, LinearEq2};

/// One generated problem instance before rendering. `key` carries the
/// essential randomized parameters and is what admission compares; `aux`
/// carries whatever the formatter additionally needs (typically the answer).
#[derive(Debug, Clone)]
pub struct GeneratedProblem {
    pub key: Value,
    pub aux: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedProblem {
    pub question: String,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A named category of generatable practice problem: its generator, its
/// formatter, and its retention budget.
pub trait ProblemDefinition: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Maximum candidate keys retained across all days for this type.
    fn turnover_limit(&self) -> usize;

    fn documented(&self) -> bool {
        false
    }

    /// Whether the learner is expected to reach for a calculator.
    fn calculator(&self) -> bool {
        false
    }

    fn generate(&self, rng: &mut dyn RngCore) -> GeneratedProblem;

    fn format(&self, problem: &GeneratedProblem) -> FormattedProblem;
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemTypeInfo {
    pub id: String,
    pub name: String,
    pub documented: bool,
    pub calculator: bool,
    pub turnover_limit: usize,
}

#[derive(Default)]
pub struct ProblemCatalog {
    types: HashMap<String, Arc<dyn ProblemDefinition>>,
}

impl ProblemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_types() -> Self {
        let mut catalog = Self::new();
        catalog.register(Arc::new(LinearEq1));
        catalog.register(Arc::new(LinearEq2));
        catalog.register(Arc::new(ExpGrowth1));
        catalog.register(Arc::new(ConstantDummy));
        catalog
    }

    pub fn register(&mut self, definition: Arc<dyn ProblemDefinition>) {
        self.types.insert(definition.id().to_string(), definition);
    }

    pub fn get(&self, type_id: &str) -> Option<Arc<dyn ProblemDefinition>> {
        self.types.get(type_id).map(Arc::clone)
    }

    pub fn list(&self) -> Vec<ProblemTypeInfo> {
        let mut infos: Vec<ProblemTypeInfo> = self
            .types
            .values()
            .map(|def| ProblemTypeInfo {
                id: def.id().to_string(),
                name: def.name().to_string(),
                documented: def.documented(),
                calculator: def.calculator(),
                turnover_limit: def.turnover_limit(),
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }
}
