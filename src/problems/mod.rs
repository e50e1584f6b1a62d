mod candidate;
mod catalog;
mod generators;

pub use candidate::CandidateKey;
pub use catalog::{
    FormattedProblem, GeneratedProblem, ProblemCatalog, ProblemDefinition, ProblemTypeInfo,
};
pub use generators::{ConstantDummy, ExpGrowth1, LinearEq1, LinearEq2};
