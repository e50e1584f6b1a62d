use rand::{Rng, RngCore};
use serde_json::json;

use super::catalog::{FormattedProblem, GeneratedProblem, ProblemDefinition};

/// Solve for x: x + a = b, integer a and b in -10..=10.
pub struct LinearEq1;

impl ProblemDefinition for LinearEq1 {
    fn id(&self) -> &str {
        "lineareq1"
    }

    fn name(&self) -> &str {
        "solving simple linear equations"
    }

    fn turnover_limit(&self) -> usize {
        // 441 distinct (a, b) pairs; keep roughly half in rotation.
        200
    }

    fn generate(&self, rng: &mut dyn RngCore) -> GeneratedProblem {
        let a = rng.random_range(-10..=10);
        let b = rng.random_range(-10..=10);
        GeneratedProblem {
            key: json!([a, b]),
            aux: json!(b - a),
        }
    }

    fn format(&self, problem: &GeneratedProblem) -> FormattedProblem {
        let a = problem.key[0].as_i64().unwrap_or(0);
        let b = problem.key[1].as_i64().unwrap_or(0);
        let answer = problem.aux.as_i64().unwrap_or(0);

        FormattedProblem {
            question: format!("Solve for x: x + {a} = {b}"),
            answer: format!("x = {answer}"),
            explanation: Some(format!(
                "To get only x on the left side, we can subtract {a} from both sides. \
                 This gives us {b} - {a} on the right-hand-side: {answer}."
            )),
        }
    }
}

/// Solve for x: a·x = b with nonzero a and an integer solution.
pub struct LinearEq2;

impl ProblemDefinition for LinearEq2 {
    fn id(&self) -> &str {
        "lineareq2"
    }

    fn name(&self) -> &str {
        "solving one-step multiplication equations"
    }

    fn turnover_limit(&self) -> usize {
        150
    }

    fn generate(&self, rng: &mut dyn RngCore) -> GeneratedProblem {
        let mut a = 0;
        while a == 0 {
            a = rng.random_range(-10..=10);
        }
        let x = rng.random_range(-10..=10);
        GeneratedProblem {
            key: json!([a, a * x]),
            aux: json!(x),
        }
    }

    fn format(&self, problem: &GeneratedProblem) -> FormattedProblem {
        let a = problem.key[0].as_i64().unwrap_or(1);
        let b = problem.key[1].as_i64().unwrap_or(0);
        let answer = problem.aux.as_i64().unwrap_or(0);

        FormattedProblem {
            question: format!("Solve for x: {a}x = {b}"),
            answer: format!("x = {answer}"),
            explanation: Some(format!(
                "x is multiplied by {a}, so we divide both sides by {a}. \
                 This leaves {b} / {a} on the right-hand-side: {answer}."
            )),
        }
    }
}

/// Exponential-growth word problem: P·(1 + r/100)^t.
pub struct ExpGrowth1;

impl ProblemDefinition for ExpGrowth1 {
    fn id(&self) -> &str {
        "expgrowth1"
    }

    fn name(&self) -> &str {
        "exponential growth word problems"
    }

    fn turnover_limit(&self) -> usize {
        150
    }

    fn calculator(&self) -> bool {
        true
    }

    fn generate(&self, rng: &mut dyn RngCore) -> GeneratedProblem {
        let p = rng.random_range(1..=9) * 100;
        let r = rng.random_range(1..=12);
        let t = rng.random_range(2..=6);
        let answer = f64::from(p) * (1.0 + f64::from(r) / 100.0).powi(t);
        GeneratedProblem {
            key: json!([p, r, t]),
            aux: json!(answer),
        }
    }

    fn format(&self, problem: &GeneratedProblem) -> FormattedProblem {
        let p = problem.key[0].as_i64().unwrap_or(0);
        let r = problem.key[1].as_i64().unwrap_or(0);
        let t = problem.key[2].as_i64().unwrap_or(0);
        let answer = problem.aux.as_f64().unwrap_or(0.0);

        FormattedProblem {
            question: format!(
                "A population starts at {p} and grows by {r}% each year. \
                 What is the population after {t} years? Round to two decimal places."
            ),
            answer: format!("{answer:.2}"),
            explanation: Some(format!(
                "Each year the population is multiplied by 1 + {r}/100. \
                 After {t} years that is {p} * (1 + {r}/100)^{t} = {answer:.2}."
            )),
        }
    }
}

/// Single-instance type; useful for exercising the exhaustion path since
/// only one candidate exists.
pub struct ConstantDummy;

impl ProblemDefinition for ConstantDummy {
    fn id(&self) -> &str {
        "dummy"
    }

    fn name(&self) -> &str {
        "dummy"
    }

    fn turnover_limit(&self) -> usize {
        10
    }

    fn generate(&self, _rng: &mut dyn RngCore) -> GeneratedProblem {
        GeneratedProblem {
            key: json!(1),
            aux: json!(1),
        }
    }

    fn format(&self, problem: &GeneratedProblem) -> FormattedProblem {
        let q = problem.key.as_i64().unwrap_or(0);
        FormattedProblem {
            question: format!("{q}"),
            answer: format!("{q}"),
            explanation: None,
        }
    }
}
