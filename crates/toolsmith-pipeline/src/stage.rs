//! Pipeline stage state machine
//!
//! Stages run in a fixed order, each mapped to a progress value; `Error` is
//! terminal and reachable from every non-terminal stage. The transition
//! table is the single source of truth for legality.

use serde::{Deserialize, Serialize};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Analyzing,
    Planning,
    Validating,
    Generating,
    Testing,
    Deploying,
    Completed,
    Error,
}

impl Stage {
    /// Progress value reported on entering this stage
    ///
    /// `Error` carries no value of its own; a failed request keeps the last
    /// progress it reached.
    #[must_use]
    pub fn progress(self) -> Option<u8> {
        match self {
            Stage::Analyzing => Some(20),
            Stage::Planning => Some(40),
            Stage::Validating => Some(50),
            Stage::Generating => Some(70),
            Stage::Testing => Some(85),
            Stage::Deploying => Some(95),
            Stage::Completed => Some(100),
            Stage::Error => None,
        }
    }

    /// Default user-facing message for this stage
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Stage::Analyzing => "Understanding requirements...",
            Stage::Planning => "Planning the tool architecture...",
            Stage::Validating => "Checking compliance policy...",
            Stage::Generating => "Building the tool with provider integrations...",
            Stage::Testing => "Testing integrations and optimizing...",
            Stage::Deploying => "Finalizing deployment...",
            Stage::Completed => "Tool generated successfully!",
            Stage::Error => "Generation failed",
        }
    }

    /// Whether no further transition may leave this stage
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Error)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Analyzing => "analyzing",
            Stage::Planning => "planning",
            Stage::Validating => "validating",
            Stage::Generating => "generating",
            Stage::Testing => "testing",
            Stage::Deploying => "deploying",
            Stage::Completed => "completed",
            Stage::Error => "error",
        };
        f.write_str(s)
    }
}

/// Illegal transition error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal stage transition: {from} -> {to}")]
pub struct IllegalTransition {
    pub from: Stage,
    pub to: Stage,
}

/// Successors of a stage
///
/// `Testing -> Completed` is the dedup short-circuit: when the draft resolves
/// to an existing artifact, deployment is skipped entirely.
#[must_use]
pub fn allowed_transitions(from: Stage) -> Vec<Stage> {
    use Stage::*;
    match from {
        Analyzing => vec![Planning, Error],
        Planning => vec![Validating, Error],
        Validating => vec![Generating, Error],
        Generating => vec![Testing, Error],
        Testing => vec![Deploying, Completed, Error],
        Deploying => vec![Completed, Error],
        Completed => vec![],
        Error => vec![],
    }
}

/// Validate a stage transition
pub fn validate_transition(from: Stage, to: Stage) -> Result<(), IllegalTransition> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(IllegalTransition { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_legal() {
        use Stage::*;
        let path = [Analyzing, Planning, Validating, Generating, Testing, Deploying, Completed];
        for pair in path.windows(2) {
            validate_transition(pair[0], pair[1]).unwrap();
        }
    }

    #[test]
    fn dedup_short_circuit_is_legal() {
        validate_transition(Stage::Testing, Stage::Completed).unwrap();
    }

    #[test]
    fn error_reachable_from_every_non_terminal_stage() {
        use Stage::*;
        for stage in [Analyzing, Planning, Validating, Generating, Testing, Deploying] {
            validate_transition(stage, Error).unwrap();
        }
    }

    #[test]
    fn terminal_stages_have_no_successors() {
        assert!(allowed_transitions(Stage::Completed).is_empty());
        assert!(allowed_transitions(Stage::Error).is_empty());
    }

    #[test]
    fn skipping_stages_is_illegal() {
        let err = validate_transition(Stage::Analyzing, Stage::Generating).unwrap_err();
        assert_eq!(err.from, Stage::Analyzing);
        assert_eq!(err.to, Stage::Generating);
    }

    #[test]
    fn progress_is_monotone_along_the_happy_path() {
        use Stage::*;
        let path = [Analyzing, Planning, Validating, Generating, Testing, Deploying, Completed];
        let values: Vec<u8> = path.iter().map(|s| s.progress().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 100);
    }
}
