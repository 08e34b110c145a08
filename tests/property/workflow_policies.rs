//! Property tests for the workflow failure policies.

use bosun::backend::BackendRegistry;
use bosun::config::BosunConfig;
use bosun::context::ContextState;
use bosun::error::CommandError;
use bosun::workflow::{WorkflowDefinition, WorkflowEngine, WorkflowState, WorkflowStep};
use proptest::prelude::*;

fn test_ctx() -> ContextState {
    ContextState::new(BosunConfig::default(), "local", BackendRegistry::new()).unwrap()
}

/// Build a definition where step i succeeds iff outcomes[i] is true.
fn definition_from(outcomes: &[bool]) -> WorkflowDefinition {
    let steps = outcomes
        .iter()
        .map(|ok| {
            WorkflowStep::Raw(if *ok { "step-ok".to_string() } else { "step-fail".to_string() })
        })
        .collect();
    WorkflowDefinition {
        name: "generated".to_string(),
        steps,
    }
}

fn invoke(
    _ctx: &mut ContextState,
    tokens: &[String],
) -> Result<Option<String>, CommandError> {
    if tokens.iter().any(|t| t == "step-fail") {
        Err(CommandError::Backend("induced failure".to_string()))
    } else {
        Ok(None)
    }
}

proptest! {
    /// With continue-on-error, every step is attempted and the failure list
    /// holds exactly the failing indices, in order.
    #[test]
    fn continue_on_error_attempts_all_and_aggregates(outcomes in prop::collection::vec(any::<bool>(), 0..20)) {
        let mut ctx = test_ctx();
        let definition = definition_from(&outcomes);
        let report = WorkflowEngine::run(&mut ctx, &definition, true, invoke);

        prop_assert_eq!(report.attempted.len(), outcomes.len());

        let expected_failures: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i + 1)
            .collect();
        let actual_failures: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        prop_assert_eq!(actual_failures, expected_failures.clone());

        let expected_state = if expected_failures.is_empty() {
            WorkflowState::Completed
        } else {
            WorkflowState::CompletedWithFailures
        };
        prop_assert_eq!(report.state, expected_state);
    }

    /// Without continue-on-error, the run stops at the first failure with
    /// exactly one failure entry and no later attempts.
    #[test]
    fn stop_on_error_halts_at_first_failure(outcomes in prop::collection::vec(any::<bool>(), 0..20)) {
        let mut ctx = test_ctx();
        let definition = definition_from(&outcomes);
        let report = WorkflowEngine::run(&mut ctx, &definition, false, invoke);

        match outcomes.iter().position(|ok| !ok) {
            Some(first_failure) => {
                prop_assert_eq!(report.state, WorkflowState::Aborted);
                prop_assert_eq!(report.attempted.len(), first_failure + 1);
                prop_assert_eq!(report.failures.len(), 1);
                prop_assert_eq!(report.failures[0].index, first_failure + 1);
            }
            None => {
                prop_assert_eq!(report.state, WorkflowState::Completed);
                prop_assert_eq!(report.attempted.len(), outcomes.len());
                prop_assert!(report.failures.is_empty());
            }
        }
    }
}
