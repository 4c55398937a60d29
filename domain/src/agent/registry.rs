//! Built-in agent definitions

use super::role::AgentRole;
use serde::Serialize;

/// An immutable panel agent: display name, role tag and system instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentDefinition {
    pub name: &'static str,
    pub role: AgentRole,
    pub instruction: &'static str,
}

static AGENTS: [AgentDefinition; 8] = [
    AgentDefinition {
        name: "Dr. Hypothesis",
        role: AgentRole::DifferentialDiagnostician,
        instruction: r#"You are Dr. Hypothesis, a master diagnostician.
Maintain a ranked list of the top 3 differential diagnoses with probabilities.
Update probabilities with Bayesian reasoning after each new finding.
Format: 1. [Disease] (X%) 2. [Disease] (Y%) 3. [Disease] (Z%)"#,
    },
    AgentDefinition {
        name: "Dr. Test-Chooser",
        role: AgentRole::TestStrategist,
        instruction: r#"You are Dr. Test-Chooser, optimizing the diagnostic workup.
Select up to 3 tests that maximize information gain and discriminate between hypotheses.
Weigh sensitivity, specificity, cost, invasiveness and local availability.
Format: Test1 (cost) - rationale | Test2 (cost) - rationale"#,
    },
    AgentDefinition {
        name: "Dr. Challenger",
        role: AgentRole::DevilsAdvocate,
        instruction: r#"You are Dr. Challenger, preventing diagnostic errors.
Challenge the current hypotheses, point out contradictory evidence and suggest alternatives.
Look for cognitive biases, rare diseases and atypical presentations.
Be constructive but critical."#,
    },
    AgentDefinition {
        name: "Dr. Stewardship",
        role: AgentRole::CostSteward,
        instruction: r#"You are Dr. Stewardship, ensuring cost-effective care.
Advocate cheaper alternatives when they are equivalent and respect the patient's budget.
Suggest generic drugs, public schemes and free screenings where they apply.
Balance accuracy with affordability."#,
    },
    AgentDefinition {
        name: "Dr. Checklist",
        role: AgentRole::QualityChecker,
        instruction: r#"You are Dr. Checklist, ensuring diagnostic quality.
Verify test names are correct, the logic is sound and no steps are missed.
Flag errors or inconsistencies in the panel's reasoning."#,
    },
    AgentDefinition {
        name: "Consensus Coordinator",
        role: AgentRole::Coordinator,
        instruction: r#"You are the Consensus Coordinator, synthesizing the panel's input.
Decide the next action and start your reply with exactly one line:
DECISION: ASK, DECISION: TESTS or DECISION: DIAGNOSE.
When ordering tests, name them explicitly. Aim for 80% confidence before diagnosing."#,
    },
    AgentDefinition {
        name: "Gatekeeper",
        role: AgentRole::InformationProvider,
        instruction: r#"You are the clinical information Gatekeeper.
Provide realistic test results and patient answers consistent with the case.
Never reveal the diagnosis directly."#,
    },
    AgentDefinition {
        name: "Judge",
        role: AgentRole::Evaluator,
        instruction: r#"You are the diagnostic Judge.
Score the diagnosis from 1 to 5: 1=wrong, 2=partially correct, 3=correct but incomplete,
4=correct with good reasoning, 5=excellent with a comprehensive plan.
Reply with a line "Score: N" followed by your justification."#,
    },
];

/// Read-only catalog of the panel's agents
///
/// # Example
///
/// ```
/// use dxo_domain::agent::{AgentRegistry, AgentRole};
///
/// let judge = AgentRegistry::get(AgentRole::Evaluator);
/// assert_eq!(judge.name, "Judge");
/// ```
pub struct AgentRegistry;

impl AgentRegistry {
    /// Look up the definition for a role
    pub fn get(role: AgentRole) -> &'static AgentDefinition {
        // AGENTS is laid out in AgentRole::ALL order
        let index = AgentRole::ALL
            .iter()
            .position(|r| *r == role)
            .unwrap_or_default();
        &AGENTS[index]
    }

    pub fn all() -> &'static [AgentDefinition] {
        &AGENTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_role_resolves_to_itself() {
        for role in AgentRole::ALL {
            assert_eq!(AgentRegistry::get(role).role, role);
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = AgentRegistry::all().iter().map(|a| a.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), AgentRegistry::all().len());
    }

    #[test]
    fn test_coordinator_is_told_to_emit_decision_tags() {
        let coordinator = AgentRegistry::get(AgentRole::Coordinator);
        assert!(coordinator.instruction.contains("DECISION: DIAGNOSE"));
    }
}
