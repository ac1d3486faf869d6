//! Scripted conversation checks
//!
//! A scenario is a fixed sequence of user prompts with optional
//! expectations on the replies. Scenarios drive a [`ConversationRunner`]
//! turn by turn and report which expectations held, which is how the
//! harness proves that information stated early in a conversation is still
//! retrievable several turns later.

use crate::error::Result;
use crate::runner::ConversationRunner;

/// One step of a scenario: a prompt and an optional expectation
#[derive(Debug, Clone)]
pub struct ScenarioStep {
    /// The user prompt to submit
    pub prompt: String,
    /// Case-insensitive substring the reply must contain, if any
    pub expect_substring: Option<String>,
}

impl ScenarioStep {
    /// Creates a step with no expectation on the reply
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            expect_substring: None,
        }
    }

    /// Creates a step whose reply must contain `substring` (case-insensitive)
    pub fn expecting(prompt: impl Into<String>, substring: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            expect_substring: Some(substring.into()),
        }
    }
}

/// Outcome of one scenario step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// The prompt that was submitted
    pub prompt: String,
    /// The backend's reply
    pub reply: String,
    /// The expectation checked against the reply, if any
    pub expected: Option<String>,
    /// Whether the expectation held (true when there was none)
    pub passed: bool,
}

/// Report produced by running a scenario to completion
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    /// Name of the scenario that ran
    pub scenario: String,
    /// Per-step outcomes, in turn order
    pub outcomes: Vec<StepOutcome>,
}

impl ScenarioReport {
    /// True when every step's expectation held
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    /// Number of steps whose expectation failed
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed).count()
    }
}

/// A named sequence of scripted conversation steps
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Human-readable scenario name
    pub name: String,
    /// Steps, submitted in order
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Creates a scenario from a list of steps
    pub fn new(name: impl Into<String>, steps: Vec<ScenarioStep>) -> Self {
        Self {
            name: name.into(),
            steps,
        }
    }

    /// The built-in memory-retention check
    ///
    /// States a name and profession in the first turn, then asks for the
    /// profession and finally the name, asserting that the last reply still
    /// contains "helen". Passing requires the backend to have received the
    /// full prior history on every turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::scenario::Scenario;
    ///
    /// let scenario = Scenario::memory_retention();
    /// assert_eq!(scenario.steps.len(), 3);
    /// assert!(scenario.steps[2].expect_substring.is_some());
    /// ```
    pub fn memory_retention() -> Self {
        Self::new(
            "memory-retention",
            vec![
                ScenarioStep::prompt("My name is Helen and I'm a data scientist. Remember this."),
                ScenarioStep::prompt("What's my profession?"),
                ScenarioStep::expecting("And what was my name again?", "helen"),
            ],
        )
    }

    /// Runs every step against the runner and collects outcomes
    ///
    /// A failed expectation is recorded in the report, not treated as an
    /// error; a backend failure aborts the run and propagates, leaving the
    /// runner's history intact per its failure policy.
    ///
    /// # Errors
    ///
    /// Returns error if any submission fails.
    pub async fn run(&self, runner: &ConversationRunner) -> Result<ScenarioReport> {
        let mut outcomes = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            tracing::info!(
                scenario = %self.name,
                turn = index + 1,
                "Submitting: {}",
                step.prompt
            );

            let result = runner.submit_user_turn(step.prompt.clone()).await?;

            let passed = match &step.expect_substring {
                Some(expected) => result
                    .text
                    .to_lowercase()
                    .contains(&expected.to_lowercase()),
                None => true,
            };

            if !passed {
                tracing::warn!(
                    scenario = %self.name,
                    turn = index + 1,
                    "Reply did not contain expected substring {:?}",
                    step.expect_substring
                );
            }

            outcomes.push(StepOutcome {
                prompt: step.prompt.clone(),
                reply: result.text,
                expected: step.expect_substring.clone(),
                passed,
            });
        }

        Ok(ScenarioReport {
            scenario: self.name.clone(),
            outcomes,
        })
    }
}
