//! Scenario replay: a JSON script of instructions applied tick by tick
//!
//! Tokens created by the scenario can be referenced before their address is
//! known: any string `"@tokenN"` inside an instruction resolves to the N-th
//! token the scenario created.

use launchpad_common::units::serde_units;
use launchpad_common::Address;
use launchpad_core::{
    process_instruction, EventSink, InstructionOutput, Launchpad, LaunchpadInstruction, NativeBank,
    PoolFactory, TokenLedger, TxContext,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use thiserror::Error;

/// First timestamp handed to steps that carry none
pub const SCENARIO_EPOCH: u64 = 1_700_000_000;

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("step {index}: unknown token reference {reference}")]
    UnknownTokenRef { index: usize, reference: String },

    #[error("step {index}: malformed instruction: {source}")]
    BadInstruction {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub sender: Address,
    /// Native value attached to the call
    #[serde(default, with = "serde_units")]
    pub value: u128,
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// `LaunchpadInstruction` JSON, `@tokenN` references unresolved
    pub instruction: Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Counters over a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub rejected: usize,
    pub tokens_created: usize,
}

pub struct Replayer {
    steps: VecDeque<(usize, ScenarioStep)>,
    created: Vec<Address>,
    clock: u64,
    report: ReplayReport,
}

impl Replayer {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            steps: scenario.steps.into_iter().enumerate().collect(),
            created: Vec::new(),
            clock: SCENARIO_EPOCH,
            report: ReplayReport::default(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn is_done(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn report(&self) -> ReplayReport {
        self.report
    }

    /// Tokens created so far, in order
    pub fn created_tokens(&self) -> &[Address] {
        &self.created
    }

    /// Current scenario time
    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Apply up to `max_steps` steps
    ///
    /// Rejected instructions are logged and counted; only a malformed script
    /// stops the replay.
    pub fn run_tick<L, P, B, E>(
        &mut self,
        launchpad: &mut Launchpad<L, P, B, E>,
        max_steps: usize,
    ) -> Result<usize, ScenarioError>
    where
        L: TokenLedger,
        P: PoolFactory,
        B: NativeBank,
        E: EventSink,
    {
        let mut applied = 0;
        while applied < max_steps {
            let Some((index, step)) = self.steps.pop_front() else {
                break;
            };
            let instruction = self.resolve(index, step.instruction)?;

            self.clock = step.timestamp.unwrap_or(self.clock + 1).max(self.clock);
            let ctx = TxContext::new(step.sender, step.value, self.clock);
            let name = instruction.name();

            match process_instruction(launchpad, &ctx, instruction) {
                Ok(output) => {
                    if let InstructionOutput::TokenCreated { token } = output {
                        log::info!("step {}: created token @token{} = {}", index, self.created.len(), token);
                        self.created.push(token);
                        self.report.tokens_created += 1;
                    } else {
                        log::debug!("step {}: {} ok", index, name);
                    }
                    self.report.applied += 1;
                }
                Err(e) => {
                    log::warn!("step {}: {} from {} rejected: {}", index, name, ctx.sender, e);
                    self.report.rejected += 1;
                }
            }
            applied += 1;
        }
        Ok(applied)
    }

    fn resolve(&self, index: usize, mut raw: Value) -> Result<LaunchpadInstruction, ScenarioError> {
        self.substitute(index, &mut raw)?;
        serde_json::from_value(raw).map_err(|source| ScenarioError::BadInstruction { index, source })
    }

    fn substitute(&self, index: usize, value: &mut Value) -> Result<(), ScenarioError> {
        match value {
            Value::String(s) => {
                if let Some(n) = s.strip_prefix("@token") {
                    let token = n
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| self.created.get(n))
                        .ok_or_else(|| ScenarioError::UnknownTokenRef {
                            index,
                            reference: s.clone(),
                        })?;
                    *s = token.to_string();
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.substitute(index, item)?;
                }
            }
            Value::Object(map) => {
                for item in map.values_mut() {
                    self.substitute(index, item)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}
