//! Address-tagged fan-out of structured LLM requests.
//!
//! Every unit carries its address from the moment it is built; results are
//! routed by that address, never by completion order or list position.

use std::{collections::HashSet, fmt::Display, hash::Hash, sync::Arc};

use futures::future::join_all;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::{
    error::{LlmError, PipelineError},
    llm::{ResponseSchema, StructuredRequester},
    translate::Stage,
};

/// One outbound request and the address its result belongs to.
#[derive(Debug, Clone)]
pub struct TaskUnit<A> {
    pub address: A,
    pub system_prompt: String,
    pub schema: Arc<ResponseSchema>,
}

/// The settled result of one [`TaskUnit`].
#[derive(Debug)]
pub struct TaskOutcome<A, T> {
    pub address: A,
    pub result: Result<T, LlmError>,
}

#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn StructuredRequester>,
}

impl Dispatcher {
    pub fn new(client: Arc<dyn StructuredRequester>) -> Self {
        Self { client }
    }

    /// Runs every unit concurrently and waits for all of them.
    ///
    /// Returns exactly one outcome per unit, in submission order. A
    /// response that does not decode into `T` is a failed outcome.
    pub async fn dispatch<A, T>(&self, units: Vec<TaskUnit<A>>) -> Vec<TaskOutcome<A, T>>
    where
        A: Display + Send,
        T: DeserializeOwned,
    {
        let pending = units.into_iter().map(|unit| {
            let client = Arc::clone(&self.client);
            async move {
                let result = match client.request(&unit.system_prompt, &unit.schema).await {
                    Ok(value) => unit.schema.decode::<T>(value),
                    Err(e) => Err(e),
                };
                debug!(address = %unit.address, ok = result.is_ok(), "unit settled");
                TaskOutcome {
                    address: unit.address,
                    result,
                }
            }
        });
        join_all(pending).await
    }
}

/// Checks a fully settled stage and unwraps its values.
///
/// Every failure is logged; the first one in submission order becomes the
/// stage error. A missing or repeated address is also fatal.
pub fn settle<A, T>(
    stage: Stage,
    outcomes: Vec<TaskOutcome<A, T>>,
    expected: usize,
) -> Result<Vec<(A, T)>, PipelineError>
where
    A: Display + Eq + Hash + Clone,
{
    if outcomes.len() != expected {
        return Err(PipelineError::Incomplete {
            stage,
            expected,
            actual: outcomes.len(),
        });
    }

    let mut seen = HashSet::with_capacity(outcomes.len());
    for outcome in &outcomes {
        if !seen.insert(outcome.address.clone()) {
            return Err(PipelineError::DuplicateAddress {
                stage,
                address: outcome.address.to_string(),
            });
        }
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let mut values = Vec::with_capacity(outcomes.len());
    let mut first_failure = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(value) => values.push((outcome.address, value)),
            Err(e) => {
                error!(%stage, address = %outcome.address, error = %e, "unit failed");
                if first_failure.is_none() {
                    first_failure = Some((outcome.address.to_string(), e));
                }
            }
        }
    }

    match first_failure {
        Some((address, source)) => {
            error!(%stage, failed, total = expected, "aborting pipeline");
            Err(PipelineError::Dispatch {
                stage,
                address,
                source,
            })
        }
        None => Ok(values),
    }
}
