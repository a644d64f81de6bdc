//! Concurrent execution of a labeled set of processes.
//!
//! All children run at the same time under the OS; their supervision futures
//! are joined on the calling task. Every process runs to completion even when
//! a sibling fails, and the first failure by input order is reported.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use futures::future::join_all;

use super::error::ProcessError;
use super::executor::ProcessExecutor;
use super::outcome::ProcessOutcome;
use super::spec::ProcessSpec;

/// Options for a whole parallel execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelOptions {
    /// Skip the "Beginning/Finished parallel execution" notices.
    pub suppress_notices: bool,
}

impl ProcessExecutor {
    /// Run every `(key, spec)` entry concurrently in piped mode.
    ///
    /// Output lines of each process are prefixed with `<key> `. Returns the
    /// outcomes in input order once all processes have exited. If any process
    /// failed (spawn failure, or a non-zero exit under
    /// [`ExitCodePolicy::ErrorOnNonZero`](super::spec::ExitCodePolicy::ErrorOnNonZero)),
    /// the error of the first failing entry in input order is returned instead.
    ///
    /// Keys must be unique; a duplicate is rejected before anything is spawned.
    pub async fn execute_parallel<K>(
        &self,
        entries: Vec<(K, ProcessSpec)>,
        options: ParallelOptions,
    ) -> Result<Vec<(K, ProcessOutcome)>, ProcessError>
    where
        K: Display + Eq + Hash,
    {
        {
            let mut seen = HashSet::with_capacity(entries.len());
            for (key, _) in &entries {
                if !seen.insert(key) {
                    return Err(ProcessError::DuplicateProcessId(key.to_string()));
                }
            }
        }

        if !options.suppress_notices {
            self.sink().error(&format!(
                "Beginning parallel execution of {} processes...",
                entries.len()
            ));
        }

        let prefixes: Vec<String> = entries.iter().map(|(key, _)| format!("<{key}> ")).collect();
        let results = join_all(
            entries
                .iter()
                .zip(&prefixes)
                .map(|((_, spec), prefix)| self.execute_piped_with_prefix(spec, prefix)),
        )
        .await;

        if !options.suppress_notices {
            self.sink().error("Finished parallel execution.");
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::debug!(count = entries.len(), failed, "Parallel execution finished");

        let mut outcomes = Vec::with_capacity(entries.len());
        for ((key, _), result) in entries.into_iter().zip(results) {
            outcomes.push((key, result?));
        }
        Ok(outcomes)
    }

    /// [`execute_parallel`](Self::execute_parallel) keyed by caller-chosen names.
    pub async fn execute_parallel_named(
        &self,
        entries: Vec<(String, ProcessSpec)>,
        options: ParallelOptions,
    ) -> Result<Vec<(String, ProcessOutcome)>, ProcessError> {
        self.execute_parallel(entries, options).await
    }

    /// [`execute_parallel`](Self::execute_parallel) keyed by list position;
    /// outcomes come back in the same order as `specs`.
    pub async fn execute_parallel_indexed(
        &self,
        specs: Vec<ProcessSpec>,
        options: ParallelOptions,
    ) -> Result<Vec<ProcessOutcome>, ProcessError> {
        let entries = specs.into_iter().enumerate().collect();
        let outcomes = self.execute_parallel(entries, options).await?;
        Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
    }
}
