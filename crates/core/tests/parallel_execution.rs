//! Integration tests for parallel process execution.
//!
//! Each child is a `sh` one-liner; marker files in a temp directory record
//! which children actually ran.

use std::path::Path;
use std::sync::Arc;

use assert_matches::assert_matches;
use taskrunner_core::process::{
    CaptureSink, ExitCodePolicy, ExitStatusInfo, ParallelOptions, ProcessError, ProcessExecutor,
    ProcessSpec,
};

fn executor() -> (ProcessExecutor, Arc<CaptureSink>) {
    let sink = Arc::new(CaptureSink::new());
    (ProcessExecutor::new(sink.clone()), sink)
}

/// A process that creates `marker`, then runs `tail`.
fn touching(marker: &Path, tail: &str) -> ProcessSpec {
    ProcessSpec::new("sh").args([
        "-c".to_string(),
        format!("touch \"$1\"; {tail}"),
        "sh".to_string(),
        marker.to_str().expect("utf-8 path").to_string(),
    ])
}

fn markers_present(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read marker dir").count()
}

#[tokio::test]
async fn named_results_keep_input_keys_and_order() {
    let (exec, _sink) = executor();
    let entries = vec![
        ("slow".to_string(), ProcessSpec::new("sh").args(["-c", "sleep 0.2"])),
        ("fast".to_string(), ProcessSpec::new("sh").args(["-c", "exit 0"])),
        ("mid".to_string(), ProcessSpec::new("sh").args(["-c", "sleep 0.1"])),
    ];

    let results = exec
        .execute_parallel_named(entries, ParallelOptions::default())
        .await
        .expect("all succeed");

    let keys: Vec<&str> = results.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["slow", "fast", "mid"]);
    assert!(results.iter().all(|(_, o)| o.success()));
}

#[tokio::test]
async fn indexed_results_follow_input_order() {
    let (exec, _sink) = executor();
    let specs = (0..4)
        .map(|i| {
            ProcessSpec::new("sh")
                .args(["-c", format!("exit {i}").as_str()])
                .exit_code_policy(ExitCodePolicy::ReportAndContinue)
        })
        .collect();

    let outcomes = exec
        .execute_parallel_indexed(specs, ParallelOptions::default())
        .await
        .expect("report-and-continue never fails");

    let codes: Vec<Option<i32>> = outcomes.iter().map(|o| o.exit_code()).collect();
    assert_eq!(codes, vec![Some(0), Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn output_lines_are_prefixed_with_key() {
    let (exec, sink) = executor();
    let entries = vec![
        ("a".to_string(), ProcessSpec::new("sh").args(["-c", "echo one"])),
        ("b".to_string(), ProcessSpec::new("sh").args(["-c", "echo two >&2"])),
    ];

    exec.execute_parallel_named(entries, ParallelOptions::default())
        .await
        .expect("all succeed");

    assert_eq!(sink.log_lines(), vec!["<a> one"]);
    let errors = sink.error_lines();
    assert!(errors.contains(&"<b> two".to_string()));
    assert!(errors.contains(&"<a> Process \"sh\" exited successfully.".to_string()));
}

#[tokio::test]
async fn notices_bracket_the_run() {
    let (exec, sink) = executor();
    let specs = vec![ProcessSpec::new("true"), ProcessSpec::new("true")];
    exec.execute_parallel_indexed(specs, ParallelOptions::default())
        .await
        .expect("all succeed");

    let errors = sink.error_lines();
    assert_eq!(errors.first().map(String::as_str), Some("Beginning parallel execution of 2 processes..."));
    assert_eq!(errors.last().map(String::as_str), Some("Finished parallel execution."));
}

#[tokio::test]
async fn suppressed_notices_leave_sink_empty() {
    let (exec, sink) = executor();
    let specs = vec![
        ProcessSpec::new("true").suppress_notices(true),
        ProcessSpec::new("true").suppress_notices(true),
    ];
    exec.execute_parallel_indexed(specs, ParallelOptions { suppress_notices: true })
        .await
        .expect("all succeed");
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn failure_waits_for_every_process_and_reports_first_by_input_order() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (exec, _sink) = executor();

    // Entry 1 fails late, entry 2 fails immediately: the reported error must
    // still be entry 1's.
    let specs = vec![
        touching(&dir.path().join("0"), "exit 0"),
        touching(&dir.path().join("1"), "sleep 0.3; exit 5"),
        touching(&dir.path().join("2"), "exit 6"),
        touching(&dir.path().join("3"), "sleep 0.2"),
    ];

    let err = exec
        .execute_parallel_indexed(specs, ParallelOptions::default())
        .await
        .expect_err("two processes fail");

    assert_matches!(
        &err,
        ProcessError::NonZeroExit { status: ExitStatusInfo::Code(5), .. }
    );
    assert!(err.to_string().contains('5'));
    assert_eq!(markers_present(dir.path()), 4, "all processes ran");
}

#[tokio::test]
async fn report_and_continue_failures_do_not_fail_the_batch() {
    let (exec, _sink) = executor();
    let entries = vec![
        (
            "lenient".to_string(),
            ProcessSpec::new("sh")
                .args(["-c", "exit 7"])
                .exit_code_policy(ExitCodePolicy::ReportAndContinue),
        ),
        ("ok".to_string(), ProcessSpec::new("true")),
    ];

    let results = exec
        .execute_parallel_named(entries, ParallelOptions::default())
        .await
        .expect("lenient failure is data");
    assert_eq!(results[0].1.exit_code(), Some(7));
    assert_eq!(results[1].1.exit_code(), Some(0));
}

#[tokio::test]
async fn spawn_failure_propagates_after_siblings_finish() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (exec, _sink) = executor();
    let specs = vec![
        ProcessSpec::new("taskrunner_unknown_executable")
            .exit_code_policy(ExitCodePolicy::ReportAndContinue),
        touching(&dir.path().join("sibling"), "sleep 0.1"),
    ];

    let err = exec
        .execute_parallel_indexed(specs, ParallelOptions::default())
        .await
        .expect_err("spawn failure");
    assert_matches!(err, ProcessError::Spawn { .. });
    assert_eq!(markers_present(dir.path()), 1);
}

#[tokio::test]
async fn duplicate_keys_are_rejected_before_spawning() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let (exec, sink) = executor();
    let entries = vec![
        ("dup".to_string(), touching(&dir.path().join("a"), "true")),
        ("dup".to_string(), touching(&dir.path().join("b"), "true")),
    ];

    let err = exec
        .execute_parallel_named(entries, ParallelOptions::default())
        .await
        .expect_err("duplicate key");
    assert_matches!(err, ProcessError::DuplicateProcessId(ref key) if key == "dup");
    assert_eq!(markers_present(dir.path()), 0);
    assert!(sink.lines().is_empty());
}

#[tokio::test]
async fn empty_input_returns_empty_result() {
    let (exec, _sink) = executor();
    let outcomes = exec
        .execute_parallel_indexed(Vec::new(), ParallelOptions { suppress_notices: true })
        .await
        .expect("nothing to run");
    assert!(outcomes.is_empty());
}
