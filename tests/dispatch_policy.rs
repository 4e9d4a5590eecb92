// tests/dispatch_policy.rs

use std::error::Error;

use monorun::dispatch::{
    cancel_pair, DispatchMode, DispatchNotice, DispatchRequest, DispatchSettings, Dispatcher,
};
use monorun::errors::{ExitClass, MonorunError};
use monorun::registry::Registry;
use monorun::types::TargetType;
use monorun_test_utils::builders::{ConfigFileBuilder, TargetConfigBuilder};
use monorun_test_utils::fake_executor::RecordingExecutor;
use monorun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// a, b, c with no dependencies, all defining `build`.
fn abc() -> Registry {
    ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("a", &["build"]).build())
        .with_target(TargetConfigBuilder::language("b", &["build"]).build())
        .with_target(TargetConfigBuilder::language("c", &["build"]).build())
        .registry()
}

fn settings(continue_on_error: bool) -> DispatchSettings {
    DispatchSettings {
        continue_on_error,
        ..DispatchSettings::default()
    }
}

#[tokio::test]
async fn fail_fast_never_attempts_targets_after_the_failure() -> TestResult {
    init_tracing();

    let registry = abc();
    let exec = RecordingExecutor::new().failing("b");
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("build")).await?;

    assert_eq!(exec.executed_targets(), vec!["a", "b"]);
    assert!(!outcome.success());
    assert_eq!(outcome.exit_class(), ExitClass::Runtime);
    assert!(outcome.result_for("a").unwrap().success);
    assert!(!outcome.result_for("b").unwrap().success);
    assert!(outcome.result_for("b").unwrap().error.is_some());
    assert!(outcome.result_for("c").is_none());
    assert_eq!(outcome.not_attempted, vec!["c"]);

    // Two targets were attempted, so a summary exists even though we stopped early.
    let summary = outcome.summary().expect("summary for multi-target run");
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.not_attempted, 1);
    assert_eq!(summary.failed_targets, vec!["b"]);
    Ok(())
}

#[tokio::test]
async fn continue_on_error_attempts_every_target() -> TestResult {
    init_tracing();

    let registry = abc();
    let exec = RecordingExecutor::new().failing("b");
    let dispatcher = Dispatcher::new(&registry, &exec, settings(true));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("build")).await?;

    assert_eq!(exec.executed_targets(), vec!["a", "b", "c"]);
    assert!(!outcome.success());
    assert!(outcome.not_attempted.is_empty());

    let summary = outcome.summary().unwrap();
    assert_eq!(summary.passed, 2);
    assert_eq!(summary.failed_targets, vec!["b"]);
    Ok(())
}

#[tokio::test]
async fn empty_type_filter_is_a_successful_no_op() -> TestResult {
    init_tracing();

    let registry = abc();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let request = DispatchRequest::all("build").with_type(Some(TargetType::Auxiliary));
    let outcome = dispatcher.dispatch(&request).await?;

    assert!(outcome.success());
    assert_eq!(outcome.exit_class(), ExitClass::Success);
    assert_eq!(outcome.attempted(), 0);
    assert!(exec.executed().is_empty());
    assert_eq!(
        outcome.notice,
        Some(DispatchNotice::EmptyTypeFilter {
            target_type: TargetType::Auxiliary
        })
    );
    assert!(outcome.summary().is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_command_across_all_targets_is_an_error() -> TestResult {
    let registry = abc();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let err = dispatcher
        .dispatch(&DispatchRequest::all("deploy"))
        .await
        .unwrap_err();

    assert!(matches!(err, MonorunError::UnknownCommand { target: None, .. }));
    assert_eq!(err.exit_class(), ExitClass::Configuration);
    assert!(exec.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn right_type_but_no_definition_is_unknown_command_not_a_notice() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::auxiliary("img", &["build"]).build())
        .with_target(TargetConfigBuilder::language("cs", &["build"]).build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let request = DispatchRequest::all("publish").with_type(Some(TargetType::Auxiliary));
    let err = dispatcher.dispatch(&request).await.unwrap_err();

    assert!(matches!(err, MonorunError::UnknownCommand { .. }));
    Ok(())
}

#[tokio::test]
async fn test_command_only_considers_language_targets() -> TestResult {
    init_tracing();

    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::auxiliary("img", &["build"]).build())
        .with_target(TargetConfigBuilder::language("cs", &["build", "test"]).build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("test")).await?;

    assert!(outcome.success());
    assert_eq!(exec.executed_targets(), vec!["cs"]);

    let plan = dispatcher.plan(&DispatchRequest::all("test"))?;
    assert_eq!(plan.type_filter, Some(TargetType::Language));
    assert!(plan.disabled.is_empty());
    Ok(())
}

#[tokio::test]
async fn explicit_type_overrides_test_default() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::auxiliary("img", &["test"]).build())
        .with_target(TargetConfigBuilder::language("cs", &["test"]).build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let request = DispatchRequest::all("test").with_type(Some(TargetType::Auxiliary));
    dispatcher.dispatch(&request).await?;

    assert_eq!(exec.executed_targets(), vec!["img"]);
    Ok(())
}

#[tokio::test]
async fn failing_dependency_stops_dependent_under_fail_fast() -> TestResult {
    init_tracing();

    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("rs", &["build"]).depends_on("py").build())
        .with_target(TargetConfigBuilder::language("py", &["build"]).build())
        .registry();
    let exec = RecordingExecutor::new().failing("py");
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("build")).await?;

    assert_eq!(exec.executed_targets(), vec!["py"]);
    assert_eq!(outcome.not_attempted, vec!["rs"]);
    assert_eq!(outcome.exit_class(), ExitClass::Runtime);
    // Only one target was attempted.
    assert!(outcome.summary().is_none());
    Ok(())
}

#[tokio::test]
async fn targets_without_the_command_are_skipped_silently() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("a", &["build", "lint"]).build())
        .with_target(TargetConfigBuilder::language("b", &["build"]).build())
        .with_target(TargetConfigBuilder::language("c", &["lint"]).build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("lint")).await?;

    assert_eq!(exec.executed(), vec![
        ("a".to_string(), "lint".to_string()),
        ("c".to_string(), "lint".to_string()),
    ]);
    assert!(outcome.success());
    Ok(())
}

#[tokio::test]
async fn single_target_runs_exactly_once() -> TestResult {
    let registry = abc();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let plan = dispatcher.plan(&DispatchRequest::single("build", "b"))?;
    assert_eq!(plan.mode, DispatchMode::Single);

    let outcome = dispatcher.execute_plan(&plan).await;
    assert_eq!(exec.executed_targets(), vec!["b"]);
    assert!(outcome.success());
    assert!(outcome.summary().is_none());
    Ok(())
}

#[tokio::test]
async fn single_target_ignores_dependencies_and_type_filter() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("py", &["build"]).build())
        .with_target(TargetConfigBuilder::auxiliary("img", &["build"]).depends_on("py").build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let request = DispatchRequest::single("build", "img").with_type(Some(TargetType::Language));
    dispatcher.dispatch(&request).await?;

    assert_eq!(exec.executed_targets(), vec!["img"]);
    Ok(())
}

#[tokio::test]
async fn single_target_without_command_fails_before_running() -> TestResult {
    let registry = abc();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let err = dispatcher
        .dispatch(&DispatchRequest::single("test", "a"))
        .await
        .unwrap_err();

    match err {
        MonorunError::UnknownCommand { command, target } => {
            assert_eq!(command, "test");
            assert_eq!(target.as_deref(), Some("a"));
        }
        other => panic!("expected UnknownCommand, got {other:?}"),
    }
    assert!(exec.executed().is_empty());
    Ok(())
}

#[tokio::test]
async fn single_target_that_does_not_exist_is_structural() -> TestResult {
    let registry = abc();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let err = dispatcher
        .dispatch(&DispatchRequest::single("build", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(err, MonorunError::TargetNotFound(ref name) if name == "nope"));
    assert_eq!(err.exit_class(), ExitClass::Configuration);
    Ok(())
}

#[tokio::test]
async fn disabled_commands_are_skipped_in_all_targets_mode() -> TestResult {
    init_tracing();

    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("py", &["build"]).disabled("publish").build())
        .with_target(TargetConfigBuilder::language("rs", &["build", "publish"]).build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("publish")).await?;
    assert_eq!(exec.executed_targets(), vec!["rs"]);
    assert_eq!(outcome.disabled, vec!["py"]);
    assert!(outcome.success());
    Ok(())
}

#[tokio::test]
async fn single_target_disabled_command_reaches_executor_once() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("py", &["build"]).disabled("publish").build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let plan = dispatcher.plan(&DispatchRequest::single("publish", "py"))?;
    assert_eq!(plan.target_names(), vec!["py"]);
    assert!(plan.disabled.is_empty());
    assert!(plan.notice.is_none());

    let outcome = dispatcher.execute_plan(&plan).await;

    assert_eq!(exec.executed(), vec![("py".to_string(), "publish".to_string())]);
    assert_eq!(outcome.attempted(), 1);
    assert!(!outcome.success());
    assert_eq!(outcome.exit_class(), ExitClass::Runtime);
    let err = outcome.result_for("py").unwrap().error.as_deref().unwrap();
    assert!(err.contains("disabled"));
    Ok(())
}

#[tokio::test]
async fn command_disabled_everywhere_is_not_unknown() -> TestResult {
    let registry = ConfigFileBuilder::new()
        .with_target(TargetConfigBuilder::language("py", &["build"]).disabled("publish").build())
        .registry();
    let exec = RecordingExecutor::new();
    let dispatcher = Dispatcher::new(&registry, &exec, settings(false));

    let outcome = dispatcher.dispatch(&DispatchRequest::all("publish")).await?;

    assert!(outcome.success());
    assert!(matches!(outcome.notice, Some(DispatchNotice::AllDisabled { .. })));
    Ok(())
}

#[tokio::test]
async fn cancellation_lets_current_target_finish_and_starts_no_more() -> TestResult {
    init_tracing();

    let registry = abc();
    let (handle, signal) = cancel_pair();
    let exec = RecordingExecutor::new().cancel_after("a", handle);
    let dispatcher = Dispatcher::new(&registry, &exec, settings(true)).with_cancel(signal);

    let outcome = dispatcher.dispatch(&DispatchRequest::all("build")).await?;

    assert_eq!(exec.executed_targets(), vec!["a"]);
    assert!(outcome.result_for("a").unwrap().success);
    assert!(outcome.cancelled);
    assert!(!outcome.success());
    assert_eq!(outcome.not_attempted, vec!["b", "c"]);
    Ok(())
}
