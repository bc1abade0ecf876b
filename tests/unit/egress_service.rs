//! Lifecycle tests for the `validate_egress` application service.
//!
//! All I/O goes through the fixture gateway; the runtime clock is paused so
//! multi-minute poll budgets elapse instantly.

#![allow(clippy::expect_used)]

use std::time::Duration;

use netverify_cli::application::config::{PollSettings, VerifierConfig};
use netverify_cli::application::services::egress::validate_egress;
use netverify_cli::domain::console::SCRIPT_END_SENTINEL;
use netverify_cli::domain::error::{Exception, VerifierError};
use netverify_cli::domain::probe::{InstanceId, InstancePhase, StatusObservation};

use crate::helpers::{FixtureGateway, NoopReporter, request};

fn observed(phase: InstancePhase) -> Result<StatusObservation, VerifierError> {
    Ok(StatusObservation::Observed(phase))
}

fn not_visible() -> Result<StatusObservation, VerifierError> {
    Ok(StatusObservation::NotVisible)
}

#[tokio::test(start_paused = true)]
async fn clean_run_passes_and_tears_down_exactly_once() {
    let gateway = FixtureGateway::new()
        .with_statuses(vec![observed(InstancePhase::Pending), observed(InstancePhase::Running)])
        .with_consoles(vec![Ok(None)]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    assert!(out.is_successful(), "unexpected findings: {}", out.summary());
    let (failures, exceptions, errors) = out.parse();
    assert!(failures.is_empty());
    assert!(exceptions.is_empty());
    assert!(errors.is_empty());
    assert_eq!(gateway.create_count(), 1);
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn flaky_instance_visibility_is_tolerated() {
    let gateway = FixtureGateway::new().with_statuses(vec![
        not_visible(),
        not_visible(),
        not_visible(),
        observed(InstancePhase::Running),
    ]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    assert!(out.is_successful(), "unexpected findings: {}", out.summary());
}

#[tokio::test(start_paused = true)]
async fn unauthorized_status_is_a_fatal_permission_error_with_teardown() {
    let gateway = FixtureGateway::new().with_statuses(vec![Err(VerifierError::PermissionDenied(
        "UnauthorizedOperation".to_owned(),
    ))]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (failures, exceptions, errors) = out.parse();
    assert!(failures.is_empty());
    assert!(exceptions.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::PermissionDenied(_)));
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn unreachable_endpoints_become_failures_verbatim() {
    let console = format!(
        "Unable to reach registry.example.com\n{SCRIPT_END_SENTINEL}\n"
    );
    let gateway = FixtureGateway::new().with_console_fallback(Some(console));

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (failures, exceptions, errors) = out.parse();
    assert_eq!(failures, ["Unable to reach registry.example.com"]);
    assert!(exceptions.is_empty());
    assert!(errors.is_empty());
    assert!(!out.is_successful());
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn fault_lines_yield_a_single_connectivity_exception() {
    let console = format!(
        "Cannot connect to the Docker daemon\n\
         Could not resolve host: quay.io\n\
         docker: command not found\n\
         {SCRIPT_END_SENTINEL}\n"
    );
    let gateway = FixtureGateway::new().with_console_fallback(Some(console));

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (_, exceptions, errors) = out.parse();
    assert_eq!(exceptions, [Exception::ConnectivityProblem]);
    assert!(errors.is_empty());
}

#[tokio::test(start_paused = true)]
async fn non_nitro_shape_is_rejected_before_any_instance_exists() {
    let gateway = FixtureGateway::new().with_hypervisor("xen");

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::UnsupportedShape { .. }));
    assert_eq!(gateway.create_count(), 0);
    assert_eq!(gateway.terminate_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_region_without_image_override_is_fatal() {
    let gateway = FixtureGateway::new();
    let mut req = request();
    req.region = "mars-north-1".to_owned();

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &req).await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::NoDefaultImage { .. }));
    assert_eq!(gateway.create_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn running_wait_deadline_routes_into_teardown() {
    let gateway = FixtureGateway::new().with_status_fallback(StatusObservation::NotVisible);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        VerifierError::DeadlineExceeded {
            waiting_for: "instance to reach running",
            ..
        }
    ));
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn script_wait_deadline_routes_into_teardown() {
    let gateway = FixtureGateway::new().with_console_fallback(None);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (failures, exceptions, errors) = out.parse();
    assert!(failures.is_empty());
    assert!(exceptions.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(matches!(
        errors[0],
        VerifierError::DeadlineExceeded {
            waiting_for: "boot script completion",
            ..
        }
    ));
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn undecodable_console_payload_is_retried_not_fatal() {
    let gateway = FixtureGateway::new().with_consoles(vec![Err(VerifierError::ConsoleDecode(
        "invalid padding".to_owned(),
    ))]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    assert!(out.is_successful(), "unexpected findings: {}", out.summary());
}

#[tokio::test(start_paused = true)]
async fn console_api_fault_aborts_the_script_wait() {
    let gateway = FixtureGateway::new()
        .with_consoles(vec![Err(VerifierError::Api(anyhow::anyhow!("throttled")))]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::Api(_)));
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn ambiguous_instance_count_is_fatal() {
    let gateway = FixtureGateway::new().with_statuses(vec![Err(VerifierError::AmbiguousInstance {
        instance_id: InstanceId::from("i-0fixture"),
        count: 2,
    })]);

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::AmbiguousInstance { count: 2, .. }));
    assert_eq!(gateway.terminate_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn teardown_fault_is_recorded_without_masking_findings() {
    let console = format!(
        "Unable to reach registry.example.com\n{SCRIPT_END_SENTINEL}\n"
    );
    let gateway = FixtureGateway::new()
        .with_console_fallback(Some(console))
        .with_terminate_error(VerifierError::Api(anyhow::anyhow!("terminate refused")));

    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &request()).await;

    let (failures, _, errors) = out.parse();
    assert_eq!(failures, ["Unable to reach registry.example.com"]);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::Api(_)));
}

#[tokio::test(start_paused = true)]
async fn image_override_skips_the_region_table() {
    let gateway = FixtureGateway::new();
    let mut req = request();
    req.region = "mars-north-1".to_owned();
    req.image_id = Some("ami-override".to_owned());
    // Override must let the run proceed even though the region has no
    // default image.
    let out = validate_egress(&gateway, &NoopReporter, &VerifierConfig::default(), &req).await;

    assert!(out.is_successful(), "unexpected findings: {}", out.summary());
    assert_eq!(gateway.create_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn shrunk_poll_budget_still_checks_at_least_once() {
    let gateway = FixtureGateway::new();
    let config = VerifierConfig {
        running_poll: PollSettings {
            interval: Duration::from_secs(15),
            deadline: Duration::from_millis(1),
        },
        ..VerifierConfig::default()
    };
    // Deadline shorter than the interval: the immediate check still runs
    // and observes the running phase.
    let out = validate_egress(&gateway, &NoopReporter, &config, &request()).await;

    assert!(out.is_successful(), "unexpected findings: {}", out.summary());
}
