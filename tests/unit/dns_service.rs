//! Tests for the `verify_dns` application service.

#![allow(clippy::expect_used)]

use netverify_cli::application::services::dns::verify_dns;
use netverify_cli::domain::error::{Exception, VerifierError};
use netverify_cli::infra::gcp::GcpGateway;

use crate::helpers::{FixtureGateway, NoopReporter};

#[tokio::test]
async fn disabled_hostnames_record_exactly_one_exception() {
    let gateway = FixtureGateway::new().with_dns(Ok(true), Ok(false));

    let out = verify_dns(&gateway, &NoopReporter, "vpc-0123").await;

    let (failures, exceptions, errors) = out.parse();
    assert!(failures.is_empty());
    assert_eq!(
        exceptions,
        [Exception::DnsConfig {
            vpc_id: "vpc-0123".to_owned()
        }]
    );
    assert!(errors.is_empty());
    // The DNS path never provisions compute.
    assert_eq!(gateway.create_count(), 0);
}

#[tokio::test]
async fn fully_enabled_dns_passes() {
    let gateway = FixtureGateway::new().with_dns(Ok(true), Ok(true));

    let out = verify_dns(&gateway, &NoopReporter, "vpc-0123").await;

    assert!(out.is_successful());
}

#[tokio::test]
async fn attribute_fetch_fault_is_an_error_not_an_exception() {
    let gateway =
        FixtureGateway::new().with_dns(Err(VerifierError::Api(anyhow::anyhow!("throttled"))), Ok(true));

    let out = verify_dns(&gateway, &NoopReporter, "vpc-0123").await;

    let (_, exceptions, errors) = out.parse();
    assert!(exceptions.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], VerifierError::Api(_)));
}

#[tokio::test]
async fn each_attribute_fault_is_recorded_independently() {
    let gateway = FixtureGateway::new().with_dns(
        Err(VerifierError::Api(anyhow::anyhow!("throttled"))),
        Err(VerifierError::PermissionDenied("UnauthorizedOperation".to_owned())),
    );

    let out = verify_dns(&gateway, &NoopReporter, "vpc-0123").await;

    let (_, exceptions, errors) = out.parse();
    assert!(exceptions.is_empty());
    assert_eq!(errors.len(), 2);
}

#[tokio::test]
async fn unfinished_backend_refuses_explicitly() {
    let out = verify_dns(&GcpGateway, &NoopReporter, "vpc-0123").await;

    let (_, _, errors) = out.parse();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, VerifierError::NotImplemented { backend: "GCP", .. }))
    );
}
