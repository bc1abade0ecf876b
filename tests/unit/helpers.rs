//! Shared test helpers: a scriptable fixture gateway and a no-op reporter.

#![allow(dead_code)] // Not every test module uses every helper

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use netverify_cli::application::config;
use netverify_cli::application::ports::{
    ComputeInspection, ComputeProvisioning, ComputeTeardown, ConsoleLogRetrieval, DnsInspection,
    LaunchSpec, ProgressReporter,
};
use netverify_cli::domain::console::{SCRIPT_BEGIN_SENTINEL, SCRIPT_END_SENTINEL};
use netverify_cli::domain::error::VerifierError;
use netverify_cli::domain::probe::{
    InstanceId, InstancePhase, ProbeRequest, ProxyConfig, ShapeDescription, StatusObservation,
    VpcAttribute,
};

/// Console text of a clean, completed boot script run.
pub fn clean_console() -> String {
    format!("{SCRIPT_BEGIN_SENTINEL}\nall targets ok\n{SCRIPT_END_SENTINEL}\n")
}

/// A default probe request against the fixture's home region.
pub fn request() -> ProbeRequest {
    ProbeRequest {
        region: "us-east-1".to_owned(),
        subnet_id: "subnet-0123".to_owned(),
        instance_shape: "t3.micro".to_owned(),
        image_id: None,
        kms_key_id: None,
        tags: config::default_tags(),
        timeout: Duration::from_secs(2),
        proxy: ProxyConfig::default(),
    }
}

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Scriptable provider gateway.
///
/// Status and console observations are consumed front-to-back; once a
/// script runs dry the fixture serves its fallback, so tests only spell out
/// the prefix they care about. Call counters expose how often each
/// capability was exercised.
pub struct FixtureGateway {
    hypervisor: String,
    statuses: Mutex<VecDeque<Result<StatusObservation, VerifierError>>>,
    status_fallback: StatusObservation,
    consoles: Mutex<VecDeque<Result<Option<String>, VerifierError>>>,
    console_fallback: Option<String>,
    terminate_error: Mutex<Option<VerifierError>>,
    dns_support: Mutex<Option<Result<bool, VerifierError>>>,
    dns_hostnames: Mutex<Option<Result<bool, VerifierError>>>,
    create_calls: Mutex<u32>,
    terminate_calls: Mutex<u32>,
}

impl FixtureGateway {
    /// A well-behaved gateway: nitro shape, instance running immediately,
    /// clean completed console, teardown succeeds, DNS fully enabled.
    pub fn new() -> Self {
        Self {
            hypervisor: "nitro".to_owned(),
            statuses: Mutex::new(VecDeque::new()),
            status_fallback: StatusObservation::Observed(InstancePhase::Running),
            consoles: Mutex::new(VecDeque::new()),
            console_fallback: Some(clean_console()),
            terminate_error: Mutex::new(None),
            dns_support: Mutex::new(None),
            dns_hostnames: Mutex::new(None),
            create_calls: Mutex::new(0),
            terminate_calls: Mutex::new(0),
        }
    }

    pub fn with_hypervisor(mut self, hypervisor: &str) -> Self {
        self.hypervisor = hypervisor.to_owned();
        self
    }

    pub fn with_statuses(
        self,
        statuses: Vec<Result<StatusObservation, VerifierError>>,
    ) -> Self {
        *self.statuses.lock().expect("lock") = statuses.into();
        self
    }

    pub fn with_status_fallback(mut self, fallback: StatusObservation) -> Self {
        self.status_fallback = fallback;
        self
    }

    pub fn with_consoles(
        self,
        consoles: Vec<Result<Option<String>, VerifierError>>,
    ) -> Self {
        *self.consoles.lock().expect("lock") = consoles.into();
        self
    }

    pub fn with_console_fallback(mut self, fallback: Option<String>) -> Self {
        self.console_fallback = fallback;
        self
    }

    pub fn with_terminate_error(self, error: VerifierError) -> Self {
        *self.terminate_error.lock().expect("lock") = Some(error);
        self
    }

    pub fn with_dns(
        self,
        support: Result<bool, VerifierError>,
        hostnames: Result<bool, VerifierError>,
    ) -> Self {
        *self.dns_support.lock().expect("lock") = Some(support);
        *self.dns_hostnames.lock().expect("lock") = Some(hostnames);
        self
    }

    pub fn create_count(&self) -> u32 {
        *self.create_calls.lock().expect("lock")
    }

    pub fn terminate_count(&self) -> u32 {
        *self.terminate_calls.lock().expect("lock")
    }
}

impl ComputeProvisioning for FixtureGateway {
    async fn create_instance(&self, _spec: &LaunchSpec<'_>) -> Result<InstanceId, VerifierError> {
        *self.create_calls.lock().expect("lock") += 1;
        Ok(InstanceId::from("i-0fixture"))
    }
}

impl ComputeInspection for FixtureGateway {
    async fn instance_status(
        &self,
        _id: &InstanceId,
    ) -> Result<StatusObservation, VerifierError> {
        match self.statuses.lock().expect("lock").pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.status_fallback),
        }
    }

    async fn describe_instance_shape(
        &self,
        shape: &str,
    ) -> Result<ShapeDescription, VerifierError> {
        Ok(ShapeDescription {
            shape: shape.to_owned(),
            hypervisor: self.hypervisor.clone(),
        })
    }
}

impl ConsoleLogRetrieval for FixtureGateway {
    async fn fetch_console_log(&self, _id: &InstanceId) -> Result<Option<String>, VerifierError> {
        match self.consoles.lock().expect("lock").pop_front() {
            Some(scripted) => scripted,
            None => Ok(self.console_fallback.clone()),
        }
    }
}

impl ComputeTeardown for FixtureGateway {
    async fn terminate_instance(&self, _id: &InstanceId) -> Result<(), VerifierError> {
        *self.terminate_calls.lock().expect("lock") += 1;
        match self.terminate_error.lock().expect("lock").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl DnsInspection for FixtureGateway {
    async fn vpc_attribute_enabled(
        &self,
        _vpc_id: &str,
        attribute: VpcAttribute,
    ) -> Result<bool, VerifierError> {
        let scripted = match attribute {
            VpcAttribute::DnsSupport => self.dns_support.lock().expect("lock").take(),
            VpcAttribute::DnsHostnames => self.dns_hostnames.lock().expect("lock").take(),
        };
        scripted.unwrap_or(Ok(true))
    }
}
