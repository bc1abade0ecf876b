//! Application service — egress verification use-case.
//!
//! Drives the probe instance lifecycle: create, await running, await boot
//! script completion via console scraping, harvest and classify, terminate.
//! Imports only from `crate::domain` and `crate::application`; all I/O is
//! routed through injected port traits.

use std::cell::RefCell;

use tracing::{debug, error, info};

use crate::application::config::VerifierConfig;
use crate::application::poll::{PollError, poll_immediate};
use crate::application::ports::{LaunchSpec, ProgressReporter, ProviderGateway};
use crate::domain::bootscript::{self, BootScriptParams};
use crate::domain::console::{self, Classification};
use crate::domain::error::{Exception, VerifierError};
use crate::domain::probe::{InstanceId, InstancePhase, ProbeRequest, StatusObservation};
use crate::domain::report::RunOutput;

/// Run the full egress verification lifecycle against one subnet.
///
/// Always returns an inspectable [`RunOutput`], even on fatal early
/// failure. Once an instance exists, teardown is attempted exactly once on
/// every exit path; teardown faults are recorded but never mask findings
/// gathered earlier in the run.
pub async fn validate_egress(
    gateway: &impl ProviderGateway,
    reporter: &impl ProgressReporter,
    config: &VerifierConfig,
    request: &ProbeRequest,
) -> RunOutput {
    let mut out = RunOutput::new();
    debug!(timeout = ?request.timeout, "using configured timeout for each egress request");

    // Precondition: the shape must support reliable status/console
    // reporting. Checked before anything is created.
    match gateway.describe_instance_shape(&request.instance_shape).await {
        Ok(shape) if shape.supports_reliable_console() => {
            debug!(shape = %shape.shape, hypervisor = %shape.hypervisor, "instance shape accepted");
        }
        Ok(shape) => {
            out.record_error(VerifierError::UnsupportedShape {
                shape: shape.shape,
                hypervisor: shape.hypervisor,
            });
            return out;
        }
        Err(e) => {
            out.record_error(e);
            return out;
        }
    }

    let image_id = match resolve_image(config, request) {
        Ok(image_id) => image_id,
        Err(e) => {
            out.record_error(e);
            return out;
        }
    };

    let boot_script = bootscript::generate(&BootScriptParams {
        region: &request.region,
        validator_image: &config.validator_image,
        timeout: request.timeout,
        proxy: &request.proxy,
    });

    reporter.step("creating probe instance");
    let spec = LaunchSpec {
        image_id: &image_id,
        subnet_id: &request.subnet_id,
        shape: &request.instance_shape,
        boot_script: &boot_script,
        kms_key_id: request.kms_key_id.as_deref(),
        tags: &request.tags,
    };
    let instance_id = match gateway.create_instance(&spec).await {
        Ok(id) => id,
        // Fatal: nothing was created, so there is nothing to tear down.
        Err(e) => {
            out.record_error(e);
            return out;
        }
    };
    info!(instance = %instance_id, "created probe instance");

    reporter.step("waiting for probe instance to be running");
    if let Err(poll_err) = await_running(gateway, config, &instance_id).await {
        out.record_error(match poll_err {
            PollError::DeadlineExceeded(budget) => VerifierError::DeadlineExceeded {
                waiting_for: "instance to reach running",
                budget,
            },
            PollError::Check(e) => e,
        });
        teardown(gateway, reporter, &instance_id, &mut out).await;
        return out;
    }

    reporter.step("gathering and parsing console log output");
    match await_script_completion(gateway, config, &instance_id).await {
        Ok(classification) => {
            if classification.fault_detected {
                out.record_exception(Exception::ConnectivityProblem);
            }
            out.record_failures(classification.unreachable);
        }
        Err(PollError::DeadlineExceeded(budget)) => {
            out.record_error(VerifierError::DeadlineExceeded {
                waiting_for: "boot script completion",
                budget,
            });
        }
        Err(PollError::Check(e)) => out.record_error(e),
    }

    teardown(gateway, reporter, &instance_id, &mut out).await;
    if out.is_successful() {
        reporter.success("all egress targets reachable");
    }
    out
}

fn resolve_image(
    config: &VerifierConfig,
    request: &ProbeRequest,
) -> Result<String, VerifierError> {
    if let Some(image_id) = &request.image_id {
        return Ok(image_id.clone());
    }
    config
        .default_images
        .get(&request.region)
        .cloned()
        .ok_or_else(|| VerifierError::NoDefaultImage {
            region: request.region.clone(),
        })
}

/// Poll instance status until the running phase is observed.
///
/// "No matching instance" continues the poll — providers may lag instance
/// visibility shortly after creation. A permission-denied observation
/// aborts immediately; it will not resolve by waiting.
async fn await_running(
    gateway: &impl ProviderGateway,
    config: &VerifierConfig,
    instance_id: &InstanceId,
) -> Result<(), PollError<VerifierError>> {
    let check = move || async move {
        match gateway.instance_status(instance_id).await? {
            StatusObservation::NotVisible => {
                debug!(instance = %instance_id, "instance has no status yet");
                Ok(false)
            }
            StatusObservation::Observed(InstancePhase::Running) => {
                info!(instance = %instance_id, "probe instance running");
                Ok(true)
            }
            StatusObservation::Observed(phase) => {
                debug!(instance = %instance_id, ?phase, "instance not yet running");
                Ok(false)
            }
        }
    };
    poll_immediate(config.running_poll.interval, config.running_poll.deadline, check).await
}

/// Poll the console log until the classifier observes the end sentinel,
/// then hand back that final classification.
///
/// Missing output, empty output, and undecodable payloads all continue the
/// poll; only provider-call failures abort it.
async fn await_script_completion(
    gateway: &impl ProviderGateway,
    config: &VerifierConfig,
    instance_id: &InstanceId,
) -> Result<Classification, PollError<VerifierError>> {
    let observed: RefCell<Option<Classification>> = RefCell::new(None);
    let observed_ref = &observed;
    let check = move || async move {
        let text = match gateway.fetch_console_log(instance_id).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                debug!(instance = %instance_id, "waiting for boot script to complete");
                return Ok(false);
            }
            Err(VerifierError::ConsoleDecode(reason)) => {
                debug!(
                    instance = %instance_id,
                    %reason,
                    "error while collecting console output, will retry on next check interval"
                );
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if text.is_empty() {
            debug!(instance = %instance_id, "console output not yet populated with data");
            return Ok(false);
        }
        let classification = console::classify(&text);
        if !classification.script_complete {
            debug!(
                instance = %instance_id,
                "console output contains data, but end of boot script not seen"
            );
            return Ok(false);
        }
        debug!(instance = %instance_id, console = %text, "full console output");
        *observed_ref.borrow_mut() = Some(classification);
        Ok(true)
    };
    poll_immediate(config.script_poll.interval, config.script_poll.deadline, check).await?;
    Ok(observed.into_inner().unwrap_or_default())
}

async fn teardown(
    gateway: &impl ProviderGateway,
    reporter: &impl ProgressReporter,
    instance_id: &InstanceId,
    out: &mut RunOutput,
) {
    reporter.step("terminating probe instance");
    info!(instance = %instance_id, "terminating probe instance");
    if let Err(e) = gateway.terminate_instance(instance_id).await {
        error!(instance = %instance_id, error = %e, "failed to terminate probe instance");
        reporter.warn("probe instance could not be terminated; it may need manual cleanup");
        out.record_error(e);
    }
}
