use texcount_logging::{tc_error, tc_info, tc_warn};

use crate::invocation::{anchor_wrapper_dir, build_invocation, ensure_executable, HostPlatform};
use crate::parse::parse_texcount_output;
use crate::{CountError, CountJob, CountRunner, EngineConfig, TexCountReport};

/// Runs texcount for one job and parses its output.
///
/// Every path settles: launch problems, non-zero exits and output without a
/// word count all come back as `Err`.
pub async fn run_texcount(
    runner: &dyn CountRunner,
    config: &EngineConfig,
    job: &CountJob,
) -> Result<TexCountReport, CountError> {
    let wrapper_dir = if job.command.use_docker && config.wrapper_dir.is_relative() {
        let cwd = std::env::current_dir().map_err(|err| {
            tc_error!("Cannot resolve wrapper directory {:?}: {}", config.wrapper_dir, err);
            CountError::Io(err.to_string())
        })?;
        anchor_wrapper_dir(&config.wrapper_dir, &cwd)
    } else {
        config.wrapper_dir.clone()
    };

    let invocation = build_invocation(
        &job.command,
        &wrapper_dir,
        HostPlatform::current(),
        &job.file,
        job.merge,
    )?;

    if invocation.needs_exec_bit {
        ensure_executable(&invocation.program).map_err(|err| {
            tc_error!(
                "Cannot make wrapper {:?} executable: {}",
                invocation.program,
                err
            );
            CountError::Launch {
                program: invocation.program.clone(),
                message: err.to_string(),
            }
        })?;
    }

    tc_info!(
        "Count request {}: running {:?} with args {:?} in {:?}",
        job.request_id,
        invocation.program,
        invocation.args,
        invocation.working_dir
    );

    let output = match runner.run(&invocation).await {
        Ok(output) => output,
        Err(err) => {
            tc_error!("Count request {} failed: {}", job.request_id, err);
            return Err(err);
        }
    };

    if !output.success {
        tc_error!(
            "Count request {}: texcount exited with {:?}. stderr: {}",
            job.request_id,
            output.code,
            output.stderr.trim_end()
        );
        return Err(CountError::ExitStatus {
            code: output.code,
            stderr: output.stderr,
        });
    }

    match parse_texcount_output(&output.stdout) {
        Some(report) => Ok(report),
        None => {
            tc_warn!(
                "Count request {}: no word count in texcount output ({} bytes)",
                job.request_id,
                output.stdout.len()
            );
            Err(CountError::MissingWordCount {
                stdout: output.stdout,
            })
        }
    }
}
