use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::{CountError, Invocation};

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

#[async_trait::async_trait]
pub trait CountRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, CountError>;
}

#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait]
impl CountRunner for TokioProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, CountError> {
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| CountError::Launch {
                program: invocation.program.clone(),
                message: err.to_string(),
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let collect = async {
            let (stdout, stderr, status) =
                tokio::join!(read_all(stdout), read_all(stderr), child.wait());
            let status = status.map_err(|err| CountError::Io(err.to_string()))?;
            Ok::<_, CountError>(ProcessOutput {
                success: status.success(),
                code: status.code(),
                stdout: stdout?,
                stderr: stderr?,
            })
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, collect)
                .await
                .map_err(|_| CountError::TimedOut(limit))?,
            None => collect.await,
        }
    }
}

/// Accumulates a pipe chunk by chunk, decoding once the stream closes.
async fn read_all<R>(pipe: Option<R>) -> Result<String, CountError>
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(String::new());
    };
    let mut bytes = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = pipe
            .read(&mut chunk)
            .await
            .map_err(|err| CountError::Io(err.to_string()))?;
        if read == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..read]);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
