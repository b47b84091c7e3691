use std::io;
use std::path::{Path, PathBuf};

use crate::{CommandSettings, CountError};

pub const MERGE_FLAG: &str = "-merge";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Windows,
    Unix,
}

impl HostPlatform {
    pub fn current() -> Self {
        if cfg!(windows) {
            HostPlatform::Windows
        } else {
            HostPlatform::Unix
        }
    }
}

/// A fully resolved process launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Set for the Unix wrapper script, which must be made executable before each launch.
    pub needs_exec_bit: bool,
}

/// Path of the Docker wrapper script for `platform`.
pub fn wrapper_script(wrapper_dir: &Path, platform: HostPlatform) -> PathBuf {
    match platform {
        HostPlatform::Windows => wrapper_dir.join("texcount.bat"),
        HostPlatform::Unix => wrapper_dir.join("texcount"),
    }
}

/// Anchors a relative wrapper directory at `base`.
///
/// The counted process runs inside the document's directory, so the wrapper
/// path handed to it must not be relative.
pub fn anchor_wrapper_dir(wrapper_dir: &Path, base: &Path) -> PathBuf {
    if wrapper_dir.is_absolute() {
        wrapper_dir.to_path_buf()
    } else {
        base.join(wrapper_dir)
    }
}

/// Resolve program, arguments and working directory for counting `file`.
///
/// Arguments are the configured ones, then `-merge` when requested and not
/// already present, then the base name of `file`. The process runs inside
/// the file's directory.
pub fn build_invocation(
    settings: &CommandSettings,
    wrapper_dir: &Path,
    platform: HostPlatform,
    file: &Path,
    merge: bool,
) -> Result<Invocation, CountError> {
    let file_name = file
        .file_name()
        .ok_or_else(|| CountError::InvalidTarget(file.to_path_buf()))?;
    let working_dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let (program, needs_exec_bit) = if settings.use_docker {
        (
            wrapper_script(wrapper_dir, platform),
            platform == HostPlatform::Unix,
        )
    } else {
        (PathBuf::from(&settings.command_path), false)
    };

    let mut args = settings.args.clone();
    if merge && !args.iter().any(|arg| arg == MERGE_FLAG) {
        args.push(MERGE_FLAG.to_string());
    }
    args.push(file_name.to_string_lossy().into_owned());

    Ok(Invocation {
        program,
        args,
        working_dir,
        needs_exec_bit,
    })
}

/// Adds the executable bits (`0o755`) to `path`.
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    std::fs::set_permissions(path, permissions)
}

/// Windows has no executable bit.
#[cfg(not(unix))]
pub fn ensure_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
