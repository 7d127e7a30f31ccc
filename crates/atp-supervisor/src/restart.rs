//! Process re-exec.

use std::convert::Infallible;

use tracing::info;

use crate::error::SupervisorError;

/// Replace the current process image with a fresh run of the same executable
/// and arguments. Only returns on failure.
pub fn reexec() -> SupervisorError {
    match exec_self() {
        Ok(never) => match never {},
        Err(e) => e,
    }
}

#[cfg(unix)]
fn exec_self() -> Result<Infallible, SupervisorError> {
    use std::ffi::{CString, OsStr};
    use std::os::unix::ffi::OsStrExt;

    fn c_string(s: &OsStr) -> Result<CString, SupervisorError> {
        CString::new(s.as_bytes())
            .map_err(|e| SupervisorError::Relaunch(format!("invalid argument: {e}")))
    }

    let exe = std::env::current_exe()
        .map_err(|e| SupervisorError::Relaunch(format!("cannot locate executable: {e}")))?;
    let program = c_string(exe.as_os_str())?;
    let args = std::env::args_os()
        .map(|arg| c_string(&arg))
        .collect::<Result<Vec<_>, _>>()?;

    info!("Re-executing {}", exe.display());
    nix::unistd::execv(&program, &args)
        .map_err(|errno| SupervisorError::Relaunch(format!("{}: {}", exe.display(), errno)))
}

#[cfg(not(unix))]
fn exec_self() -> Result<Infallible, SupervisorError> {
    Err(SupervisorError::Relaunch(
        "re-exec is only supported on unix; set restart_mode = \"in_process\"".to_string(),
    ))
}
