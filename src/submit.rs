use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use anyhow::{Context, Result};

/// Name of the scheduler's submission executable.
pub const SBATCH: &str = "sbatch";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("can't find {0:?} in the current directory or on $PATH")]
    NotFound(String),
    #[error("failed to start {0:?}: {1}")]
    SpawnFailed(String, std::io::Error),
}

/// Resolve an executable name the way sbatch resolves job files:
/// a name with no '/' is tried relative to the current directory
/// first, then searched on $PATH. A name containing '/' is taken
/// as a plain path.
pub fn resolve(name: &str) -> Result<PathBuf, Error> {
    let cwd = std::env::current_dir().map_err(|e| Error::SpawnFailed(name.to_owned(), e))?;
    resolve_in(name, &cwd, std::env::var_os("PATH").as_deref())
}

fn resolve_in(name: &str, cwd: &Path, path_var: Option<&OsStr>) -> Result<PathBuf, Error> {
    if name.contains('/') {
        let path = PathBuf::from(name);
        if is_executable(&path) {
            return Ok(path);
        }
        return Err(Error::NotFound(name.to_owned()));
    }

    let local = cwd.join(name);
    if is_executable(&local) {
        return Ok(local);
    }

    if let Some(paths) = path_var {
        for dir in std::env::split_paths(paths) {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }
    }

    Err(Error::NotFound(name.to_owned()))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match path.metadata() {
            Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

/// Hands the finished script to sbatch. By the time this struct is
/// constructed, all validation has passed; nothing here inspects the
/// script again.
#[derive(Debug)]
pub struct Submitter {
    sbatch: PathBuf,
    opts: Vec<String>,
    ntasks: usize,
}

impl Submitter {
    /// Locate sbatch and fix the caller's options and task count.
    pub fn new(opts: Vec<String>, ntasks: usize) -> Result<Self, Error> {
        let sbatch = resolve(SBATCH)?;
        Ok(Self {
            sbatch,
            opts,
            ntasks,
        })
    }

    /// The --array range covering every record, 1-based like Slurm.
    pub fn array_range(&self) -> String {
        format!("--array=1-{}", self.ntasks)
    }

    /// Stream the script to sbatch's stdin and wait. Caller options go
    /// first, verbatim; sbatch's native precedence makes them override
    /// any in-script #SBATCH directive.
    pub fn submit(&self, script: &str) -> Result<ExitStatus> {
        let mut cmd = Command::new(&self.sbatch);
        cmd.args(&self.opts).arg(self.array_range()).stdin(Stdio::piped());

        log::info!(
            "submitting {} tasks: {:?} {:?}",
            self.ntasks,
            cmd.get_program(),
            cmd.get_args(),
        );

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::SpawnFailed(SBATCH.to_owned(), e))?;

        // dropping stdin closes the pipe so sbatch sees EOF:
        let written = {
            let mut stdin = child.stdin.take().context("attaching to sbatch stdin")?;
            stdin.write_all(script.as_bytes())
        };

        // reap the child even if the write failed; sbatch exiting
        // before draining the pipe just means its status is already
        // decided, and that status is what we have to report:
        let status = child.wait().context("waiting for sbatch")?;

        if let Err(e) = written {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(anyhow::Error::new(e).context("streaming script to sbatch"));
            }
            log::debug!("sbatch exited before reading the whole script: {status}");
        }
        Ok(status)
    }
}

/// Map an exit status to the code this process should exit with;
/// on Unix a signal death becomes the conventional 128 + signo.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[cfg(unix)]
    fn make_executable(path: &Path) -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n")?;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_cwd_wins_over_path() -> anyhow::Result<()> {
        let cwd = tempfile::tempdir()?;
        let bindir = tempfile::tempdir()?;
        make_executable(&cwd.path().join("job.sh"))?;
        make_executable(&bindir.path().join("job.sh"))?;

        let path_var = std::env::join_paths([bindir.path()])?;
        let found = resolve_in("job.sh", cwd.path(), Some(path_var.as_os_str()))?;
        assert_eq!(found, cwd.path().join("job.sh"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_falls_back_to_path() -> anyhow::Result<()> {
        let cwd = tempfile::tempdir()?;
        let bindir = tempfile::tempdir()?;
        make_executable(&bindir.path().join("job.sh"))?;

        let path_var = std::env::join_paths([bindir.path()])?;
        let found = resolve_in("job.sh", cwd.path(), Some(path_var.as_os_str()))?;
        assert_eq!(found, bindir.path().join("job.sh"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_is_skipped() -> anyhow::Result<()> {
        let cwd = tempfile::tempdir()?;
        fs::write(cwd.path().join("job.sh"), "plain file")?;
        let err = resolve_in("job.sh", cwd.path(), None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_explicit_path_bypasses_search() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let job = dir.path().join("job.sh");
        make_executable(&job)?;

        let name = job.to_str().unwrap();
        let found = resolve_in(name, Path::new("/nonexistent"), None)?;
        assert_eq!(found, job);

        let err = resolve_in("no/such/job.sh", dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_status_is_delegated() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        // a stand-in scheduler that quits without reading its stdin:
        let dir = tempfile::tempdir()?;
        let stub = dir.path().join("sbatch");
        fs::write(&stub, "#!/bin/sh\nexit 3\n")?;
        fs::set_permissions(&stub, fs::Permissions::from_mode(0o755))?;

        let sub = Submitter {
            sbatch: stub,
            opts: Vec::new(),
            ntasks: 1,
        };

        // bigger than any pipe buffer, so the write hits EPIPE:
        let script = "x".repeat(1 << 21);
        let status = sub.submit(&script)?;
        assert_eq!(exit_code(status), 3);
        Ok(())
    }

    #[test]
    fn test_array_range() {
        let sub = Submitter {
            sbatch: PathBuf::from("sbatch"),
            opts: Vec::new(),
            ntasks: 12,
        };
        assert_eq!(sub.array_range(), "--array=1-12");
    }
}
