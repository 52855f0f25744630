//! Test harness for running generators against fake binaries.

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Behavior of a fake generator binary.
#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// Writes these bytes to the `-o` path and exits 0.
    Writes(Vec<u8>),
    /// Prints to stdout and stderr, then exits with `code`.
    Fails {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// Exits 0 without writing anything.
    SkipsOutput,
    /// Sleeps far longer than any test deadline.
    Hangs,
}

/// A scratch directory holding fake binaries and generated outputs.
pub struct TestHarness {
    /// Working directory for binaries and outputs.
    pub work_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Path for an output file inside the working directory.
    pub fn out(&self, relative: &str) -> PathBuf {
        self.path().join("out").join(relative)
    }

    /// File the fake binaries record their argv into, one argument per line.
    pub fn args_log(&self) -> PathBuf {
        self.path().join("args.log")
    }

    /// Arguments recorded by the most recent fake binary run.
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(self.args_log())
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// File the fake binaries record their cwd and `$EDUPLUS_TRACE` into.
    pub fn env_log(&self) -> PathBuf {
        self.path().join("env.log")
    }

    /// Physical working directory of the most recent fake binary run.
    pub fn recorded_cwd(&self) -> Option<PathBuf> {
        self.env_log_line(0).map(PathBuf::from)
    }

    /// `$EDUPLUS_TRACE` as seen by the most recent fake binary run; empty
    /// when unset.
    pub fn recorded_trace(&self) -> Option<String> {
        self.env_log_line(1)
    }

    fn env_log_line(&self, index: usize) -> Option<String> {
        let log = fs::read_to_string(self.env_log()).ok()?;
        log.lines().nth(index).map(str::to_string)
    }

    /// Writes an executable fake generator and returns its path.
    pub fn fake_binary(&self, name: &str, behavior: FakeBehavior) -> PathBuf {
        let body = match behavior {
            FakeBehavior::Writes(bytes) => {
                let payload = self.payload(&format!("{}.payload", name), &bytes);
                format!("cat '{}' > \"$out\"\n", payload.display())
            }
            FakeBehavior::Fails {
                code,
                stdout,
                stderr,
            } => {
                let stdout_file = self.payload(&format!("{}.stdout", name), stdout.as_bytes());
                let stderr_file = self.payload(&format!("{}.stderr", name), stderr.as_bytes());
                format!(
                    "cat '{}'\ncat '{}' 1>&2\nexit {}\n",
                    stdout_file.display(),
                    stderr_file.display(),
                    code
                )
            }
            FakeBehavior::SkipsOutput => "exit 0\n".to_string(),
            FakeBehavior::Hangs => "exec sleep 30\n".to_string(),
        };

        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{log}'\n\
             printf '%s\\n' \"$(pwd -P)\" \"${{EDUPLUS_TRACE-}}\" > '{env_log}'\n\
             out=\"\"\n\
             prev=\"\"\n\
             for arg in \"$@\"; do\n\
             \x20 if [ \"$prev\" = \"-o\" ]; then out=\"$arg\"; fi\n\
             \x20 prev=\"$arg\"\n\
             done\n\
             {body}",
            log = self.args_log().display(),
            env_log = self.env_log().display(),
            body = body
        );

        let path = self.path().join(name);
        self.write_file(&path, script.as_bytes(), 0o755);
        path
    }

    /// Writes raw bytes the fake scripts `cat`, so no test text is ever
    /// spliced into shell source.
    fn payload(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, bytes).expect("Failed to write payload");
        path
    }

    /// Writes a file that exists but cannot be executed.
    pub fn non_executable(&self, name: &str) -> PathBuf {
        let path = self.path().join(name);
        self.write_file(&path, b"#!/bin/sh\nexit 0\n", 0o644);
        path
    }

    fn write_file(&self, path: &Path, content: &[u8], mode: u32) {
        {
            let mut file = fs::File::create(path).expect("Failed to create fake binary");
            file.write_all(content).expect("Failed to write fake binary");
            file.sync_all().expect("Failed to sync fake binary");
        }
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .expect("Failed to set fake binary permissions");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
