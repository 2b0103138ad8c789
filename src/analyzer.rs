//! Invocation of the external analyzer jar and report streaming

use crate::error::{Result, ScoutError};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Child, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

/// Well known location of the analyzer jar inside the container
pub const ANALYZER_JAR: &str = "/securify_jar/securify.jar";

/// Default JVM heap limit in gigabytes
pub const DEFAULT_HEAP_GB: u32 = 4;

/// Default deadline for one analyzer run.
///
/// The subprocess is killed once the deadline passes, a hung analyzer must
/// not hang the whole tool.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The external static analyzer, invoked as a JVM subprocess with the
/// compilation artifact as input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analyzer {
    /// The JVM binary used to launch the jar
    pub java: PathBuf,
    /// Path to the analyzer jar
    pub jar: PathBuf,
    /// JVM heap limit in gigabytes, passed as `-Xmx<n>G`
    pub heap_gb: u32,
    /// Deadline for one run, `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            java: PathBuf::from("java"),
            jar: PathBuf::from(ANALYZER_JAR),
            heap_gb: DEFAULT_HEAP_GB,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl Analyzer {
    /// A new analyzer using the jar at the given location
    pub fn new(jar: impl Into<PathBuf>) -> Self {
        Self { jar: jar.into(), ..Default::default() }
    }

    /// Runs the analyzer over the compilation artifact, writing findings to
    /// `report`.
    ///
    /// A non zero exit is a hard failure, there is no structured diagnostic
    /// to recover from the subprocess.
    pub fn run(&self, artifact: &Path, report: &Path) -> Result<()> {
        tracing::debug!("running analyzer {} on {}", self.jar.display(), artifact.display());
        let mut child = self
            .command(artifact, report)
            .spawn()
            .map_err(|err| ScoutError::io(err, &self.java))?;
        let status = match self.timeout {
            Some(limit) => wait_with_deadline(&mut child, limit)
                .map_err(|err| ScoutError::io(err, &self.java))?
                .ok_or(ScoutError::AnalyzerTimeout(limit))?,
            None => child.wait().map_err(|err| ScoutError::io(err, &self.java))?,
        };
        if !status.success() {
            return Err(ScoutError::Analyzer(format!("analyzer exited with {status}")))
        }
        Ok(())
    }

    fn command(&self, artifact: &Path, report: &Path) -> Command {
        let mut cmd = Command::new(&self.java);
        cmd.arg(format!("-Xmx{}G", self.heap_gb))
            .arg("-jar")
            .arg(&self.jar)
            .arg("-co")
            .arg(artifact)
            .arg("-o")
            .arg(report)
            // findings are read from the report file, the analyzer's own
            // stdout is discarded while diagnostics pass through on stderr
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());
        cmd
    }
}

/// Waits for the child within `limit`, returning `None` after killing the
/// child once the deadline passed
fn wait_with_deadline(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status))
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None)
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Writes the report file verbatim to the given writer, preserving content
/// and line ordering
pub fn stream_report(report: &Path, writer: &mut impl Write) -> Result<()> {
    let mut file = fs::File::open(report).map_err(|err| ScoutError::io(err, report))?;
    io::copy(&mut file, writer).map_err(|err| ScoutError::io(err, report))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_analyzer_invocation() {
        let analyzer = Analyzer::default();
        let cmd = analyzer.command(Path::new("/comp.json"), Path::new("/securify_res.json"));

        assert_eq!(cmd.get_program(), "java");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["-Xmx4G", "-jar", ANALYZER_JAR, "-co", "/comp.json", "-o", "/securify_res.json"]
        );
    }

    #[test]
    #[cfg(unix)]
    fn deadline_kills_hung_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        let started = Instant::now();
        let status = wait_with_deadline(&mut child, Duration::from_millis(50)).unwrap();
        assert!(status.is_none());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    #[cfg(unix)]
    fn deadline_returns_exit_status() {
        let mut child = Command::new("true").spawn().unwrap();
        let status = wait_with_deadline(&mut child, Duration::from_secs(5)).unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn streams_report_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let report = tmp.path().join("report.txt");
        let content = "Violation for pattern DAO\n  at A.sol:12\n\nok\n";
        std::fs::write(&report, content).unwrap();

        let mut out = Vec::new();
        stream_report(&report, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), content);
    }
}
