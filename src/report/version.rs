use duct::cmd;
use std::path::Path;
use std::time::{Duration, Instant};

const VERSION_TIMEOUT: Duration = Duration::from_secs(3);
const POLL_INTERVAL: Duration = Duration::from_millis(25);
const MAX_LEN: usize = 60;

/// Best-effort version string: first non-empty output line of
/// `<path> <arg>`, stdout before stderr. Tools that hang or print nothing
/// yield `None`.
pub fn read_version(path: &Path, arg: &str) -> Option<String> {
    read_version_with_timeout(path, arg, VERSION_TIMEOUT)
}

fn read_version_with_timeout(path: &Path, arg: &str, timeout: Duration) -> Option<String> {
    let handle = cmd(path, [arg])
        .stdin_null()
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .start()
        .ok()?;

    let deadline = Instant::now() + timeout;
    let output = loop {
        match handle.try_wait() {
            Ok(Some(output)) => break output.clone(),
            Ok(None) if Instant::now() < deadline => std::thread::sleep(POLL_INTERVAL),
            _ => {
                let _ = handle.kill();
                return None;
            }
        }
    };

    [&output.stdout, &output.stderr]
        .into_iter()
        .find_map(|bytes| first_line(&String::from_utf8_lossy(bytes)))
}

fn first_line(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    if line.chars().count() > MAX_LEN {
        let cut: String = line.chars().take(MAX_LEN - 1).collect();
        Some(format!("{cut}…"))
    } else {
        Some(line.to_string())
    }
}
