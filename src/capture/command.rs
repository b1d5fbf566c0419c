use super::ImageSource;
use crate::{
    config::{self, Config},
    pages::PageInventory,
    target::EvaluationTarget,
    util::{ensure_dir, route_slug},
};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Request written to the browser driver's stdin, one process per route.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureRequest {
    pub url: String,
    pub route: String,
    pub out_path: String,
    pub full_page: bool,
    pub settle_ms: u64,
}

/// Drives an external browser-automation command that writes a PNG to
/// `out_path` and exits zero.
pub struct CommandSource {
    settings: config::Capture,
    pages: PageInventory,
    out_dir: PathBuf,
}

impl CommandSource {
    pub fn new(cfg: &Config, pages: PageInventory) -> Result<Self> {
        if cfg.capture.command.trim().is_empty() {
            return Err(anyhow!("capture.command is empty while capture.mode=command"));
        }
        let out_dir = PathBuf::from(&cfg.capture.screenshot_dir);
        ensure_dir(&out_dir)?;
        Ok(Self {
            settings: cfg.capture.clone(),
            pages,
            out_dir,
        })
    }

    fn request_for(&self, route: &str) -> CaptureRequest {
        CaptureRequest {
            url: self.pages.url_for(route),
            route: route.to_string(),
            out_path: self
                .out_dir
                .join(format!("{}.png", route_slug(route)))
                .display()
                .to_string(),
            full_page: self.settings.full_page,
            settle_ms: self.settings.settle_ms,
        }
    }
}

impl ImageSource for CommandSource {
    fn capture(&self, route: &str) -> Result<EvaluationTarget> {
        let req = self.request_for(route);
        let out_path = PathBuf::from(&req.out_path);
        if out_path.exists() {
            std::fs::remove_file(&out_path)
                .with_context(|| format!("removing stale screenshot: {}", out_path.display()))?;
        }

        debug!(
            "capture {} -> {} timeout={}s",
            req.url,
            req.out_path,
            self.settings.timeout_seconds
        );
        let mut cmd = Command::new(&self.settings.command);
        cmd.args(&self.settings.args);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let bytes = serde_json::to_vec(&req)?;
        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning capture command: {}", self.settings.command))?;

        // The child is always reaped, even when it exits before reading stdin.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin
                .write_all(&bytes)
                .with_context(|| format!("writing capture request for {route}")),
            None => Err(anyhow!("capture command has no stdin")),
        };

        let output = wait_with_timeout(
            &mut child,
            Duration::from_secs(self.settings.timeout_seconds.max(1)),
        )?;

        if !output.status.success() {
            return Err(anyhow!(
                "capture command failed for {} ({}): {}",
                route,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }
        written?;
        if !output.stderr.is_empty() {
            debug!(
                "capture stderr {}: {}",
                route,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let image = std::fs::read(&out_path)
            .with_context(|| format!("reading screenshot: {}", out_path.display()))?;
        Ok(EvaluationTarget::new(route, image))
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain pipes while waiting so a chatty driver can't block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("capture command timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            let _ = stdout_thread.join();
            return Err(anyhow!(
                "capture command exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
