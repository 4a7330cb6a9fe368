//! CUPS backend: spools the label to a temp file and hands it to `lp`.

use std::path::Path;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use telefax_core::{JobOutcome, PrintBackend, PrintJob, RejectReason};
use tracing::{debug, info, warn};

/// `request id is label-42 (1 file(s))`
static REQUEST_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"request id is (\S+)").unwrap());

/// How to invoke `lp`.
#[derive(Debug, Clone)]
pub struct LpConfig {
    /// Program to execute (default: `lp`).
    pub program: String,
    /// Remote CUPS server passed as `-h`.
    pub host: Option<String>,
    /// `media=...` option, e.g. `media=Custom.4x6in`.
    pub media: Option<String>,
    /// Pass `-o fit-to-page`.
    pub fit_to_page: bool,
}

impl Default for LpConfig {
    fn default() -> Self {
        Self {
            program: "lp".to_string(),
            host: None,
            media: None,
            fit_to_page: true,
        }
    }
}

pub struct LpBackend {
    config: LpConfig,
}

impl LpBackend {
    pub fn new(config: LpConfig) -> Self {
        Self { config }
    }

    /// Arguments for `lp`, ending with the spool file path.
    pub fn build_args(&self, job: &PrintJob, file: &Path) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(host) = &self.config.host {
            args.push("-h".to_string());
            args.push(host.clone());
        }
        args.push("-d".to_string());
        args.push(job.target_device.clone());
        args.push("-n".to_string());
        args.push(job.copies.to_string());
        if let Some(media) = &self.config.media {
            args.push("-o".to_string());
            args.push(media.clone());
        }
        if self.config.fit_to_page {
            args.push("-o".to_string());
            args.push("fit-to-page".to_string());
        }
        args.push(file.display().to_string());
        args
    }
}

#[async_trait]
impl PrintBackend for LpBackend {
    fn name(&self) -> &str {
        "cups"
    }

    async fn submit_job(&self, job: &PrintJob) -> JobOutcome {
        let spool = match tempfile::Builder::new()
            .prefix("telefax-")
            .suffix(&format!(".{}", job.bitmap.format.extension()))
            .tempfile()
        {
            Ok(file) => file,
            Err(e) => {
                return JobOutcome::Rejected {
                    reason: RejectReason::Backend(format!("failed to create spool file: {e}")),
                };
            }
        };

        if let Err(e) = tokio::fs::write(spool.path(), &job.bitmap.data).await {
            return JobOutcome::Rejected {
                reason: RejectReason::Backend(format!("failed to write spool file: {e}")),
            };
        }

        let args = self.build_args(job, spool.path());
        info!(program = %self.config.program, args = ?args, "Executing CUPS command");

        let output = tokio::process::Command::new(&self.config.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await;

        // `spool` stays alive until lp has read the file.
        let outcome = match output {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                debug!(stdout = %stdout.trim(), "CUPS output");
                JobOutcome::Accepted {
                    job_id: parse_job_id(&stdout),
                }
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(
                    code = output.status.code().unwrap_or(-1),
                    stderr = %stderr.trim(),
                    "CUPS printing failed"
                );
                JobOutcome::Rejected {
                    reason: classify_failure(&stderr, &job.target_device, output.status.code()),
                }
            }
            Err(e) => JobOutcome::Rejected {
                reason: RejectReason::Unreachable(format!(
                    "failed to run {}: {e}",
                    self.config.program
                )),
            },
        };
        drop(spool);
        outcome
    }
}

/// Extract the request id `lp` prints, falling back to the raw output.
pub fn parse_job_id(stdout: &str) -> String {
    REQUEST_ID_PATTERN
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| stdout.trim().to_string())
}

/// Map `lp` stderr onto a rejection class.
pub fn classify_failure(stderr: &str, device: &str, code: Option<i32>) -> RejectReason {
    let detail = stderr.trim();
    let lower = detail.to_lowercase();

    if lower.contains("does not exist")
        || lower.contains("unknown destination")
        || lower.contains("no such destination")
        || lower.contains("invalid destination")
    {
        RejectReason::InvalidDevice(device.to_string())
    } else if lower.contains("not accepting")
        || lower.contains("too many jobs")
        || (lower.contains("spool") && lower.contains("full"))
    {
        RejectReason::SpoolerFull(detail.to_string())
    } else if lower.contains("connection refused")
        || lower.contains("unable to connect")
        || lower.contains("no route to host")
        || lower.contains("service-unavailable")
    {
        RejectReason::Unreachable(detail.to_string())
    } else if detail.is_empty() {
        RejectReason::Backend(format!("lp exited with status {}", code.unwrap_or(-1)))
    } else {
        RejectReason::Backend(detail.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use telefax_core::{LabelBitmap, OutputFormat};

    fn job(copies: u32) -> PrintJob {
        PrintJob::new(
            LabelBitmap {
                width: 1,
                height: 1,
                format: OutputFormat::Png,
                data: vec![0x89, 0x50],
            },
            copies,
            "DYMO_4XL",
        )
        .unwrap()
    }

    #[test]
    fn builds_lp_arguments() {
        let backend = LpBackend::new(LpConfig {
            host: Some("cups.local:631".into()),
            media: Some("media=Custom.4x6in".into()),
            ..Default::default()
        });
        let args = backend.build_args(&job(3), &PathBuf::from("/tmp/label.png"));
        assert_eq!(
            args,
            vec![
                "-h", "cups.local:631", "-d", "DYMO_4XL", "-n", "3", "-o",
                "media=Custom.4x6in", "-o", "fit-to-page", "/tmp/label.png",
            ]
        );
    }

    #[test]
    fn omits_optional_arguments() {
        let backend = LpBackend::new(LpConfig {
            fit_to_page: false,
            ..Default::default()
        });
        let args = backend.build_args(&job(1), &PathBuf::from("/tmp/l.png"));
        assert_eq!(args, vec!["-d", "DYMO_4XL", "-n", "1", "/tmp/l.png"]);
    }

    #[test]
    fn parses_request_id() {
        assert_eq!(
            parse_job_id("request id is DYMO_4XL-17 (1 file(s))\n"),
            "DYMO_4XL-17"
        );
        assert_eq!(parse_job_id("  queued  \n"), "queued");
    }

    #[test]
    fn classifies_failures() {
        assert_eq!(
            classify_failure("lp: The printer or class does not exist.", "X", Some(1)),
            RejectReason::InvalidDevice("X".into())
        );
        assert!(matches!(
            classify_failure("lp: Destination \"X\" is not accepting jobs.", "X", Some(1)),
            RejectReason::SpoolerFull(_)
        ));
        assert!(matches!(
            classify_failure("lp: Unable to connect to server: Connection refused", "X", Some(1)),
            RejectReason::Unreachable(_)
        ));
        assert_eq!(
            classify_failure("", "X", Some(2)),
            RejectReason::Backend("lp exited with status 2".into())
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_command_is_accepted() {
        // `echo` stands in for lp and prints the arguments it was given.
        let backend = LpBackend::new(LpConfig {
            program: "echo".into(),
            ..Default::default()
        });
        match backend.submit_job(&job(4)).await {
            JobOutcome::Accepted { job_id } => {
                assert!(job_id.starts_with("-d DYMO_4XL -n 4 -o fit-to-page"));
                assert!(job_id.ends_with(".png"));
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_rejected() {
        let backend = LpBackend::new(LpConfig {
            program: "false".into(),
            ..Default::default()
        });
        assert!(matches!(
            backend.submit_job(&job(1)).await,
            JobOutcome::Rejected { reason: RejectReason::Backend(_) }
        ));
    }

    #[tokio::test]
    async fn missing_program_is_unreachable() {
        let backend = LpBackend::new(LpConfig {
            program: "/nonexistent/telefax-lp".into(),
            ..Default::default()
        });
        assert!(matches!(
            backend.submit_job(&job(1)).await,
            JobOutcome::Rejected { reason: RejectReason::Unreachable(_) }
        ));
    }
}
