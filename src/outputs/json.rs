//! JSON export of a [`ChannelReport`].
//!
//! The same serialization backs the `/api/report` endpoint and the
//! `inspect --json-output-dir` export.
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── UCxxxxxxxxxxxxxxxxxxxxxx/
//!     ├── dQw4w9WgXcQ.json   # latest video id at the time of the run
//!     └── no-video.json      # channel had no videos
//! ```

use crate::models::ChannelReport;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the export file for `report` under `json_output_dir`.
pub fn report_path(report: &ChannelReport, json_output_dir: &Path) -> PathBuf {
    let file_stem = report
        .video
        .as_ref()
        .map(|video| video.video_id.as_str())
        .unwrap_or("no-video");
    json_output_dir
        .join(report.channel_id.as_str())
        .join(format!("{file_stem}.json"))
}

/// Write `report` as pretty-printed JSON and return the written path.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir.display()))]
pub async fn write_report(
    report: &ChannelReport,
    json_output_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    let path = report_path(report, json_output_dir);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote report JSON");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChannelId, ChannelReport};
    use crate::testing::sample_profile;

    fn report() -> ChannelReport {
        ChannelReport {
            channel_id: ChannelId::new("UC123"),
            profile: Some(sample_profile()),
            video: None,
        }
    }

    #[test]
    fn test_report_path_without_video() {
        let path = report_path(&report(), Path::new("/tmp/out"));
        assert_eq!(path, PathBuf::from("/tmp/out/UC123/no-video.json"));
    }

    #[tokio::test]
    async fn test_write_report_round_trip() {
        let dir = std::env::temp_dir()
            .join(format!("channel_pulse_json_{}", std::process::id()));
        let path = write_report(&report(), &dir).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: ChannelReport = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, report());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
