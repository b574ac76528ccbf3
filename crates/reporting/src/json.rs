use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::SessionReport;

pub fn render_json(report: &SessionReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("render report JSON")
}

pub fn parse_json(contents: &str) -> Result<SessionReport> {
    serde_json::from_str(contents).context("parse report JSON")
}

/// Writes the report as `<session id>.json` under `dir` and returns the path.
pub fn save_report(report: &SessionReport, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create report dir {}", dir.display()))?;
    let path = dir.join(format!("{}.json", report.session_id));
    write_report(report, &path)?;
    Ok(path)
}

pub fn write_report(report: &SessionReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create report dir {}", parent.display()))?;
    }
    let contents = render_json(report)?;
    fs::write(path, contents).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}

pub fn load_report(path: &Path) -> Result<SessionReport> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read report {}", path.display()))?;
    parse_json(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codepath_core::content::builtin_deck;
    use codepath_core::session::SessionState;
    use time::OffsetDateTime;

    #[test]
    fn test_save_and_load_report() {
        let deck = builtin_deck().unwrap();
        let mut state = SessionState::for_deck(&deck);
        state.visit(0);
        let now = OffsetDateTime::now_utc();
        let report = SessionReport::from_session(&deck, &state, now, now);

        let dir = tempfile::tempdir().unwrap();
        let path = save_report(&report, &dir.path().join("reports")).unwrap();
        assert!(path.ends_with(format!("{}.json", report.session_id)));

        let loaded = load_report(&path).unwrap();
        assert_eq!(loaded.session_id, report.session_id);
        assert_eq!(loaded.pages_viewed, vec!["Intro"]);
        assert_eq!(loaded.relevance[0].assessment.score.value(), 0.0);
    }

    #[test]
    fn test_timestamps_are_rfc3339_strings() {
        let deck = builtin_deck().unwrap();
        let state = SessionState::for_deck(&deck);
        let started = OffsetDateTime::UNIX_EPOCH;
        let ended = started + time::Duration::seconds(125);
        let report = SessionReport::from_session(&deck, &state, started, ended);

        let json = render_json(&report).unwrap();
        assert!(json.contains("\"started_at\": \"1970-01-01T00:00:00Z\""));
        assert!(json.contains("\"ended_at\": \"1970-01-01T00:02:05Z\""));

        let parsed = parse_json(&json).unwrap();
        assert_eq!(parsed.started_at, started);
        assert_eq!(parsed.ended_at, ended);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_json("{ not json").is_err());
    }
}
