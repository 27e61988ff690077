use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{InventoryReport, ReportPeriod};

/// A report previously written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    /// Location of the JSON file.
    pub path: PathBuf,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    #[allow(missing_docs)]
    pub period: ReportPeriod,
}

/// Writes reports as JSON files under one directory.
pub struct ReportExporter {
    root: PathBuf,
}

impl ReportExporter {
    /// Exporter writing into `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the reports are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `report` to `report_<timestamp>.json` and return its entry.
    pub fn export(&self, report: &InventoryReport) -> Result<ExportEntry> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;

        let stamp = report.generated_at.format("%Y%m%d_%H%M%S").to_string();
        let mut path = self.root.join(format!("report_{stamp}.json"));
        let mut suffix = 1;
        while path.exists() {
            path = self.root.join(format!("report_{stamp}_{suffix}.json"));
            suffix += 1;
        }

        let serialised = serde_json::to_vec_pretty(report).context("failed to serialise report")?;
        fs::write(&path, serialised).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), period = ?report.period, "report exported");

        Ok(ExportEntry {
            path,
            generated_at: report.generated_at,
            period: report.period,
        })
    }

    /// Previously exported reports, newest first. Unreadable files are skipped.
    pub fn entries(&self) -> Result<Vec<ExportEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root).context("failed to read report directory")? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match self.load(&path) {
                Ok(report) => entries.push(ExportEntry {
                    path,
                    generated_at: report.generated_at,
                    period: report.period,
                }),
                Err(err) => warn!("Skipping report {}: {err:#}", path.display()),
            }
        }

        entries.sort_by(|a, b| {
            b.generated_at
                .cmp(&a.generated_at)
                .then_with(|| b.path.cmp(&a.path))
        });
        Ok(entries)
    }

    /// Read a previously exported report.
    pub fn load(&self, path: &Path) -> Result<InventoryReport> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::LOW_STOCK_THRESHOLD;
    use chrono::Duration;
    use tempfile::tempdir;

    fn report(period: ReportPeriod) -> InventoryReport {
        InventoryReport::build(&[], &[], period, LOW_STOCK_THRESHOLD)
    }

    #[test]
    fn export_and_list_newest_first() -> Result<()> {
        let dir = tempdir()?;
        let exporter = ReportExporter::new(dir.path().join("reports"));
        assert!(exporter.entries()?.is_empty());

        let mut older = report(ReportPeriod::Week);
        older.generated_at = older.generated_at - Duration::hours(1);
        let first = exporter.export(&older)?;
        let second = exporter.export(&report(ReportPeriod::Year))?;
        assert!(first.path.exists());
        assert!(first
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("report_") && name.ends_with(".json")));

        fs::write(exporter.root().join("broken.json"), "{")?;
        fs::write(exporter.root().join("notes.txt"), "ignored")?;

        let entries = exporter.entries()?;
        assert_eq!(entries, vec![second.clone(), first]);
        assert_eq!(exporter.load(&second.path)?.period, ReportPeriod::Year);
        Ok(())
    }

    #[test]
    fn same_second_exports_do_not_overwrite() -> Result<()> {
        let dir = tempdir()?;
        let exporter = ReportExporter::new(dir.path());
        let report = report(ReportPeriod::Month);

        let a = exporter.export(&report)?;
        let b = exporter.export(&report)?;
        assert_ne!(a.path, b.path);
        assert_eq!(exporter.entries()?.len(), 2);
        Ok(())
    }
}
