//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use pvc_core::{Claim, StatusReport};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Placeholder shown for pods that have not been scheduled.
const UNSCHEDULED: &str = "<unscheduled>";

/// Placeholder for absent values in table cells.
const NONE: &str = "<none>";

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Rows of text cells rendered with left-aligned, content-sized columns.
struct Table<'a> {
    header: Vec<&'a str>,
    rows: Vec<Vec<String>>,
}

impl<'a> Table<'a> {
    fn new(header: Vec<&'a str>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    fn write<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let widths = self.widths();
        write_line(writer, &widths, self.header.iter().copied())?;
        for row in &self.rows {
            write_line(writer, &widths, row.iter().map(String::as_str))?;
        }
        Ok(())
    }
}

fn write_line<'c, W: Write>(
    writer: &mut W,
    widths: &[usize],
    cells: impl Iterator<Item = &'c str>,
) -> Result<(), CliError> {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("   ");
    writeln!(writer, "{}", line.trim_end())?;
    Ok(())
}

impl TableDisplay for StatusReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Claim:  {}/{}", self.namespace, self.claim)?;
        match &self.volume {
            Some(volume) => writeln!(
                writer,
                "Volume: {} (handle {})",
                volume.name, volume.attachment_handle
            )?,
            None => writeln!(writer, "Volume: {NONE}")?,
        }
        writeln!(writer)?;

        if self.pods.is_empty() {
            writeln!(writer, "No pods reference this claim")?;
        } else {
            let mut pods = Table::new(vec!["POD", "NODE", "STATE"]);
            for pod in &self.pods {
                pods.row(vec![
                    pod.name.clone(),
                    pod.node.clone().unwrap_or_else(|| UNSCHEDULED.to_string()),
                    pod.state.to_string(),
                ]);
            }
            pods.write(writer)?;
        }
        writeln!(writer)?;

        let mut phases = Table::new(vec!["PHASE", "STATUS", "DETAIL"]);
        for (phase, verdict) in self.phases() {
            phases.row(vec![
                phase.to_string(),
                verdict.status.to_string(),
                verdict.detail.clone(),
            ]);
        }
        phases.write(writer)
    }
}

/// Claims listed by `ls`.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimList {
    /// Namespace the claims were listed from.
    pub namespace: String,
    /// Pod whose claims were listed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod: Option<String>,
    /// The claims.
    pub claims: Vec<Claim>,
}

impl TableDisplay for ClaimList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.claims.is_empty() {
            match &self.pod {
                Some(pod) => writeln!(writer, "Pod {pod} uses no claims")?,
                None => writeln!(writer, "No claims in namespace {}", self.namespace)?,
            }
            return Ok(());
        }

        let mut table = Table::new(vec!["NAME", "VOLUME", "STORAGECLASS"]);
        for claim in &self.claims {
            table.row(vec![
                claim.name.clone(),
                claim.bound_volume().unwrap_or(NONE).to_string(),
                claim.storage_class.clone().unwrap_or_else(|| NONE.to_string()),
            ]);
        }
        table.write(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvc_core::{Phase, PhaseStatus, PhaseVerdict, Pod, PodState, VolumeStatus};

    fn degraded_report() -> StatusReport {
        let mut report = StatusReport::new("shop", "data");
        report.mark_bound();
        report.volume = Some(VolumeStatus {
            name: "pv-1".to_string(),
            attachment_handle: "vol-1".to_string(),
        });
        report.pods = vec![
            Pod {
                name: "web-0".to_string(),
                node: Some("node-a".to_string()),
                state: PodState::Running,
                volume: "www".to_string(),
            },
            Pod {
                name: "web-1".to_string(),
                node: None,
                state: PodState::Pending,
                volume: "www".to_string(),
            },
        ];
        report.set_phase(Phase::Attach, PhaseVerdict::success());
        report.set_phase(
            Phase::Mount,
            PhaseVerdict {
                status: PhaseStatus::PartlyFail,
                detail: "pods: [web-1] are still not mounted as desired".to_string(),
                outstanding: vec!["web-1".to_string()],
            },
        );
        report
    }

    #[test]
    fn output_format_default_is_table() {
        let out = OutputFormat::default()
            .to_string(&StatusReport::new("default", "data"))
            .expect("should format");
        assert!(out.starts_with("Claim:"));
    }

    #[test]
    fn report_table_lists_pods_then_phases() {
        let out = OutputFormat::new(Format::Table)
            .to_string(&degraded_report())
            .expect("should format");

        assert!(out.contains("Claim:  shop/data"));
        assert!(out.contains("Volume: pv-1 (handle vol-1)"));
        assert!(out.contains("POD"));
        assert!(out.contains(UNSCHEDULED));

        let pods_at = out.find("POD").expect("pod table");
        let phases_at = out.find("PHASE").expect("phase table");
        assert!(pods_at < phases_at);

        let order: Vec<usize> = ["Provision", "Bind", "Attach", "Mount"]
            .iter()
            .map(|p| out.find(p).expect("phase row"))
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(out.contains("partly fail"));
        assert!(out.contains("pods: [web-1] are still not mounted as desired"));
    }

    #[test]
    fn report_table_columns_are_aligned() {
        let out = OutputFormat::new(Format::Table)
            .to_string(&degraded_report())
            .expect("should format");
        let rows: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("POD") || l.starts_with("web-"))
            .collect();
        assert_eq!(rows.len(), 3);
        let node_col = rows[0].find("NODE").expect("NODE header");
        assert_eq!(rows[1].find("node-a"), Some(node_col));
        assert_eq!(rows[2].find(UNSCHEDULED), Some(node_col));
    }

    #[test]
    fn report_table_without_pods() {
        let out = OutputFormat::new(Format::Table)
            .to_string(&StatusReport::new("default", "data"))
            .expect("should format");
        assert!(out.contains("No pods reference this claim"));
        assert!(out.contains("Volume: <none>"));
        assert_eq!(out.matches("ongoing").count(), 4);
    }

    #[test]
    fn report_json_has_all_phases() {
        let out = OutputFormat::new(Format::Json)
            .to_string(&degraded_report())
            .expect("should format");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");

        assert_eq!(value["claim"], "data");
        assert_eq!(value["namespace"], "shop");
        assert_eq!(value["phases"]["Mount"]["status"], "partly_fail");
        assert_eq!(value["phases"]["Provision"]["status"], "success");
        assert_eq!(value["pods"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn claim_list_table() {
        let list = ClaimList {
            namespace: "shop".to_string(),
            pod: None,
            claims: vec![
                Claim::new("shop", "data")
                    .bound_to("pv-1")
                    .with_storage_class("gp3"),
                Claim::new("shop", "scratch"),
            ],
        };
        let out = OutputFormat::new(Format::Table)
            .to_string(&list)
            .expect("should format");

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("NAME"));
        assert!(lines[0].contains("STORAGECLASS"));
        assert!(lines[1].contains("pv-1") && lines[1].contains("gp3"));
        assert!(lines[2].starts_with("scratch") && lines[2].contains(NONE));
    }

    #[test]
    fn empty_claim_lists() {
        let fmt = OutputFormat::new(Format::Table);
        let ns = ClaimList {
            namespace: "shop".to_string(),
            pod: None,
            claims: Vec::new(),
        };
        assert_eq!(
            fmt.to_string(&ns).expect("format").trim(),
            "No claims in namespace shop"
        );

        let pod = ClaimList {
            pod: Some("web-0".to_string()),
            ..ns
        };
        assert_eq!(fmt.to_string(&pod).expect("format").trim(), "Pod web-0 uses no claims");
    }

    #[test]
    fn claim_list_json_skips_missing_pod() {
        let list = ClaimList {
            namespace: "shop".to_string(),
            pod: None,
            claims: vec![Claim::new("shop", "data")],
        };
        let out = OutputFormat::new(Format::Json).to_string(&list).expect("format");
        let value: serde_json::Value = serde_json::from_str(&out).expect("valid JSON");
        assert!(value.get("pod").is_none());
        assert_eq!(value["claims"][0]["name"], "data");
    }
}
