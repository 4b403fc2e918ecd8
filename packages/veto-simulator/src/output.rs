//! Output writers for simulation results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::metrics::VetoMetrics;
use crate::types::OutputFormat;

pub struct OutputWriter {
    writer: BufWriter<File>,
    format: OutputFormat,
    path: PathBuf,
    written: usize,
}

impl OutputWriter {
    pub fn new(output_dir: &str, format: OutputFormat) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");
        let extension = match format {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        };
        let path = dir.join(format!("vetoes_{timestamp}.{extension}"));

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);
        if matches!(format, OutputFormat::Json) {
            writer.write_all(b"[")?;
        }

        Ok(Self {
            writer,
            format,
            path,
            written: 0,
        })
    }

    pub fn write_veto(&mut self, metrics: &VetoMetrics) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(metrics)?;
        match self.format {
            OutputFormat::Jsonl => writeln!(self.writer, "{json}")?,
            OutputFormat::Json => {
                if self.written > 0 {
                    self.writer.write_all(b",")?;
                }
                self.writer.write_all(json.as_bytes())?;
            }
        }
        self.written += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            self.writer.write_all(b"]\n")?;
        }
        self.writer.flush()?;
        Ok(self.path)
    }
}
