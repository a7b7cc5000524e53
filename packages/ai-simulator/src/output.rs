//! Output writers for simulation results.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::metrics::{CsvSummaryRow, GameMetrics};
use crate::types::OutputFormat;

pub struct OutputWriter {
    jsonl: Option<Box<dyn Write + Send>>,
    csv: csv::Writer<BufWriter<File>>,
    jsonl_path: Option<PathBuf>,
    csv_path: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: &str, format: &OutputFormat, compress: bool) -> Result<Self, Box<dyn Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let stamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let (jsonl, jsonl_path) = match format {
            OutputFormat::Jsonl => {
                let path = dir.join(format!("simulation_{stamp}.jsonl"));
                if compress {
                    let gz_path = path.with_extension("jsonl.gz");
                    let writer: Box<dyn Write + Send> = Box::new(BufWriter::new(GzEncoder::new(
                        File::create(&gz_path)?,
                        Compression::default(),
                    )));
                    (Some(writer), Some(gz_path))
                } else {
                    let writer: Box<dyn Write + Send> =
                        Box::new(BufWriter::new(create_truncated(&path)?));
                    (Some(writer), Some(path))
                }
            }
            OutputFormat::Csv => (None, None),
        };

        let csv_path = dir.join(format!("simulation_{stamp}_summary.csv"));
        let csv = csv::Writer::from_writer(BufWriter::new(create_truncated(&csv_path)?));

        Ok(Self {
            jsonl,
            csv,
            jsonl_path,
            csv_path,
        })
    }

    pub fn write_game(&mut self, metrics: &GameMetrics) -> Result<(), Box<dyn Error>> {
        if let Some(writer) = self.jsonl.as_mut() {
            writeln!(writer, "{}", serde_json::to_string(metrics)?)?;
        }
        self.csv.serialize(CsvSummaryRow::from(metrics))?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Box<dyn Error>> {
        if let Some(writer) = self.jsonl.as_mut() {
            writer.flush()?;
        }
        self.csv.flush()?;
        Ok(())
    }

    pub fn output_paths(&self) -> (Option<&PathBuf>, &PathBuf) {
        (self.jsonl_path.as_ref(), &self.csv_path)
    }
}

fn create_truncated(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}
