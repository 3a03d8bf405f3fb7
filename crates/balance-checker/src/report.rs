use shared::{AddressResult, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const REPORT_HEADER: &str = "Address | Total Cocoro";

/// Line-oriented report sink. Every row is flushed as soon as it is written.
pub struct ReportWriter<W: Write> {
    inner: W,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) the report file and write the header line
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = Self { inner };
        writer.write_line(REPORT_HEADER)?;
        Ok(writer)
    }

    pub fn write_result(&mut self, result: &AddressResult) -> Result<()> {
        self.write_line(&result.report_row())
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.inner, "{}", line)?;
        self.inner.flush()?;
        Ok(())
    }
}
