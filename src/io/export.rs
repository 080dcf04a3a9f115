//! CSV export of the sample history.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::sim::types::Sample;

/// Column header of the exported document.
pub const HEADER: &str = "Time,Voltage(V),Current(mA),Power(mW)";

/// File name offered for the export.
pub const EXPORT_FILE_NAME: &str = "energy_simulation_data.csv";

/// MIME type of the export.
pub const EXPORT_MIME: &str = "text/csv";

/// Renders samples as the CSV document.
///
/// The header line always ends in `\n`; data rows are joined by `\n` with no
/// trailing terminator. Numbers use their shortest round-trip form (`0`,
/// `3.3`, `10.89`).
///
/// # Errors
///
/// Returns [`Error::Csv`] if encoding fails.
///
/// # Examples
///
/// ```
/// use pi_energy_sim::io::export::to_csv_string;
/// use pi_energy_sim::sim::Sample;
///
/// let rows = [Sample { time: 0.0, voltage: 3.3, current_ma: 3.3, power_mw: 10.89 }];
/// let csv = to_csv_string(&rows).unwrap();
/// assert_eq!(csv, "Time,Voltage(V),Current(mA),Power(mW)\n0,3.3,3.3,10.89");
/// ```
pub fn to_csv_string<'a>(samples: impl IntoIterator<Item = &'a Sample>) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    wtr.write_record(HEADER.split(','))?;

    let mut rows = 0usize;
    for s in samples {
        wtr.write_record(&[
            s.time.to_string(),
            s.voltage.to_string(),
            s.current_ma.to_string(),
            s.power_mw.to_string(),
        ])?;
        rows += 1;
    }

    let mut bytes = wtr.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    if rows > 0 {
        // Rows are joined, not terminated.
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|e| Error::Io(std::io::Error::other(e)))
}

/// Writes the CSV document to any writer.
///
/// # Errors
///
/// Returns [`Error::Csv`] or [`Error::Io`] if encoding or writing fails.
pub fn write_csv<'a>(
    samples: impl IntoIterator<Item = &'a Sample>,
    mut writer: impl Write,
) -> Result<()> {
    let doc = to_csv_string(samples)?;
    writer.write_all(doc.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Saves the CSV document to `path`.
///
/// # Errors
///
/// Returns [`Error::Export`] when the file cannot be written. Callers surface
/// this as a non-fatal notification; no simulation state is involved.
pub fn export_csv<'a>(samples: impl IntoIterator<Item = &'a Sample>, path: &Path) -> Result<usize> {
    let samples: Vec<&Sample> = samples.into_iter().collect();
    let doc = to_csv_string(samples.iter().copied())?;
    match fs::write(path, doc) {
        Ok(()) => {
            info!(path = %path.display(), rows = samples.len(), "history exported");
            Ok(samples.len())
        }
        Err(source) => {
            warn!(path = %path.display(), error = %source, "export failed");
            Err(Error::Export {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
