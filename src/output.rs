//! Where decoded output goes: stdout, or a file named on the command line.

use crate::error::MetarError;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens the output sink. `None` writes to stdout; a path is created or
/// truncated.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, MetarError> {
    match path {
        None => Ok(Box::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| MetarError::OutputCreate(path.to_path_buf(), e))?;
            info!("Writing output to {}", path.display());
            Ok(Box::new(BufWriter::new(file)))
        }
    }
}
