//! Single writer thread for game logs and bankruptcy records.
//!
//! Worker threads never touch the output files. Each finished game is sent
//! once over a channel and appended here, in completion order.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use indicatif::ProgressBar;

use super::GameResult;
use crate::error::SimulationError;
use crate::events::BankruptcyRecord;

/// Header line of the bankruptcies file.
const BANKRUPTCIES_HEADER: &str = "game\tplayer\tturn";

/// Output of one finished game, as handed to the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    /// Game number.
    pub number: u64,
    /// Narrative text, one line per event (empty when logs are off).
    pub log: String,
    /// Bankruptcies in the order they happened.
    pub bankruptcies: Vec<BankruptcyRecord>,
}

impl GameRecord {
    /// Package a finished game for the writer.
    #[must_use]
    pub fn from_result(result: &GameResult) -> Self {
        Self {
            number: result.number,
            log: result.log.to_text(),
            bankruptcies: result.bankruptcies.clone(),
        }
    }
}

/// Handle to the writer thread.
#[derive(Debug)]
pub struct LogWriter {
    sender: Sender<GameRecord>,
    handle: JoinHandle<io::Result<()>>,
}

impl LogWriter {
    /// Create the output files and start the writer thread.
    ///
    /// `events` is `None` when game logs are not kept; no events file is
    /// created then. The bankruptcies file always gets its header line.
    ///
    /// # Errors
    ///
    /// Returns an error if an output file cannot be created.
    pub fn spawn(
        events: Option<&Path>,
        bankruptcies: &Path,
        progress: Option<ProgressBar>,
    ) -> Result<Self, SimulationError> {
        let events = events
            .map(|path| File::create(path).map(BufWriter::new))
            .transpose()?;
        let mut bankruptcies = BufWriter::new(File::create(bankruptcies)?);
        writeln!(bankruptcies, "{BANKRUPTCIES_HEADER}")?;

        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || write_records(&receiver, events, bankruptcies, progress.as_ref()));
        Ok(Self { sender, handle })
    }

    /// A sender for worker threads.
    #[must_use]
    pub fn sender(&self) -> Sender<GameRecord> {
        self.sender.clone()
    }

    /// Close the channel and wait for everything to be written.
    ///
    /// All senders handed out must be dropped first, or this blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if writing failed or the writer thread panicked.
    pub fn finish(self) -> Result<(), SimulationError> {
        drop(self.sender);
        match self.handle.join() {
            Ok(result) => result.map_err(SimulationError::from),
            Err(_) => Err(SimulationError::WriterPanicked),
        }
    }
}

fn write_records(
    receiver: &Receiver<GameRecord>,
    mut events: Option<BufWriter<File>>,
    mut bankruptcies: BufWriter<File>,
    progress: Option<&ProgressBar>,
) -> io::Result<()> {
    for record in receiver {
        if let Some(events) = events.as_mut() {
            events.write_all(record.log.as_bytes())?;
        }
        for bankruptcy in &record.bankruptcies {
            writeln!(bankruptcies, "{bankruptcy}")?;
        }
        if let Some(progress) = progress {
            progress.inc(1);
        }
    }

    if let Some(events) = events.as_mut() {
        events.flush()?;
    }
    bankruptcies.flush()?;
    if let Some(progress) = progress {
        progress.finish_with_message("done");
    }
    Ok(())
}
