use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use log::error;

use crate::export::ExportError;
use crate::state::Session;
use crate::ui::table::render_table;

// ---------------------------------------------------------------------------
// Interactive command loop
// ---------------------------------------------------------------------------

const SEARCH_PROMPT: &str = "\nEnter product text to search (or 'exit' to quit): ";
const EXPORT_PROMPT: &str = "Enter a file name for export (e.g. 'output.html'): ";
const DEFAULT_EXPORT_NAME: &str = "output.html";

/// One line of user input, classified.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Export,
    Search(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") {
            Command::Exit
        } else if line.eq_ignore_ascii_case("export") {
            Command::Export
        } else {
            Command::Search(line)
        }
    }
}

/// Normalize an export file name: empty → default, `.html` appended when
/// missing.
pub fn export_file_name(answer: &str) -> PathBuf {
    let answer = answer.trim();
    if answer.is_empty() {
        return PathBuf::from(DEFAULT_EXPORT_NAME);
    }
    if answer.ends_with(".html") {
        PathBuf::from(answer)
    } else {
        PathBuf::from(format!("{answer}.html"))
    }
}

pub struct PriceScoutApp {
    pub session: Session,
}

impl PriceScoutApp {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Report what the startup load produced: one line per skipped file,
    /// then a summary.
    pub fn write_load_summary<W: Write>(&self, mut output: W) -> io::Result<()> {
        let prices = self.session.prices();
        for skipped in prices.skipped_files() {
            writeln!(output, "Skipped {}: {}", skipped.file_name, skipped.reason)?;
        }
        if self.session.has_data() {
            writeln!(
                output,
                "Price lists loaded: {} records from {} files.",
                prices.len(),
                prices.source_files().len()
            )
        } else {
            writeln!(output, "No price lists found.")
        }
    }

    /// Drive the session from `input` until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        loop {
            write!(output, "{SEARCH_PROMPT}")?;
            output.flush()?;

            let Some(line) = read_line(&mut input)? else {
                return Ok(());
            };

            match Command::parse(&line) {
                Command::Exit => return Ok(()),
                Command::Export => {
                    write!(output, "{EXPORT_PROMPT}")?;
                    output.flush()?;
                    let answer = read_line(&mut input)?.unwrap_or_default();
                    self.export(&answer, &mut output)?;
                }
                Command::Search(query) => self.search(query, &mut output)?,
            }
        }
    }

    fn search<W: Write>(&mut self, query: &str, output: &mut W) -> io::Result<()> {
        if !self.session.has_data() {
            writeln!(output, "No data available.")?;
        }
        let hits = self.session.search(query);
        if hits.is_empty() {
            writeln!(output, "No products found.")?;
            return Ok(());
        }

        writeln!(output, "\nFound products:")?;
        write!(output, "{}", render_table(hits))?;
        writeln!(output, "\nType 'export' to save these results as HTML.")
    }

    fn export<W: Write>(&self, answer: &str, output: &mut W) -> io::Result<()> {
        let path = export_file_name(answer);
        if self.session.last_results().is_none() {
            writeln!(output, "No search has been run. Exporting the whole collection.")?;
        }
        match self.session.export(&path) {
            Ok(written) => writeln!(output, "Data exported to {}", written.display()),
            Err(ExportError::NoData) => writeln!(output, "No data available to export."),
            Err(e) => {
                error!("{e}");
                writeln!(output, "Export failed: {e}")
            }
        }
    }
}

/// Read one line without its terminator; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
