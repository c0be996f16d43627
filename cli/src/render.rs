use std::fmt::Write as _;
use std::io::{self, Write};

use minefield_core::*;
use serde::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn format_for_counter(num: i64) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

const fn face(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted | Phase::InProgress => ":)",
        Phase::Won => "B)",
        Phase::Lost => "X(",
    }
}

const fn cell_char(cell: CellView) -> char {
    use CellView::*;
    match cell {
        Hidden => '#',
        Flagged | AutoFlag => 'F',
        Revealed(0) => '.',
        Revealed(count) => (b'0' + count) as char,
        Exploded => 'X',
        Mine => '*',
        WrongFlag => '!',
    }
}

pub(crate) fn render_board(view: &BoardView) -> String {
    let (rows, cols) = view.size;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}] {} [{}]",
        format_for_counter(view.mines_left),
        face(view.phase),
        format_for_counter(i64::from(view.elapsed_seconds))
    );

    out.push_str("   ");
    for col in 0..cols {
        let _ = write!(out, "{:>3}", col);
    }
    out.push('\n');

    for row in 0..rows {
        let _ = write!(out, "{:>3}", row);
        for col in 0..cols {
            let _ = write!(out, "{:>3}", cell_char(view.cell_at((row, col))));
        }
        out.push('\n');
    }

    out
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<&'a GameEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cells: Vec<(Coord2, CellView)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<BoardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Renders engine notifications to a writer.
///
/// Write failures cannot travel back through [`Notify`], so the first one is kept until [`Presenter::take_error`].
#[derive(Debug)]
pub(crate) struct Presenter<W> {
    out: W,
    format: OutputFormat,
    error: Option<io::Error>,
}

impl<W: Write> Presenter<W> {
    pub(crate) fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            error: None,
        }
    }

    pub(crate) fn take_error(&mut self) -> io::Result<()> {
        self.error.take().map_or(Ok(()), Err)
    }

    pub(crate) fn show(&mut self, session: &Session) {
        let result = match self.format {
            OutputFormat::Text => self.write_board(session),
            OutputFormat::Json => self.write_json(&JsonRecord {
                event: None,
                cells: Vec::new(),
                board: Some(BoardView::from_session(session)),
                error: None,
            }),
        };
        self.record(result);
    }

    /// Free-form line for the player, dropped in JSON mode.
    pub(crate) fn message(&mut self, text: &str) {
        if self.format == OutputFormat::Text {
            let result = writeln!(self.out, "{}", text.trim_end());
            self.record(result);
        }
    }

    /// Rejected command; JSON clients get an `error` record.
    pub(crate) fn error(&mut self, text: &str) {
        let text = text.trim_end();
        let result = match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", text),
            OutputFormat::Json => self.write_json(&JsonRecord {
                event: None,
                cells: Vec::new(),
                board: None,
                error: Some(text),
            }),
        };
        self.record(result);
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            log::error!("Could not write output: {}", err);
            self.error.get_or_insert(err);
        }
    }

    fn write_board(&mut self, session: &Session) -> io::Result<()> {
        self.out
            .write_all(render_board(&BoardView::from_session(session)).as_bytes())?;
        self.out.flush()
    }

    fn write_text(&mut self, session: &Session, event: &GameEvent) -> io::Result<()> {
        match event {
            GameEvent::NewGame { config, seed } => {
                writeln!(
                    self.out,
                    "New game: {}x{}, {} mines (seed {})",
                    config.rows, config.cols, config.mines, seed
                )?;
                self.write_board(session)
            }
            GameEvent::CellsChanged(_) => self.write_board(session),
            GameEvent::Ended(ending) => {
                writeln!(self.out, "{}", ending.message())?;
                self.out.flush()
            }
            GameEvent::MinesLeft(_) | GameEvent::Tick(_) | GameEvent::PhaseChanged(_) => Ok(()),
        }
    }

    fn write_json(&mut self, record: &JsonRecord<'_>) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write> Notify for Presenter<W> {
    fn notify(&mut self, session: &Session, event: &GameEvent) {
        let result = match self.format {
            OutputFormat::Text => self.write_text(session, event),
            OutputFormat::Json => {
                let cells = match event {
                    GameEvent::CellsChanged(changed) => changed
                        .iter()
                        .filter_map(|&coords| Some((coords, session.cell_view(coords).ok()?)))
                        .collect(),
                    _ => Vec::new(),
                };
                let board = matches!(event, GameEvent::Ended(_))
                    .then(|| BoardView::from_session(session));
                self.write_json(&JsonRecord {
                    event: Some(event),
                    cells,
                    board,
                    error: None,
                })
            }
        };
        self.record(result);
    }
}
