//! Define the interactive dashboard subcommand
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::services::TerminalDashboard;
use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, info};
use std::io;
use structopt::StructOpt;
use tui::backend::{Backend, CrosstermBackend};
use tui::Terminal;

/// Browse recent readings and daily routes in an interactive terminal dashboard
#[derive(Debug, StructOpt)]
pub struct DashboardOpts {
    /// Title shown at the top of the dashboard
    #[structopt(long, default_value = "GPS TRACKING DASHBOARD")]
    title: String,
}

/// Highlighted entry of the day list, entry 0 is the empty option
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DayPicker {
    cursor: usize,
}

impl DayPicker {
    fn cursor(&self) -> usize {
        self.cursor
    }

    fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn down(&mut self, day_count: usize) {
        if self.cursor < day_count {
            self.cursor += 1;
        }
    }

    /// Move the cursor onto whatever day the dashboard has selected
    fn sync(&mut self, selected: Option<&str>, days: &[String]) {
        self.cursor = selected
            .and_then(|day| days.iter().position(|d| d == day))
            .map_or(0, |i| i + 1);
    }

    fn day<'a>(&self, days: &'a [String]) -> Option<&'a str> {
        match self.cursor {
            0 => None,
            n => days.get(n - 1).map(String::as_str),
        }
    }
}

pub fn dashboard_command(
    config: Config,
    opts: DashboardOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = config.get_reading_source()?;
    let mut dash = Dashboard::new(source, config.recent_limit(), config.days_limit());
    let view = TerminalDashboard::new(opts.title);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // always give the terminal back, even when drawing failed
    let result = run(&mut terminal, &mut dash, &view);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    dash: &mut Dashboard,
    view: &TerminalDashboard,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut picker = DayPicker::default();
    terminal.draw(|f| view.draw(f, dash, 0))?;
    dash.load();
    picker.sync(dash.selected_day(), dash.available_days());

    loop {
        let cursor = picker.cursor();
        terminal.draw(|f| view.draw(f, dash, cursor))?;
        let key = match event::read()? {
            Event::Key(key) => key,
            _ => continue,
        };
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => break,
            KeyCode::Up => picker.up(),
            KeyCode::Down => picker.down(dash.available_days().len()),
            KeyCode::Enter => {
                let day = picker.day(dash.available_days()).map(String::from);
                debug!("Selected day {:?}", day);
                dash.select_day(day.as_deref());
            }
            KeyCode::Char('c') => {
                dash.select_day(None);
                picker.sync(None, dash.available_days());
            }
            KeyCode::Char('r') => {
                dash.refresh();
                picker.sync(dash.selected_day(), dash.available_days());
            }
            _ => {}
        }
    }
    info!("Closing dashboard");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days() -> Vec<String> {
        vec!["2024-01-03".to_string(), "2024-01-02".to_string()]
    }

    #[test]
    fn cursor_stays_within_the_list() {
        let mut picker = DayPicker::default();
        picker.up();
        assert_eq!(picker.cursor(), 0);
        picker.down(2);
        picker.down(2);
        picker.down(2);
        assert_eq!(picker.cursor(), 2);
        assert_eq!(picker.day(&days()), Some("2024-01-02"));
    }

    #[test]
    fn first_entry_is_the_empty_option() {
        let picker = DayPicker::default();
        assert_eq!(picker.day(&days()), None);
    }

    #[test]
    fn sync_follows_the_selected_day() {
        let mut picker = DayPicker::default();
        picker.sync(Some("2024-01-03"), &days());
        assert_eq!(picker.cursor(), 1);
        picker.sync(Some("1999-12-31"), &days());
        assert_eq!(picker.cursor(), 0);
        picker.sync(None, &days());
        assert_eq!(picker.cursor(), 0);
    }
}
