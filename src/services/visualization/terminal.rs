//! Use the tui crate to draw the dashboard and route maps on the terminal
use super::{day_options, metrics_line, route_segments, table_cells, OSM_ATTRIBUTION};
use crate::dashboard::Dashboard;
use crate::map::MapView;
use std::io;
use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Span, Spans},
    widgets::canvas::{Canvas, Line, Map, MapResolution, Points},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};

/// Lays out the map, day picker, metrics, error banner and readings table
#[derive(Debug)]
pub struct TerminalDashboard {
    title: String,
}

impl TerminalDashboard {
    pub fn new(title: String) -> Self {
        TerminalDashboard { title }
    }

    /// Draw a full frame. `cursor` is the highlighted entry in the day picker, 0 being the
    /// empty option.
    pub fn draw<B: Backend>(&self, f: &mut Frame<B>, dash: &Dashboard, cursor: usize) {
        let banner_height = if dash.error_message().is_empty() { 0 } else { 3 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(1),
                Constraint::Length(banner_height),
                Constraint::Min(10),
                Constraint::Length(1),
            ])
            .split(f.size());

        let title = Paragraph::new(Span::styled(
            self.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        f.render_widget(title, rows[0]);

        if !dash.error_message().is_empty() {
            let banner = Paragraph::new(Spans::from(vec![
                Span::styled("Error: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(dash.error_message()),
            ]))
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
            f.render_widget(banner, rows[1]);
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(8), Constraint::Min(5), Constraint::Length(1)])
            .split(columns[0]);

        self.draw_day_picker(f, left[0], dash, cursor);
        draw_map(f, left[1], dash.map(), "Route map");
        f.render_widget(Paragraph::new(metrics_line(dash.metrics())), left[2]);
        self.draw_readings_table(f, columns[1], dash);

        let help = Paragraph::new(
            "↑/↓ move  enter select day  c clear  r refresh table  q quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, rows[3]);
    }

    fn draw_day_picker<B: Backend>(
        &self,
        f: &mut Frame<B>,
        area: Rect,
        dash: &Dashboard,
        cursor: usize,
    ) {
        let selected = dash.selected_day();
        let items: Vec<ListItem> = day_options(dash.available_days())
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let is_selected = match selected {
                    Some(day) => i > 0 && day == label,
                    None => i == 0,
                };
                let style = if is_selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(label.to_string(), style))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Day"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(cursor));
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_readings_table<B: Backend>(&self, f: &mut Frame<B>, area: Rect, dash: &Dashboard) {
        let header = Row::new(vec!["ID", "Lat", "Lon", "Alt", "read_at"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row> = if dash.rows().is_empty() {
            vec![Row::new(vec![Cell::from("No data yet…")])]
        } else {
            dash.rows()
                .iter()
                .map(|r| Row::new(table_cells(r).to_vec()))
                .collect()
        };
        let widths = [
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Min(20),
        ];
        let table = Table::new(rows)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Recent readings"),
            )
            .widths(&widths);
        f.render_widget(table, area);
    }
}

/// Draw the map view's route on a canvas bounded by its viewport
pub fn draw_map<B: Backend>(f: &mut Frame<B>, area: Rect, map: &MapView, title: &str) {
    let bounds = map.viewport().bounds();
    let segments = route_segments(map);
    let markers: Vec<(f64, f64, Color)> = map
        .markers()
        .iter()
        .map(|m| {
            let color = if m.label() == "Start" {
                Color::Green
            } else {
                Color::Red
            };
            (m.longitude(), m.latitude(), color)
        })
        .collect();
    let title = format!("{} ({})", title, OSM_ATTRIBUTION);

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .marker(symbols::Marker::Braille)
        .x_bounds([bounds.west, bounds.east])
        .y_bounds([bounds.south, bounds.north])
        .paint(|ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            for &(x1, y1, x2, y2) in &segments {
                ctx.draw(&Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    color: Color::Cyan,
                });
            }
            for &(x, y, color) in &markers {
                ctx.draw(&Points {
                    coords: &[(x, y)],
                    color,
                });
            }
        });
    f.render_widget(canvas, area);
}

/// Draw a single route map and footer on the terminal and leave it there
pub fn plot_route(map: &MapView, title: &str, footer: &str) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.clear()?;
    terminal.draw(|f| {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(vec![Constraint::Min(5), Constraint::Length(1)])
            .split(f.size());
        draw_map(f, chunks[0], map, title);
        f.render_widget(Paragraph::new(footer), chunks[1]);
    })?;

    Ok(())
}
