use std::{io, time::Duration};

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use tracing::info;

use innkeep_core::{ReservationError, ReservationManager};

const TICK_RATE: Duration = Duration::from_millis(250);

const MENU_ITEMS: &[&str] = &[
    "View rooms",
    "Reserve a room",
    "Cancel a booking",
    "View all bookings",
    "View bookings for a room",
    "Quit",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKind {
    Reserve,
    Cancel,
    RoomLookup,
}

#[derive(Debug)]
struct FormField {
    label: &'static str,
    value: String,
}

impl FormField {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }
}

#[derive(Debug)]
struct Form {
    kind: FormKind,
    fields: Vec<FormField>,
    active: usize,
}

impl Form {
    fn new(kind: FormKind) -> Self {
        let fields = match kind {
            FormKind::Reserve => vec![
                FormField::new("Guest name"),
                FormField::new("Room number"),
                FormField::new("Check-in (yyyy-mm-dd)"),
                FormField::new("Check-out (yyyy-mm-dd)"),
            ],
            FormKind::Cancel => vec![FormField::new("Booking id")],
            FormKind::RoomLookup => vec![FormField::new("Room number")],
        };
        Self {
            kind,
            fields,
            active: 0,
        }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Reserve => "Reserve a room",
            FormKind::Cancel => "Cancel a booking",
            FormKind::RoomLookup => "Bookings for a room",
        }
    }

    fn next_field(&mut self) {
        self.active = (self.active + 1) % self.fields.len();
    }

    fn prev_field(&mut self) {
        self.active = (self.active + self.fields.len() - 1) % self.fields.len();
    }

    fn on_last_field(&self) -> bool {
        self.active + 1 == self.fields.len()
    }
}

enum Screen {
    Menu,
    Rooms,
    Bookings { room: Option<u32> },
    Form(Form),
}

struct StatusLine {
    text: String,
    is_error: bool,
}

/// Menu-driven terminal frontend over the reservation manager.
pub struct InnkeepApp {
    manager: ReservationManager,
    screen: Screen,
    menu_state: ListState,
    status: Option<StatusLine>,
    should_quit: bool,
}

impl InnkeepApp {
    pub fn new(manager: ReservationManager) -> Self {
        let mut menu_state = ListState::default();
        menu_state.select(Some(0));
        Self {
            manager,
            screen: Screen::Menu,
            menu_state,
            status: None,
            should_quit: false,
        }
    }

    /// Run the blocking event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match &mut self.screen {
            Screen::Menu => self.handle_menu_key(key.code),
            Screen::Rooms | Screen::Bookings { .. } => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter) {
                    self.screen = Screen::Menu;
                }
            }
            Screen::Form(_) => self.handle_form_key(key.code),
        }
    }

    fn handle_menu_key(&mut self, code: KeyCode) {
        let selected = self.menu_state.selected().unwrap_or(0);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                let previous = (selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
                self.menu_state.select(Some(previous));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_state.select(Some((selected + 1) % MENU_ITEMS.len()));
            }
            KeyCode::Enter => {
                self.status = None;
                match selected {
                    0 => self.screen = Screen::Rooms,
                    1 => self.screen = Screen::Form(Form::new(FormKind::Reserve)),
                    2 => self.screen = Screen::Form(Form::new(FormKind::Cancel)),
                    3 => self.screen = Screen::Bookings { room: None },
                    4 => self.screen = Screen::Form(Form::new(FormKind::RoomLookup)),
                    _ => self.should_quit = true,
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let Screen::Form(form) = &mut self.screen else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.screen = Screen::Menu;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => {
                form.fields[form.active].value.pop();
            }
            KeyCode::Char(ch) => {
                form.fields[form.active].value.push(ch);
            }
            KeyCode::Enter => {
                if form.on_last_field() {
                    self.submit_form();
                } else {
                    form.next_field();
                }
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Screen::Form(form) = &self.screen else {
            return;
        };
        match form.kind {
            FormKind::Reserve => {
                let guest = form.fields[0].value.trim().to_string();
                let room = match parse_room(&form.fields[1].value) {
                    Ok(room) => room,
                    Err(message) => return self.set_error(message),
                };
                let check_in = match parse_date(&form.fields[2].value) {
                    Ok(date) => date,
                    Err(message) => return self.set_error(message),
                };
                let check_out = match parse_date(&form.fields[3].value) {
                    Ok(date) => date,
                    Err(message) => return self.set_error(message),
                };
                match self.manager.reserve(guest, room, check_in, check_out) {
                    Ok(booking) => {
                        info!("reserved via tui: {booking}");
                        self.set_success(format!(
                            "Room {room} booked, booking id {}",
                            booking.booking_id
                        ));
                        self.screen = Screen::Menu;
                    }
                    Err(err) => self.set_error(describe_error(&err)),
                }
            }
            FormKind::Cancel => {
                let booking_id = match form.fields[0].value.trim().parse::<u64>() {
                    Ok(id) => id,
                    Err(_) => return self.set_error("Booking id must be a whole number".into()),
                };
                match self.manager.cancel(booking_id) {
                    Ok(()) => {
                        self.set_success(format!("Booking {booking_id} cancelled"));
                        self.screen = Screen::Menu;
                    }
                    Err(err) => self.set_error(describe_error(&err)),
                }
            }
            FormKind::RoomLookup => match parse_room(&form.fields[0].value) {
                Ok(room) => {
                    self.status = None;
                    self.screen = Screen::Bookings { room: Some(room) };
                }
                Err(message) => self.set_error(message),
            },
        }
    }

    fn set_error(&mut self, text: String) {
        self.status = Some(StatusLine {
            text,
            is_error: true,
        });
    }

    fn set_success(&mut self, text: String) {
        self.status = Some(StatusLine {
            text,
            is_error: false,
        });
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(frame.size());

        match &self.screen {
            Screen::Menu => self.render_menu(frame, chunks[0]),
            Screen::Rooms => self.render_rooms(frame, chunks[0]),
            Screen::Bookings { room } => self.render_bookings(frame, chunks[0], *room),
            Screen::Form(form) => render_form(frame, chunks[0], form),
        }
        self.render_status(frame, chunks[1]);
    }

    fn render_menu(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = MENU_ITEMS
            .iter()
            .map(|item| ListItem::new(Line::from(*item)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" innkeep "))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.menu_state);
    }

    fn render_rooms(&self, frame: &mut Frame, area: Rect) {
        let rooms = self.manager.list_rooms();
        if rooms.is_empty() {
            let empty = Paragraph::new("No rooms available.")
                .block(Block::default().borders(Borders::ALL).title(" Rooms "))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = rooms
            .iter()
            .map(|(room, currently_booked)| {
                Row::new(vec![
                    room.number.to_string(),
                    room.kind.clone(),
                    format!("{:.2}", room.price),
                    if *currently_booked { "yes" } else { "no" }.to_string(),
                ])
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Min(12),
                Constraint::Length(10),
                Constraint::Length(8),
            ],
        )
        .header(
            Row::new(vec!["Number", "Type", "Price", "Booked"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(" Rooms "));
        frame.render_widget(table, area);
    }

    fn render_bookings(&self, frame: &mut Frame, area: Rect, room: Option<u32>) {
        let title = match room {
            Some(number) => format!(" Bookings for room {number} "),
            None => " All bookings ".to_string(),
        };
        let bookings: Vec<String> = match room {
            Some(number) => self
                .manager
                .bookings_for_room(number)
                .iter()
                .map(|booking| booking.to_string())
                .collect(),
            None => self
                .manager
                .all_bookings()
                .iter()
                .map(|booking| booking.to_string())
                .collect(),
        };

        if bookings.is_empty() {
            let empty = Paragraph::new("No bookings.")
                .block(Block::default().borders(Borders::ALL).title(title))
                .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = bookings
            .into_iter()
            .map(|line| ListItem::new(Line::from(line)))
            .collect();
        let list =
            List::new(items).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(list, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match &self.status {
            Some(status) if status.is_error => (
                status.text.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Some(status) => (status.text.as_str(), Style::default().fg(Color::Green)),
            None => (
                "Arrows to move, Enter to select, Esc to go back, q to quit.",
                Style::default().fg(Color::DarkGray),
            ),
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(text, style)))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn render_form(frame: &mut Frame, area: Rect, form: &Form) {
    let mut lines = Vec::with_capacity(form.fields.len() + 2);
    for (index, field) in form.fields.iter().enumerate() {
        let marker = if index == form.active { "> " } else { "  " };
        let style = if index == form.active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}: {}", field.label, field.value),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter to confirm, Tab to switch fields, Esc to cancel.",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", form.title())),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn parse_room(input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| "Room number must be a whole number".to_string())
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    input
        .trim()
        .parse::<NaiveDate>()
        .map_err(|_| format!("'{}' is not a valid date (yyyy-mm-dd)", input.trim()))
}

fn describe_error(err: &ReservationError) -> String {
    match err {
        ReservationError::RoomUnavailable { room_number } => {
            format!("Room {room_number} is not available for the specified dates")
        }
        ReservationError::BookingNotFound { booking_id } => {
            format!("Booking with id {booking_id} not found")
        }
        ReservationError::InvalidDateRange {
            check_in,
            check_out,
        } => format!("Check-in {check_in} must fall before check-out {check_out}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserve_form_carries_four_fields() {
        let form = Form::new(FormKind::Reserve);
        assert_eq!(form.fields.len(), 4);
        assert!(!form.on_last_field());
    }

    #[test]
    fn field_navigation_wraps() {
        let mut form = Form::new(FormKind::Reserve);
        form.prev_field();
        assert!(form.on_last_field());
        form.next_field();
        assert_eq!(form.active, 0);
    }

    #[test]
    fn parsers_reject_garbage() {
        assert!(parse_room("101").is_ok());
        assert!(parse_room("abc").is_err());
        assert!(parse_date("2024-01-10").is_ok());
        assert!(parse_date("10/01/2024").is_err());
    }
}
