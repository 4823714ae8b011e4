use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    input::Control,
    runtime::Scheduler,
    timer::Status,
    view::{ControlView, TimerView},
};

const BUTTON_WIDTH: u16 = 14;
const LIMIT_BUTTON_WIDTH: u16 = 5;
const LIMIT_VALUE_WIDTH: u16 = 8;
const FONT_HEIGHT: usize = 5;

const KEY_HINTS: &str = "tab/←→ move · enter/space press · click · (q)uit";

/// Screen areas of every element, shared by rendering and mouse hit-testing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Regions {
    pub heading: Rect,
    pub time: Rect,
    pub status: Rect,
    pub start_pause: Rect,
    pub reset: Rect,
    pub limit_label: Rect,
    pub decrement: Rect,
    pub limit_value: Rect,
    pub increment: Rect,
    pub hints: Rect,
}

impl Regions {
    pub fn control(&self, control: Control) -> Rect {
        match control {
            Control::StartPause => self.start_pause,
            Control::Reset => self.reset,
            Control::Decrement => self.decrement,
            Control::Increment => self.increment,
        }
    }

    pub fn control_at(&self, column: u16, row: u16) -> Option<Control> {
        let pos = Position::new(column, row);
        Control::ALL
            .into_iter()
            .find(|c| self.control(*c).contains(pos))
    }
}

pub fn layout(area: Rect, key_hints: bool) -> Regions {
    let [heading, _, time, status, _, controls, _, limit_label, limit_row, _, hints] =
        Layout::vertical([
            Constraint::Length(1), // heading
            Constraint::Length(1),
            Constraint::Length(FONT_HEIGHT as u16), // remaining time
            Constraint::Length(1),                  // status
            Constraint::Length(1),
            Constraint::Length(3), // start/pause + reset
            Constraint::Length(1),
            Constraint::Length(1), // limit label
            Constraint::Length(3), // - value +
            Constraint::Length(1),
            Constraint::Length(if key_hints { 1 } else { 0 }),
        ])
        .flex(Flex::Center)
        .areas(area);

    let [start_pause, reset] = Layout::horizontal([Constraint::Length(BUTTON_WIDTH); 2])
        .flex(Flex::Center)
        .spacing(2)
        .areas(controls);

    let [decrement, limit_value, increment] = Layout::horizontal([
        Constraint::Length(LIMIT_BUTTON_WIDTH),
        Constraint::Length(LIMIT_VALUE_WIDTH),
        Constraint::Length(LIMIT_BUTTON_WIDTH),
    ])
    .flex(Flex::Center)
    .spacing(1)
    .areas(limit_row);

    Regions {
        heading,
        time,
        status,
        start_pause,
        reset,
        limit_label,
        decrement,
        limit_value,
        increment,
        hints,
    }
}

fn glyph(c: char) -> Option<[&'static str; FONT_HEIGHT]> {
    let rows = match c {
        '0' => ["███", "█ █", "█ █", "█ █", "███"],
        '1' => ["  █", "  █", "  █", "  █", "  █"],
        '2' => ["███", "  █", "███", "█  ", "███"],
        '3' => ["███", "  █", "███", "  █", "███"],
        '4' => ["█ █", "█ █", "███", "  █", "  █"],
        '5' => ["███", "█  ", "███", "  █", "███"],
        '6' => ["███", "█  ", "███", "█ █", "███"],
        '7' => ["███", "  █", "  █", "  █", "  █"],
        '8' => ["███", "█ █", "███", "█ █", "███"],
        '9' => ["███", "█ █", "███", "  █", "███"],
        ':' => [" ", "█", " ", "█", " "],
        _ => return None,
    };
    Some(rows)
}

/// Renders `text` in a five-row block font. None if a character has no glyph.
pub fn big_text(text: &str) -> Option<Vec<String>> {
    let glyphs = text.chars().map(glyph).collect::<Option<Vec<_>>>()?;
    Some(
        (0..FONT_HEIGHT)
            .map(|row| glyphs.iter().map(|g| g[row]).join(" "))
            .collect(),
    )
}

fn render_time(time: &str, style: Style, area: Rect, buf: &mut Buffer) {
    let lines = match big_text(time) {
        Some(rows) if rows.iter().all(|r| r.width() <= area.width as usize) => rows
            .into_iter()
            .map(|r| Line::from(Span::styled(r, style)))
            .collect(),
        // too narrow for the block font
        _ => {
            let mut lines = vec![Line::default(); FONT_HEIGHT / 2];
            lines.push(Line::from(Span::styled(time.to_string(), style)));
            lines
        }
    };

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_button(text: String, enabled: bool, focused: bool, area: Rect, buf: &mut Buffer) {
    let (border_style, text_style) = match (enabled, focused) {
        (false, _) => {
            let dim = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM);
            (dim, dim)
        }
        (true, true) => (
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        (true, false) => (Style::default(), Style::default()),
    };

    Paragraph::new(Span::styled(text, text_style))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn control_text(control: &ControlView) -> String {
    format!("{} {}", control.icon.glyph(), control.label)
}

impl<S: Scheduler> Widget for &App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = TimerView::from(self.widget().state());
        let regions = layout(area, self.settings().key_hints);
        let focused = self.focus().current();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        Paragraph::new(Span::styled(view.heading, bold_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(regions.heading, buf);

        let status_color = match view.status {
            Status::Running => Color::Green,
            Status::Paused => Color::Yellow,
        };
        render_time(&view.time, bold_style, regions.time, buf);
        Paragraph::new(Span::styled(
            view.status.to_string(),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(regions.status, buf);

        render_button(
            control_text(&view.start_pause),
            true,
            focused == Control::StartPause,
            regions.start_pause,
            buf,
        );
        render_button(
            control_text(&view.reset),
            true,
            focused == Control::Reset,
            regions.reset,
            buf,
        );

        Paragraph::new(Span::styled(view.limit.label, dim_style))
            .alignment(Alignment::Center)
            .render(regions.limit_label, buf);

        let enabled = view.limit.enabled;
        render_button(
            view.limit.decrement.to_string(),
            enabled,
            enabled && focused == Control::Decrement,
            regions.decrement,
            buf,
        );
        Paragraph::new(Span::styled(view.limit.value.to_string(), bold_style))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(regions.limit_value, buf);
        render_button(
            view.limit.increment.to_string(),
            enabled,
            enabled && focused == Control::Increment,
            regions.increment,
            buf,
        );

        if self.settings().key_hints {
            Paragraph::new(Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::ITALIC),
            ))
            .alignment(Alignment::Center)
            .render(regions.hints, buf);
        }
    }
}
