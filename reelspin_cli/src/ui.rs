//! Terminal rendering of the reel row, spin button and settings overlays.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use reelspin_core::{Millis, ReelPhase, SpinController, MAX_DIGITS, MIN_DIGITS};

const BRASS: Color = Color::Rgb(0xff, 0xb3, 0x00);
const PARCHMENT: Color = Color::Rgb(0xf4, 0xe4, 0xbc);
const WOOD: Color = Color::Rgb(0x3e, 0x27, 0x23);

const REEL_WIDTH: u16 = 7;

pub const HELP_TEXT: &str = "\
Press SPIN (space or enter) to set every reel turning. Each reel stops a \
little after the one to its left, and the row settles on fresh digits.

Settings (s):
  - / +   fewer or more reels (1 to 10, not while spinning)
  m       sound on or off
  h       this help

q or Esc quits.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Settings,
    Help,
}

/// Presentation state that lives outside the controller.
#[derive(Debug, Default)]
pub struct View {
    pub overlay: Overlay,
    /// Where any key in the help overlay leads back to.
    pub help_return: Overlay,
    pub status: Option<String>,
    pub spins: u32,
}

pub fn draw(f: &mut Frame, ctl: &SpinController, view: &View, now: Millis) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(7),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("REELSPIN", Style::default().fg(BRASS).bold()),
        Span::raw("  "),
        Span::styled(
            format!("spins: {}", view.spins),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, chunks[0]);

    draw_reels(f, ctl, now, chunks[1]);
    draw_spin_button(f, ctl.is_spinning(), chunks[2]);

    let footer = view.status.clone().unwrap_or_else(|| {
        let sound = if ctl.settings().sound_enabled { "on" } else { "off" };
        format!("space: spin   s: settings   q: quit   sound: {sound}")
    });
    f.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .fg(Color::DarkGray),
        chunks[3],
    );

    match view.overlay {
        Overlay::None => {}
        Overlay::Settings => draw_settings(f, ctl, area),
        Overlay::Help => draw_help(f, area),
    }
}

fn draw_reels(f: &mut Frame, ctl: &SpinController, now: Millis, area: Rect) {
    let reels = ctl.reels();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(reels.iter().map(|_| Constraint::Length(REEL_WIDTH)))
        .flex(Flex::Center)
        .spacing(1)
        .split(area);

    for (reel, col) in reels.iter().zip(cols.iter()) {
        let style = match reel.phase() {
            ReelPhase::Spinning => Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            ReelPhase::Settling => Style::default().fg(WOOD).bg(PARCHMENT),
            ReelPhase::Idle | ReelPhase::Settled => {
                Style::default().fg(WOOD).bg(PARCHMENT).add_modifier(Modifier::BOLD)
            }
        };
        let digit = reel.display_digit(now);
        let body = Text::from(vec![
            Line::raw(""),
            Line::raw(""),
            Line::styled(digit.to_string(), style),
        ]);
        let block = Block::default()
            .borders(Borders::LEFT | Borders::RIGHT)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(BRASS))
            .style(Style::default().bg(PARCHMENT));
        f.render_widget(
            Paragraph::new(body).alignment(Alignment::Center).block(block),
            *col,
        );
    }
}

fn draw_spin_button(f: &mut Frame, spinning: bool, area: Rect) {
    let (label, style) = if spinning {
        ("⚓", Style::default().fg(Color::DarkGray))
    } else {
        ("SPIN", Style::default().fg(WOOD).bg(BRASS).bold())
    };
    let button = Paragraph::new(Line::styled(format!("  {label}  "), style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    let [slot] = Layout::horizontal([Constraint::Length(14)])
        .flex(Flex::Center)
        .areas(area);
    f.render_widget(button, slot);
}

fn draw_settings(f: &mut Frame, ctl: &SpinController, area: Rect) {
    let settings = ctl.settings();
    let popup = centered(area, 36, 9);
    let lines = vec![
        Line::from(vec![
            Span::raw("Digits   "),
            Span::styled(
                format!("< {:>2} >", settings.digit_count),
                Style::default().fg(BRASS).bold(),
            ),
            Span::styled(
                format!("  ({MIN_DIGITS}-{MAX_DIGITS})"),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::raw("Sound    "),
            Span::styled(
                if settings.sound_enabled { "on" } else { "off" },
                Style::default().fg(BRASS).bold(),
            ),
            Span::styled("  (m)", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(vec![
            Span::raw("Help     "),
            Span::styled("view (h)", Style::default().fg(BRASS)),
        ]),
        Line::raw(""),
        Line::styled("esc to close", Style::default().fg(Color::DarkGray)),
    ];
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Settings ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double),
        ),
        popup,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered(area, 56, 14);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(HELP_TEXT).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" How to play ")
                .borders(Borders::ALL)
                .border_type(BorderType::Double),
        ),
        popup,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
