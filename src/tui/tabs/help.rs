use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect) {
    let key = |k: &str, desc: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", k), Style::default().fg(Color::Yellow)),
            Span::raw(desc.to_string()),
        ])
    };

    let content = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("q", "Quit"),
        key("Tab", "Next tab"),
        key("Shift+Tab", "Previous tab"),
        key("r", "Refresh current tab"),
        key("↑/↓", "Scroll / select"),
        Line::from(""),
        Line::from(Span::styled(
            "Policies tab",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("m", "Cycle the selected policy's mode (On → DetectionOnly → Off)"),
        key("a", "Apply the selected policy's stored configuration"),
        Line::from(""),
        Line::from(Span::styled(
            "Logs tab",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key("3", "Toggle blocked-requests filter (status 403)"),
        key("c", "Clear all filters"),
        Line::from(""),
        Line::from(Span::styled(
            "Mode changes and applies go straight to the control service;",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "displayed state is always re-fetched from the backend afterwards.",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Help"));

    f.render_widget(paragraph, area);
}
