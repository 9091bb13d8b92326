use crate::model::LogSearchResult;
use crate::query::{self, LogFilter};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(
    f: &mut Frame,
    area: Rect,
    logs: &Option<LogSearchResult>,
    filter: &LogFilter,
    scroll_offset: usize,
) {
    let Some(result) = logs else {
        let loading = ratatui::widgets::Paragraph::new("Loading logs...")
            .block(Block::default().borders(Borders::ALL).title("Logs"));
        f.render_widget(loading, area);
        return;
    };

    let items: Vec<ListItem> = result
        .entries
        .iter()
        .skip(scroll_offset)
        .take(area.height as usize - 2) // Account for borders
        .map(|entry| {
            let status_color = match entry.status {
                200..=299 => Color::Green,
                300..=399 => Color::Cyan,
                400..=499 => Color::Yellow,
                500..=599 => Color::Red,
                _ => Color::White,
            };

            let rule = entry
                .rule_id
                .as_deref()
                .map(|id| format!(" [{}]", id))
                .unwrap_or_default();

            let content = Line::from(vec![
                Span::styled(
                    entry.timestamp.format("%H:%M:%S").to_string(),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(" "),
                Span::styled(format!("{:4}", entry.status), Style::default().fg(status_color)),
                Span::raw(" "),
                Span::styled(format!("{:6}", entry.method), Style::default().fg(Color::Cyan)),
                Span::raw(" "),
                Span::styled(format!("{:<24}", entry.host), Style::default().fg(Color::White)),
                Span::styled(entry.path.clone(), Style::default().fg(Color::White)),
                Span::styled(rule, Style::default().fg(Color::Red)),
                Span::raw(" "),
                Span::styled(entry.client_ip.clone(), Style::default().fg(Color::Gray)),
            ]);

            ListItem::new(content)
        })
        .collect();

    let title = format!(
        "Logs: {} ({} of {} entries) - [3] blocked only, [c] clear filter",
        query::build_query(filter),
        result.entries.len(),
        result.total
    );

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}
