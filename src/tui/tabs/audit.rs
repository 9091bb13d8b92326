use crate::audit;
use crate::model::AuditLogResult;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn action_color(action: &str) -> Color {
    match action {
        "UPDATE_MODE" => Color::Blue,
        "UPDATE_EXCEPTIONS" => Color::Yellow,
        "UPDATE_RULES" => Color::Magenta,
        "APPLY_CONFIGURATION" => Color::Green,
        _ => Color::Gray,
    }
}

pub fn render(f: &mut Frame, area: Rect, audit_logs: &Option<AuditLogResult>, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let Some(result) = audit_logs else {
        let loading = Paragraph::new("Loading audit trail...")
            .block(Block::default().borders(Borders::ALL).title("Audit"));
        f.render_widget(loading, area);
        return;
    };

    // Entries arrive newest-first from the backend.
    let items: Vec<ListItem> = result
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let marker = if i == selected { "> " } else { "  " };
            let content = Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    entry.created_at.format("%m-%d %H:%M").to_string(),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:<20}", audit::format_action(&entry.action)),
                    Style::default().fg(action_color(&entry.action)),
                ),
                Span::styled(format!("{:<12}", entry.user), Style::default().fg(Color::Cyan)),
                Span::styled(entry.resource_id.clone(), Style::default().fg(Color::White)),
            ]);
            ListItem::new(content)
        })
        .collect();

    let title = format!(
        "Recent Changes ({} of {}) - [↑/↓] select",
        result.entries.len(),
        result.total
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[0]);

    render_detail(f, chunks[1], result, selected);
}

fn render_detail(f: &mut Frame, area: Rect, result: &AuditLogResult, selected: usize) {
    let content = if let Some(entry) = result.entries.get(selected) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    audit::format_action(&entry.action),
                    Style::default()
                        .fg(action_color(&entry.action))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(entry.resource_type.clone(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::styled("Resource: ", Style::default().fg(Color::Gray)),
                Span::styled(entry.resource_id.clone(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("User: ", Style::default().fg(Color::Gray)),
                Span::styled(entry.user.clone(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(vec![
                Span::styled("At: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
        ];

        if !entry.details.is_empty() {
            lines.push(Line::from(entry.details.clone()));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Before:",
            Style::default().fg(Color::Red),
        )));
        for line in audit::format_value(&entry.old_value).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
        lines.push(Line::from(Span::styled(
            "After:",
            Style::default().fg(Color::Green),
        )));
        for line in audit::format_value(&entry.new_value).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }

        lines
    } else {
        vec![Line::from(Span::styled(
            "No entry selected",
            Style::default().fg(Color::Gray),
        ))]
    };

    let paragraph = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Change Details"));
    f.render_widget(paragraph, area);
}
