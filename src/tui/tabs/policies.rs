use super::mode_color;
use crate::model::WafStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, status: &Option<WafStatus>, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let Some(status) = status else {
        let loading = Paragraph::new("Loading policies...")
            .block(Block::default().borders(Borders::ALL).title("Policies"));
        f.render_widget(loading, area);
        return;
    };

    let mut hosts: Vec<_> = status.host_policies.keys().cloned().collect();
    hosts.sort();

    let items: Vec<ListItem> = hosts
        .iter()
        .enumerate()
        .map(|(i, host)| {
            let policy = &status.host_policies[host];
            let marker = if i == selected { "> " } else { "  " };

            let content = Line::from(vec![
                Span::raw(marker),
                Span::styled(format!("{:<30}", host), Style::default().fg(Color::White)),
                Span::styled(
                    format!("{:<14}", policy.mode.to_string()),
                    Style::default()
                        .fg(mode_color(policy.mode))
                        .add_modifier(if i == selected {
                            Modifier::BOLD
                        } else {
                            Modifier::empty()
                        }),
                ),
                Span::styled(
                    if policy.enable_crs { "CRS" } else { "   " },
                    Style::default().fg(Color::Cyan),
                ),
            ]);
            ListItem::new(content)
        })
        .collect();

    let title = format!(
        "Host Policies ({}) - [↑/↓] select, [m] mode, [a] apply",
        hosts.len()
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[0]);

    render_detail(f, chunks[1], status, hosts.get(selected).map(|s| s.as_str()));
}

fn render_detail(f: &mut Frame, area: Rect, status: &WafStatus, host: Option<&str>) {
    let content = if let Some(policy) = host.and_then(|h| status.host_policies.get(h)) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Host: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    policy.host.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Mode: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    policy.mode.to_string(),
                    Style::default().fg(mode_color(policy.mode)),
                ),
            ]),
            Line::from(vec![
                Span::styled("CRS: ", Style::default().fg(Color::Gray)),
                Span::styled(policy.enable_crs.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Version: ", Style::default().fg(Color::Gray)),
                Span::styled(policy.version.to_string(), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Updated: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    policy
                        .updated_at
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    Style::default().fg(Color::White),
                ),
                Span::raw(" "),
                Span::styled(policy.updated_by.clone(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Exceptions:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
        ];

        for path in &policy.exceptions.paths {
            lines.push(Line::from(format!("  path   {}", path)));
        }
        for method in &policy.exceptions.methods {
            lines.push(Line::from(format!("  method {}", method)));
        }
        for ip in &policy.exceptions.ip_allow {
            lines.push(Line::from(format!("  ip     {}", ip)));
        }
        for (name, value) in &policy.exceptions.headers_allow {
            lines.push(Line::from(format!("  header {}: {}", name, value)));
        }
        if !policy.exceptions.has_entries() && policy.exceptions.headers_allow.is_empty() {
            lines.push(Line::from(Span::styled(
                "  none",
                Style::default().fg(Color::Gray),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Custom rules ({}):", policy.custom_rules.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for rule in &policy.custom_rules {
            let state = if rule.enabled {
                Span::styled("●", Style::default().fg(Color::Green))
            } else {
                Span::styled("○", Style::default().fg(Color::Gray))
            };
            lines.push(Line::from(vec![
                Span::raw("  "),
                state,
                Span::raw(" "),
                Span::styled(format!("{:<24}", rule.name), Style::default().fg(Color::White)),
                Span::styled(rule.rule.clone(), Style::default().fg(Color::Gray)),
            ]));
        }

        lines
    } else {
        vec![Line::from(Span::styled(
            "No policy selected",
            Style::default().fg(Color::Gray),
        ))]
    };

    let paragraph =
        Paragraph::new(content).block(Block::default().borders(Borders::ALL).title("Detail"));
    f.render_widget(paragraph, area);
}
