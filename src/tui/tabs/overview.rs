use super::mode_color;
use crate::model::{MetricsSummary, WafStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    f: &mut Frame,
    area: Rect,
    status: &Option<WafStatus>,
    metrics: &Option<MetricsSummary>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Protection summary
            Constraint::Length(7), // Traffic counters
            Constraint::Min(0),    // Top offenders
        ])
        .split(area);

    render_protection_summary(f, chunks[0], status);
    render_traffic_counters(f, chunks[1], metrics);
    render_top_tables(f, chunks[2], metrics);
}

fn render_protection_summary(f: &mut Frame, area: Rect, status: &Option<WafStatus>) {
    let content = if let Some(status) = status {
        let enforcing = status
            .host_policies
            .values()
            .filter(|p| p.mode == crate::model::WafMode::On)
            .count();

        vec![
            Line::from(vec![
                Span::styled("Global mode: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    status.global_policy.mode.to_string(),
                    Style::default()
                        .fg(mode_color(status.global_policy.mode))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("CRS enabled: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    status.global_policy.enable_crs.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Host policies: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} ({} enforcing)", status.host_policies.len(), enforcing),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::from(vec![
                Span::styled("Snippet annotations: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    if status.controller_config.allow_snippet_annotations {
                        "allowed"
                    } else {
                        "disallowed"
                    },
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(vec![
                Span::styled("Last updated: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    status
                        .last_updated
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    Style::default().fg(Color::White),
                ),
            ]),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Loading protection status...",
            Style::default().fg(Color::Yellow),
        ))]
    };

    let paragraph =
        Paragraph::new(content).block(Block::default().borders(Borders::ALL).title("Protection"));

    f.render_widget(paragraph, area);
}

fn render_traffic_counters(f: &mut Frame, area: Rect, metrics: &Option<MetricsSummary>) {
    let content = if let Some(metrics) = metrics {
        vec![
            Line::from(vec![
                Span::styled("Total requests: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_number(metrics.total_requests),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("4xx: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_number(metrics.status_4xx),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw("   "),
                Span::styled("5xx: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_number(metrics.status_5xx),
                    Style::default().fg(Color::Red),
                ),
                Span::raw("   "),
                Span::styled("403: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_number(metrics.status_403),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(vec![
                Span::styled("WAF blocked: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format_number(metrics.waf_blocked),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Loading metrics...",
            Style::default().fg(Color::Yellow),
        ))]
    };

    let paragraph =
        Paragraph::new(content).block(Block::default().borders(Borders::ALL).title("Traffic"));

    f.render_widget(paragraph, area);
}

fn render_top_tables(f: &mut Frame, area: Rect, metrics: &Option<MetricsSummary>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let hosts_content = if let Some(metrics) = metrics {
        metrics
            .top_hosts
            .iter()
            .map(|h| {
                Line::from(vec![
                    Span::styled(format!("{:<28}", h.host), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>8} reqs", format_number(h.requests)),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{:>6} blocked", format_number(h.blocked)),
                        Style::default().fg(Color::Red),
                    ),
                ])
            })
            .collect()
    } else {
        vec![Line::from("Loading...")]
    };

    let rules_content = if let Some(metrics) = metrics {
        metrics
            .top_rule_ids
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("{:<12}", r.rule_id), Style::default().fg(Color::Cyan)),
                    Span::styled(format!("{:<24}", r.rule_name), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("{:>6}", format_number(r.count)),
                        Style::default().fg(Color::Yellow),
                    ),
                ])
            })
            .collect()
    } else {
        vec![Line::from("Loading...")]
    };

    let hosts = Paragraph::new(hosts_content)
        .block(Block::default().borders(Borders::ALL).title("Top Hosts"));
    let rules = Paragraph::new(rules_content)
        .block(Block::default().borders(Borders::ALL).title("Top Rules"));

    f.render_widget(hosts, chunks[0]);
    f.render_widget(rules, chunks[1]);
}

fn format_number(num: i64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}
