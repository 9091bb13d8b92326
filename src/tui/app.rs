use crate::client::WafBackend;
use crate::config::Config;
use crate::model::{ApplyStrategy, PolicyDraft, TimeRange};
use crate::policy::PolicySequencer;
use crate::query::{self, LogFilter};
use crate::store::AppStore;
use anyhow::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;

pub const TAB_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected(String), // Error message
}

pub struct App {
    pub backend: Arc<dyn WafBackend>,
    pub store: Arc<AppStore>,
    pub sequencer: PolicySequencer,
    pub current_tab: usize,
    pub scroll_offset: usize,
    pub log_filter: LogFilter,
    pub refresh_interval: Duration,
    pub connection_status: ConnectionStatus,
    pub status_message: Option<String>,
    time_range_hours: i64,
    page_size: usize,
}

impl App {
    pub fn new(
        backend: Arc<dyn WafBackend>,
        store: Arc<AppStore>,
        sequencer: PolicySequencer,
        config: &Config,
    ) -> Self {
        Self {
            backend,
            store,
            sequencer,
            current_tab: 0,
            scroll_offset: 0,
            log_filter: LogFilter::default(),
            refresh_interval: Duration::from_secs(config.console.refresh_interval_secs.max(1)),
            connection_status: ConnectionStatus::Connecting,
            status_message: None,
            time_range_hours: config.console.default_time_range_hours,
            page_size: config.console.page_size,
        }
    }

    pub fn next_tab(&mut self) {
        self.current_tab = (self.current_tab + 1) % TAB_COUNT;
        self.scroll_offset = 0;
    }

    pub fn previous_tab(&mut self) {
        if self.current_tab > 0 {
            self.current_tab -= 1;
        } else {
            self.current_tab = TAB_COUNT - 1;
        }
        self.scroll_offset = 0;
    }

    pub fn scroll_up(&mut self) {
        if self.scroll_offset > 0 {
            self.scroll_offset -= 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset += 1;
    }

    /// Hosts in the order the Policies tab lists them.
    pub fn sorted_hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self
            .store
            .status()
            .map(|status| status.host_policies.keys().cloned().collect())
            .unwrap_or_default();
        hosts.sort();
        hosts
    }

    fn selected_host(&self) -> Option<String> {
        self.sorted_hosts().get(self.scroll_offset).cloned()
    }

    /// Fetch whatever the current tab displays. Status backs both the
    /// Overview and Policies tabs, so it is refreshed on every pass.
    pub async fn refresh(&mut self) -> Result<()> {
        self.status_message = None;

        match self.current_tab {
            0 => {
                // Status and metrics land independently, like the two
                // dashboard fetches they replace.
                let range = TimeRange::last_hours(self.time_range_hours);
                futures::join!(
                    self.store.fetch_status(self.backend.as_ref()),
                    self.store.fetch_metrics(self.backend.as_ref(), &range),
                );
            }
            2 => {
                self.store.fetch_status(self.backend.as_ref()).await;
                self.search_logs().await;
            }
            3 => {
                self.store.fetch_status(self.backend.as_ref()).await;
                self.store
                    .fetch_audit_logs(self.backend.as_ref(), self.page_size, 0)
                    .await;
            }
            _ => {
                self.store.fetch_status(self.backend.as_ref()).await;
            }
        }

        self.connection_status = match self.store.error() {
            None => ConnectionStatus::Connected,
            Some(error) => ConnectionStatus::Disconnected(error),
        };

        Ok(())
    }

    async fn search_logs(&self) {
        let range = TimeRange::last_hours(self.time_range_hours);
        let log_query = query::to_log_query(&self.log_filter, range, self.page_size, 0);
        self.store.search_logs(self.backend.as_ref(), &log_query).await;
    }

    /// Cycle the selected policy's mode and save through the sequencer.
    pub async fn cycle_mode(&mut self) -> Result<()> {
        if self.current_tab != 1 {
            return Ok(());
        }
        let Some(host) = self.selected_host() else {
            self.status_message = Some("✗ No policy selected".to_string());
            return Ok(());
        };
        let Some(policy) = self
            .store
            .status()
            .and_then(|status| status.host_policies.get(&host).cloned())
        else {
            return Ok(());
        };

        let mut draft = PolicyDraft::from_policy(&policy);
        draft.mode = draft.mode.next();
        let mode = draft.mode;

        match self.sequencer.update(&draft).await {
            Ok(()) => {
                self.status_message = Some(format!("✓ {} mode set to {}", host, mode));
            }
            Err(e) => {
                self.status_message = Some(format!("✗ {}", e));
            }
        }
        Ok(())
    }

    /// Apply the selected policy's stored configuration.
    pub async fn apply_selected(&mut self) -> Result<()> {
        if self.current_tab != 1 {
            return Ok(());
        }
        let Some(host) = self.selected_host() else {
            self.status_message = Some("✗ No policy selected".to_string());
            return Ok(());
        };

        match self.sequencer.apply(&host, ApplyStrategy::Annotation).await {
            Ok(()) => {
                self.status_message = Some(format!("✓ Configuration applied for {}", host));
            }
            Err(e) => {
                self.status_message = Some(format!("✗ {}", e));
            }
        }
        Ok(())
    }

    /// Narrow the Logs tab to blocked (403) requests, or widen it back.
    pub async fn toggle_blocked_filter(&mut self) -> Result<()> {
        if self.current_tab != 2 {
            return Ok(());
        }
        if self.log_filter.status == "403" {
            self.log_filter.status.clear();
        } else {
            self.log_filter.status = "403".to_string();
        }
        self.search_logs().await;
        Ok(())
    }

    pub async fn clear_filter(&mut self) -> Result<()> {
        if self.current_tab != 2 {
            return Ok(());
        }
        self.log_filter = LogFilter::default();
        self.search_logs().await;
        Ok(())
    }

    pub fn render(&mut self, f: &mut Frame) {
        use ratatui::style::{Color, Style};
        use ratatui::widgets::{Block, Borders, Paragraph};

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints(
                [
                    Constraint::Length(3), // Tab bar
                    Constraint::Min(0),    // Content
                    Constraint::Length(if self.status_message.is_some() { 3 } else { 0 }),
                ]
                .as_ref(),
            )
            .split(f.size());

        super::tabs::render_tab_bar(f, chunks[0], self.current_tab, &self.connection_status);

        match self.current_tab {
            0 => super::tabs::overview::render(
                f,
                chunks[1],
                &self.store.status(),
                &self.store.metrics(),
            ),
            1 => super::tabs::policies::render(
                f,
                chunks[1],
                &self.store.status(),
                self.scroll_offset,
            ),
            2 => super::tabs::logs::render(
                f,
                chunks[1],
                &self.store.logs(),
                &self.log_filter,
                self.scroll_offset,
            ),
            3 => super::tabs::audit::render(
                f,
                chunks[1],
                &self.store.audit_logs(),
                self.scroll_offset,
            ),
            4 => super::tabs::help::render(f, chunks[1]),
            _ => {}
        }

        if let Some(ref status_msg) = self.status_message {
            let status_color = if status_msg.starts_with('✓') {
                Color::Green
            } else {
                Color::Red
            };

            let status_widget = Paragraph::new(status_msg.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(status_color))
                        .title("Status"),
                )
                .style(Style::default().fg(status_color));

            f.render_widget(status_widget, chunks[2]);
        }
    }
}
