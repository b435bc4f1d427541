//! App state and main loop: input handling, push signals, applying fetches, and drawing.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::events::EventBus;
use crate::http::{DashboardSource, HttpBackend};
use crate::push::{self, PushConfig, PushEvent};
use crate::ui::{
    chart::draw_metrics_chart,
    chat::draw_chat,
    header::draw_header,
    logs::draw_logs,
    processes::{clamp_offset, draw_processes, processes_handle_key, viewport_rows},
};

const TICK: Duration = Duration::from_millis(50);

pub struct App<S> {
    dashboard: Dashboard<S>,
    bus: EventBus,
    backend_label: String,
    push_live: bool,
    should_quit: bool,

    pub procs_scroll_offset: usize,
    last_procs_area: Option<Rect>,
}

impl<S: DashboardSource> App<S> {
    pub fn new(dashboard: Dashboard<S>, backend_label: String) -> Self {
        let mut bus = EventBus::new();
        dashboard.subscribe(&mut bus);
        Self {
            dashboard,
            bus,
            backend_label,
            push_live: false,
            should_quit: false,
            procs_scroll_offset: 0,
            last_procs_area: None,
        }
    }

    /// Key handling. Printable characters go to the prompt input.
    pub fn handle_key(&mut self, k: KeyEvent) {
        if k.kind != KeyEventKind::Press {
            return;
        }
        if k.code == KeyCode::Esc
            || (k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        if let Some(p_area) = self.last_procs_area {
            let total = self.dashboard.view().processes.rows.len();
            if processes_handle_key(&mut self.procs_scroll_offset, k, viewport_rows(p_area), total) {
                return;
            }
        }

        match k.code {
            KeyCode::Enter => self.dashboard.submit_prompt(),
            KeyCode::Backspace => self.dashboard.view_mut().chat.backspace(),
            KeyCode::Char(c) => self.dashboard.view_mut().chat.type_char(c),
            _ => {}
        }
    }

    pub fn handle_push(&mut self, ev: PushEvent) {
        match ev {
            PushEvent::Connected => self.push_live = true,
            PushEvent::Disconnected => self.push_live = false,
            PushEvent::Refresh(signal) => {
                self.bus.emit(signal);
            }
        }
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        push_rx: &mut UnboundedReceiver<PushEvent>,
    ) -> anyhow::Result<()> {
        self.dashboard.load();
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    self.handle_key(k);
                }
            }
            if self.should_quit {
                break;
            }

            while let Ok(ev) = push_rx.try_recv() {
                self.handle_push(ev);
            }
            self.dashboard.pump();

            terminal.draw(|f| self.draw(f))?;
            sleep(TICK).await;
        }
        Ok(())
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        // Root rows: header, top (chart + processes), bottom (logs + chat)
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Percentage(50),
                Constraint::Min(8),
            ])
            .split(area);

        draw_header(f, rows[0], &self.backend_label, self.push_live);

        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);
        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);

        let view = self.dashboard.view();
        draw_metrics_chart(f, top[0], &view.chart);

        // Cache for input handlers
        let procs_area = top[1];
        self.last_procs_area = Some(procs_area);
        self.procs_scroll_offset = clamp_offset(
            self.procs_scroll_offset,
            view.processes.rows.len(),
            viewport_rows(procs_area),
        );
        draw_processes(f, procs_area, &view.processes, self.procs_scroll_offset);

        draw_logs(f, bottom[0], &view.logs);
        draw_chat(f, bottom[1], &view.chat);
    }
}

fn push_config(config: &DashboardConfig) -> PushConfig {
    PushConfig {
        tls_ca: config.tls_ca.clone(),
        auto_reconnect: config.auto_reconnect,
        reconnect_delay: config.reconnect_delay,
        max_reconnect_attempts: config.max_reconnect_attempts,
        ..PushConfig::new(config.base_url.clone())
    }
}

/// Connects to the backend described by `config` and runs the dashboard until
/// the user quits.
pub async fn run(config: DashboardConfig) -> anyhow::Result<()> {
    let backend = HttpBackend::new(
        config.base_url.clone(),
        config.request_timeout,
        config.tls_ca.as_deref(),
    )?;
    let label = backend.base().to_string();
    let dashboard = Dashboard::new(backend, config.limits, config.label_zone);
    let mut app = App::new(dashboard, label);

    let (push_tx, mut push_rx) = mpsc::unbounded_channel();
    let push_config = push_config(&config);
    let push_task = tokio::spawn(async move {
        if let Err(e) = push::listen(push_config, push_tx).await {
            warn!(error = %e, "push listener stopped");
        }
    });

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    info!(backend = %config.base_url, "dashboard started");
    let res = app.event_loop(&mut terminal, &mut push_rx).await;

    // Teardown
    push_task.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn push_settings_follow_dashboard_config() {
        let mut config = DashboardConfig::new(url::Url::parse("https://mon.lan:5000").unwrap());
        config.tls_ca = Some(PathBuf::from("/etc/ca.pem"));
        config.auto_reconnect = false;
        config.reconnect_delay = Duration::from_millis(250);
        config.max_reconnect_attempts = 5;

        let push = push_config(&config);
        assert_eq!(push.base, config.base_url);
        assert_eq!(push.tls_ca, config.tls_ca);
        assert!(!push.auto_reconnect);
        assert_eq!(push.reconnect_delay, Duration::from_millis(250));
        assert_eq!(push.max_reconnect_attempts, 5);
    }

    #[test]
    fn push_defaults_retry_forever() {
        let config = DashboardConfig::new(url::Url::parse("http://127.0.0.1:5000").unwrap());
        let push = push_config(&config);
        assert!(push.auto_reconnect);
        assert_eq!(push.max_reconnect_attempts, 0);
        assert_eq!(push.reconnect_delay, Duration::from_secs(2));
    }
}
