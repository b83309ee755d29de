use anyhow::Result;
use codelens::api::logging::init_logging;
use codelens::app::{build_runtime, AnalyzerMode};
use codelens::config::Config;
use codelens::runtime::frontend::{FrontendAdapter, UserInputEvent};
use codelens::terminal::TerminalSession;
use codelens::ui::render::render_analyzer;
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

struct ManagedTuiFrontend {
    session: TerminalSession,
    quit: bool,
}

impl ManagedTuiFrontend {
    fn new() -> Result<Self> {
        let session = TerminalSession::enter()?;
        Self::drain_startup_events();
        Ok(Self {
            session,
            quit: false,
        })
    }

    fn drain_startup_events() {
        for _ in 0..1024 {
            match event::poll(Duration::from_millis(0)) {
                Ok(true) => {
                    if event::read().is_err() {
                        break;
                    }
                }
                Ok(false) | Err(_) => break,
            }
        }
    }
}

impl FrontendAdapter<AnalyzerMode> for ManagedTuiFrontend {
    fn poll_user_input(&mut self, _mode: &AnalyzerMode) -> Option<UserInputEvent> {
        let Ok(has_event) = event::poll(INPUT_POLL_INTERVAL) else {
            self.quit = true;
            return None;
        };
        if !has_event {
            return None;
        }

        let Ok(ev) = event::read() else {
            self.quit = true;
            return None;
        };

        match ev {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(UserInputEvent::Key(key)),
            Event::Paste(text) => Some(UserInputEvent::Paste(text)),
            _ => None,
        }
    }

    fn render(&mut self, mode: &AnalyzerMode) {
        if let Err(error) = self
            .session
            .terminal_mut()
            .draw(|frame| render_analyzer(frame, mode))
        {
            log::error!("failed to draw frame: {error}");
            self.quit = true;
        }
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    match init_logging() {
        Ok(Some(path)) => eprintln!("codelens: logging to {}", path.display()),
        Ok(None) => {}
        Err(error) => eprintln!("codelens: logging disabled: {error:#}"),
    }

    let config = Config::load()?;
    for warning in config.warnings() {
        log::warn!("{warning}");
    }
    log::info!(
        "starting with endpoint {} model {} timeout {:?} reveal interval {:?}",
        config.api_url,
        config.model,
        config.request_timeout,
        config.reveal_interval
    );

    let (mut runtime, mut ctx) = build_runtime(&config)?;
    let mut frontend = ManagedTuiFrontend::new()?;
    runtime.run(&mut frontend, &mut ctx).await;
    Ok(())
}
