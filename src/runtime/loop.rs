use super::UiUpdate;
use tokio::sync::mpsc;

use super::{context::RuntimeContext, frontend::FrontendAdapter, mode::RuntimeMode};

pub struct Runtime<M: RuntimeMode> {
    pub mode: M,
    update_rx: mpsc::UnboundedReceiver<UiUpdate>,
}

impl<M: RuntimeMode> Runtime<M> {
    pub fn new(mode: M, update_rx: mpsc::UnboundedReceiver<UiUpdate>) -> Self {
        Self { mode, update_rx }
    }

    /// Applies every queued update to the mode. Returns how many were applied.
    pub fn drain_updates(&mut self, ctx: &mut RuntimeContext) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.update_rx.try_recv() {
            self.mode.on_model_update(update, ctx);
            applied += 1;
        }
        applied
    }

    pub async fn run<F: FrontendAdapter<M>>(&mut self, frontend: &mut F, ctx: &mut RuntimeContext) {
        loop {
            self.drain_updates(ctx);

            if let Some(event) = frontend.poll_user_input(&self.mode) {
                self.mode.on_frontend_event(event, ctx);
            }

            if frontend.should_quit() || self.mode.quit_requested() {
                break;
            }

            frontend.render(&self.mode);
            tokio::task::yield_now().await;
        }
    }
}
