use super::context::RuntimeContext;
use super::frontend::UserInputEvent;
use super::UiUpdate;

pub trait RuntimeMode {
    fn on_frontend_event(&mut self, event: UserInputEvent, ctx: &mut RuntimeContext);
    fn on_model_update(&mut self, update: UiUpdate, ctx: &mut RuntimeContext);
    fn is_request_in_progress(&self) -> bool;
    fn quit_requested(&self) -> bool {
        false
    }
}
