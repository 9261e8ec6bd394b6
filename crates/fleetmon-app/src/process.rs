//! Message processing: the TEA update loop plus action dispatch

use fleetmon_api::FleetApi;

use crate::actions::{handle_action, ActionContext};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function.
///
/// Follow-up messages are processed immediately, in order. Actions are
/// spawned as background tasks.
pub fn process_message<A>(state: &mut AppState, message: Message, ctx: &ActionContext<A>)
where
    A: FleetApi + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, ctx);
        }

        msg = result.message;
    }
}
