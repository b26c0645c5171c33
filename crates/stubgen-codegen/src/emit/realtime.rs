use super::context::{EventContext, MessageContext, SocketContext};
use crate::descriptors::{EventDescriptor, MessageDescriptor};
use crate::template_engine::TemplateEngine;
use stubgen_core::Result;

/// Renders the realtime socket module.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::emit::RealtimeEmitter;
/// use stubgen_codegen::{EventDescriptor, FieldDescriptor, MessageDescriptor, TemplateEngine};
///
/// let engine = TemplateEngine::new().unwrap();
/// let emitter = RealtimeEmitter::new(&engine);
///
/// let leave = MessageDescriptor::new(
///     "MatchLeave",
///     vec![FieldDescriptor::new("match_id", "string", false)],
/// );
/// let lua = emitter
///     .emit(&[leave], &[EventDescriptor::new("MatchData")])
///     .unwrap();
///
/// assert!(lua.contains("function M.match_leave(socket, match_id, callback)"));
/// assert!(lua.contains("function M.on_match_data(socket, fn)"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RealtimeEmitter<'e, 'a> {
    engine: &'e TemplateEngine<'a>,
}

impl<'e, 'a> RealtimeEmitter<'e, 'a> {
    /// Creates an emitter rendering with `engine`.
    #[must_use]
    pub const fn new(engine: &'e TemplateEngine<'a>) -> Self {
        Self { engine }
    }

    /// Renders one message sender.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_message(&self, message: &MessageDescriptor) -> Result<String> {
        self.engine
            .render("realtime/message", &MessageContext::from(message))
    }

    /// Renders one event subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if rendering fails.
    pub fn render_event(&self, event: &EventDescriptor) -> Result<String> {
        self.engine
            .render("realtime/event", &EventContext::from(event))
    }

    /// Renders the complete socket module.
    ///
    /// # Errors
    ///
    /// Returns [`stubgen_core::Error::TemplateError`] if any template fails.
    pub fn emit(
        &self,
        messages: &[MessageDescriptor],
        events: &[EventDescriptor],
    ) -> Result<String> {
        let messages = messages
            .iter()
            .map(|message| self.render_message(message))
            .collect::<Result<String>>()?;
        let event_index = events.iter().map(EventDescriptor::hook_name).collect();
        let events = events
            .iter()
            .map(|event| self.render_event(event))
            .collect::<Result<String>>()?;

        self.engine.render(
            "realtime/socket",
            &SocketContext {
                messages,
                event_index,
                events,
            },
        )
    }
}
