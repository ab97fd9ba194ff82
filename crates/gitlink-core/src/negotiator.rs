//! Drag protocol negotiation.
//!
//! One [`DragNegotiator`] per editor. During drag-over it looks for a target
//! it understands among those the source offers; if one is present it claims
//! the drag, asks for the data and reports a link action so the source can
//! show the right cursor. Drags it does not understand are left alone for
//! other handlers on the same widget.

use crate::host::{DragAction, DragContext, EventDisposition};
use crate::payload::DropPayload;
use gitlink_config::DragConfig;
use tracing::debug;

/// Negotiation state of the current drag session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    /// No drag claimed
    #[default]
    Idle,
    /// Drag claimed; waiting for the drop
    Armed,
}

/// Result of a drop delivered to the negotiator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropDecision {
    /// Whether the drop event was consumed
    pub disposition: EventDisposition,
    /// Decoded payload, if there is anything to insert
    pub payload: Option<DropPayload>,
}

impl DropDecision {
    fn propagate() -> Self {
        Self {
            disposition: EventDisposition::Propagate,
            payload: None,
        }
    }
}

/// Drop-target side of the drag protocol
#[derive(Debug, Clone)]
pub struct DragNegotiator {
    accepted_targets: Vec<String>,
    state: NegotiationState,
    armed_target: Option<String>,
}

impl DragNegotiator {
    /// Create a negotiator accepting the given target names, in priority order
    pub fn new<I, S>(accepted_targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted_targets: accepted_targets.into_iter().map(Into::into).collect(),
            state: NegotiationState::Idle,
            armed_target: None,
        }
    }

    /// Create a negotiator from the `[drag]` config section
    pub fn from_config(config: &DragConfig) -> Self {
        Self::new(config.accepted_targets())
    }

    /// Current state
    pub fn state(&self) -> NegotiationState {
        self.state
    }

    /// Target claimed for the current session
    pub fn armed_target(&self) -> Option<&str> {
        self.armed_target.as_deref()
    }

    /// Target names this negotiator claims
    pub fn accepted_targets(&self) -> &[String] {
        &self.accepted_targets
    }

    /// Evaluate a drag-over event.
    pub fn on_drag_over(&mut self, ctx: &mut dyn DragContext) -> EventDisposition {
        let offered = ctx.offered_targets();
        let matched = self
            .accepted_targets
            .iter()
            .find(|accepted| offered.iter().any(|o| o == *accepted))
            .cloned();

        match matched {
            Some(target) => {
                debug!(target = %target, "Claiming drag");
                ctx.request_data(&target);
                ctx.set_action(DragAction::Link);
                self.armed_target = Some(target);
                self.state = NegotiationState::Armed;
                EventDisposition::Handled
            }
            None => {
                debug!(?offered, "No treeish target offered, ignoring drag");
                self.reset();
                EventDisposition::Propagate
            }
        }
    }

    /// Handle the drop data for a claimed drag.
    ///
    /// `data` is `None` when the source delivered no selection data at all;
    /// such a drop is not claimed. Once armed, a drop with data is always
    /// claimed even if the payload turns out to be unusable.
    pub fn on_drop(&mut self, ctx: &mut dyn DragContext, data: Option<&[u8]>) -> DropDecision {
        let Some(data) = data else {
            debug!("Drop without selection data");
            self.reset();
            return DropDecision::propagate();
        };

        if self.state != NegotiationState::Armed {
            debug!("Drop for an unclaimed drag, ignoring");
            return DropDecision::propagate();
        }

        ctx.finish(true);
        self.reset();

        let payload = DropPayload::parse(data);
        if payload.is_none() {
            debug!("Treeish list had nothing to insert");
        }
        DropDecision {
            disposition: EventDisposition::Handled,
            payload,
        }
    }

    /// The drag left the widget or was cancelled
    pub fn on_drag_leave(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.state = NegotiationState::Idle;
        self.armed_target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDrag {
        offered: Vec<String>,
        requested: Vec<String>,
        actions: Vec<DragAction>,
        finished: Vec<bool>,
    }

    impl RecordingDrag {
        fn offering(targets: &[&str]) -> Self {
            Self {
                offered: targets.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl DragContext for RecordingDrag {
        fn offered_targets(&self) -> Vec<String> {
            self.offered.clone()
        }
        fn request_data(&mut self, target: &str) {
            self.requested.push(target.to_string());
        }
        fn set_action(&mut self, action: DragAction) {
            self.actions.push(action);
        }
        fn finish(&mut self, success: bool) {
            self.finished.push(success);
        }
    }

    fn negotiator() -> DragNegotiator {
        DragNegotiator::from_config(&DragConfig::default())
    }

    #[test]
    fn test_matching_target_arms_and_requests_link() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["text/plain", "git/treeish-list"]);

        let disposition = negotiator.on_drag_over(&mut drag);

        assert_eq!(disposition, EventDisposition::Handled);
        assert_eq!(negotiator.state(), NegotiationState::Armed);
        assert_eq!(negotiator.armed_target(), Some("git/treeish-list"));
        assert_eq!(drag.requested, vec!["git/treeish-list"]);
        assert_eq!(drag.actions, vec![DragAction::Link]);
    }

    #[test]
    fn test_foreign_drag_is_not_claimed() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["text/uri-list"]);

        let disposition = negotiator.on_drag_over(&mut drag);

        assert_eq!(disposition, EventDisposition::Propagate);
        assert_eq!(negotiator.state(), NegotiationState::Idle);
        assert!(drag.requested.is_empty());
        assert!(drag.actions.is_empty());
    }

    #[test]
    fn test_armed_drop_is_claimed_even_when_malformed() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["git/treeish-list"]);
        negotiator.on_drag_over(&mut drag);

        let decision = negotiator.on_drop(&mut drag, Some(b"only-a-path"));

        assert_eq!(decision.disposition, EventDisposition::Handled);
        assert_eq!(decision.payload, None);
        assert_eq!(drag.finished, vec![true]);
        assert_eq!(negotiator.state(), NegotiationState::Idle);
    }

    #[test]
    fn test_armed_drop_yields_payload() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["git/treeish-list"]);
        negotiator.on_drag_over(&mut drag);

        let decision = negotiator.on_drop(&mut drag, Some(b"/repo\nabc123"));

        let payload = decision.payload.unwrap();
        assert_eq!(payload.treeishes, vec!["abc123"]);
    }

    #[test]
    fn test_drop_without_data_propagates() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["git/treeish-list"]);
        negotiator.on_drag_over(&mut drag);

        let decision = negotiator.on_drop(&mut drag, None);

        assert_eq!(decision.disposition, EventDisposition::Propagate);
        assert!(drag.finished.is_empty());
        assert_eq!(negotiator.state(), NegotiationState::Idle);
    }

    #[test]
    fn test_unclaimed_drop_propagates() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["git/treeish-list"]);

        let decision = negotiator.on_drop(&mut drag, Some(b"/repo\nabc123"));

        assert_eq!(decision, DropDecision::propagate());
        assert!(drag.finished.is_empty());
    }

    #[test]
    fn test_alternate_target_is_accepted() {
        let config = DragConfig {
            accept_alternate_targets: vec!["x-gitg/treeish-list".to_string()],
            ..Default::default()
        };
        let mut negotiator = DragNegotiator::from_config(&config);
        let mut drag = RecordingDrag::offering(&["x-gitg/treeish-list"]);

        assert!(negotiator.on_drag_over(&mut drag).is_handled());
        assert_eq!(drag.requested, vec!["x-gitg/treeish-list"]);
    }

    #[test]
    fn test_leave_disarms() {
        let mut negotiator = negotiator();
        let mut drag = RecordingDrag::offering(&["git/treeish-list"]);
        negotiator.on_drag_over(&mut drag);

        negotiator.on_drag_leave();

        assert_eq!(negotiator.state(), NegotiationState::Idle);
        assert_eq!(negotiator.armed_target(), None);
    }
}
