/// Which list the completion popup draws from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionSource {
    #[default]
    Commands,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAction {
    Show,
    FocusExisting,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    visible: bool,
    source: CompletionSource,
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn source(&self) -> CompletionSource {
        self.source
    }

    pub fn on_open(&mut self) -> OpenAction {
        if self.visible {
            return OpenAction::FocusExisting;
        }
        self.visible = true;
        self.source = CompletionSource::Commands;
        OpenAction::Show
    }

    pub fn on_show_history(&mut self) {
        self.source = CompletionSource::History;
    }

    /// Clearing the field hands the popup back to the command list.
    pub fn on_query_changed(&mut self, query: &str) {
        if query.is_empty() {
            self.source = CompletionSource::Commands;
        }
    }

    /// Returns `true` when the palette was visible and is now hidden.
    pub fn on_close(&mut self) -> bool {
        if self.visible {
            self.visible = false;
            return true;
        }
        false
    }
}
