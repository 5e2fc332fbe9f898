/// Phase of one interactive session.
///
/// The surfaces consult the predicates below instead of toggling widget
/// flags: an action that is not permitted in the current phase is simply
/// ignored. `Analyzing` and `Crawling` exist because operations run on
/// background tasks while the interface keeps handling events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Analyzing,
    Analyzed,
    Crawling,
    Crawled,
    Failed,
}

impl SessionState {
    /// A new analysis may start whenever no operation is in flight.
    pub fn can_analyze(self) -> bool {
        !self.is_busy()
    }

    /// Crawling requires a completed analysis; after a crawl another
    /// section of the same analysis may be crawled.
    pub fn can_crawl(self) -> bool {
        matches!(self, SessionState::Analyzed | SessionState::Crawled)
    }

    pub fn can_export(self) -> bool {
        matches!(self, SessionState::Crawled)
    }

    pub fn is_busy(self) -> bool {
        matches!(self, SessionState::Analyzing | SessionState::Crawling)
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Analyzing => "analyzing",
            SessionState::Analyzed => "analyzed",
            SessionState::Crawling => "crawling",
            SessionState::Crawled => "crawled",
            SessionState::Failed => "failed",
        }
    }
}
