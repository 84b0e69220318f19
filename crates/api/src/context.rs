use cin_auth::{Diagnostics, Session};

/// Authorization outcome for a request that the gate let through.
///
/// Inserted as a request extension by the gate middleware; present on every
/// gated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
    notice: Option<Diagnostics>,
}

impl SessionContext {
    pub fn new(session: Option<Session>, notice: Option<Diagnostics>) -> Self {
        Self { session, notice }
    }

    /// `None` on public paths reached without a usable session.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Set when the caller was meant to be redirected to the page they requested.
    pub fn notice(&self) -> Option<&Diagnostics> {
        self.notice.as_ref()
    }
}
