//! Pointer drag-selection session.

/// What a drag extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Cells,
    /// Started on a row header.
    Rows,
    /// Started on a column header.
    Columns,
}

/// An open drag owns exactly one document-level pointer-up subscription,
/// represented by a guard whose `Drop` unsubscribes.
#[derive(Debug)]
pub struct DragSession<G> {
    active: Option<(DragKind, G)>,
}

impl<G> Default for DragSession<G> {
    fn default() -> Self {
        Self { active: None }
    }
}

impl<G> DragSession<G> {
    /// Open a session. Callers end any previous session before subscribing,
    /// so two subscriptions never coexist.
    pub fn start(&mut self, kind: DragKind, guard: G) {
        self.active = Some((kind, guard));
    }

    /// Close the session and release its subscription.
    pub fn end(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn kind(&self) -> Option<DragKind> {
        self.active.as_ref().map(|(kind, _)| *kind)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Guard(Rc<Cell<u32>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_end_releases_guard() {
        let released = Rc::new(Cell::new(0));
        let mut session = DragSession::default();
        session.start(DragKind::Rows, Guard(Rc::clone(&released)));
        assert_eq!(session.kind(), Some(DragKind::Rows));
        assert!(session.end());
        assert_eq!(released.get(), 1);
        assert!(!session.end());
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_drop_releases_guard() {
        let released = Rc::new(Cell::new(0));
        {
            let mut session = DragSession::default();
            session.start(DragKind::Cells, Guard(Rc::clone(&released)));
        }
        assert_eq!(released.get(), 1);
    }
}
