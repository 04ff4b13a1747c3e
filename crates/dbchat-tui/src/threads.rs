//! Thread list state.

use dbchat_api::ThreadSummary;

/// Sidebar state: the known threads and which one is open.
#[derive(Debug, Default)]
pub struct ThreadListState {
    pub threads: Vec<ThreadSummary>,
    /// Id of the thread whose messages are displayed, if any.
    pub current: Option<String>,
    /// Sidebar cursor position.
    pub selected: usize,
    /// Set after the first successful list load; the first thread is
    /// auto-opened only then.
    pub loaded_once: bool,
}

impl ThreadListState {
    /// Replaces the list, keeping the cursor on the current thread when it
    /// is still present.
    pub fn set_threads(&mut self, threads: Vec<ThreadSummary>) {
        self.threads = threads;
        self.selected = self
            .current
            .as_deref()
            .and_then(|id| self.threads.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }

    pub fn selected_thread(&self) -> Option<&ThreadSummary> {
        self.threads.get(self.selected)
    }

    /// Moves the cursor; returns the newly selected thread id when the
    /// selection actually changed.
    pub fn select_prev(&mut self) -> Option<String> {
        if self.selected == 0 {
            return None;
        }
        self.selected -= 1;
        self.selected_thread().map(|t| t.id.clone())
    }

    pub fn select_next(&mut self) -> Option<String> {
        if self.selected + 1 >= self.threads.len() {
            return None;
        }
        self.selected += 1;
        self.selected_thread().map(|t| t.id.clone())
    }

    /// Drops a deleted thread. Returns true if it was the current one, in
    /// which case the caller must clear the transcript.
    pub fn remove(&mut self, thread_id: &str) -> bool {
        self.threads.retain(|t| t.id != thread_id);
        if self.selected >= self.threads.len() {
            self.selected = self.threads.len().saturating_sub(1);
        }
        if self.current.as_deref() == Some(thread_id) {
            self.current = None;
            return true;
        }
        false
    }

    /// Applies a successful rename locally, without waiting for a reload.
    pub fn apply_rename(&mut self, thread_id: &str, title: &str) {
        if let Some(t) = self.threads.iter_mut().find(|t| t.id == thread_id) {
            t.title = Some(title.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            title: Some(id.to_string()),
            updated_at: "2026-01-01 10:00".to_string(),
        }
    }

    #[test]
    fn test_set_threads_keeps_cursor_on_current() {
        let mut list = ThreadListState::default();
        list.current = Some("b".to_string());
        list.set_threads(vec![summary("a"), summary("b"), summary("c")]);
        assert_eq!(list.selected, 1);
    }

    #[test]
    fn test_remove_current_clears_current() {
        let mut list = ThreadListState::default();
        list.set_threads(vec![summary("a"), summary("b")]);
        list.current = Some("a".to_string());
        assert!(list.remove("a"));
        assert!(list.current.is_none());
        assert_eq!(list.threads.len(), 1);
    }

    #[test]
    fn test_remove_other_keeps_current() {
        let mut list = ThreadListState::default();
        list.set_threads(vec![summary("a"), summary("b")]);
        list.current = Some("a".to_string());
        assert!(!list.remove("b"));
        assert_eq!(list.current.as_deref(), Some("a"));
    }

    #[test]
    fn test_selection_stops_at_edges() {
        let mut list = ThreadListState::default();
        list.set_threads(vec![summary("a"), summary("b")]);
        assert!(list.select_prev().is_none());
        assert_eq!(list.select_next().as_deref(), Some("b"));
        assert!(list.select_next().is_none());
    }
}
