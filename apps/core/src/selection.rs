use serde::{Deserialize, Serialize};

/// What `advance` does when the cursor is already on the last candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancePolicy {
    #[default]
    Clamp,
    Wrap,
}

/// Cursor over the candidate list currently shown in the popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionNavigator {
    cursor: Option<usize>,
    len: usize,
    policy: AdvancePolicy,
}

impl SelectionNavigator {
    pub fn new(policy: AdvancePolicy) -> Self {
        Self {
            cursor: None,
            len: 0,
            policy,
        }
    }

    /// Point at a freshly computed list of `len` candidates. Clears the cursor.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.reset();
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn advance(&mut self) -> Option<usize> {
        if self.len == 0 {
            self.cursor = None;
            return None;
        }

        let last = self.len - 1;
        self.cursor = Some(match self.cursor {
            None => 0,
            Some(current) if current < last => current + 1,
            Some(_) => match self.policy {
                AdvancePolicy::Clamp => last,
                AdvancePolicy::Wrap => 0,
            },
        });
        self.cursor
    }

    pub fn current_selection<'a, T>(&self, candidates: &'a [T]) -> Option<&'a T> {
        self.cursor.and_then(|index| candidates.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_advance_selects_head() {
        let mut nav = SelectionNavigator::new(AdvancePolicy::Clamp);
        nav.set_len(3);
        assert_eq!(nav.cursor(), None);
        assert_eq!(nav.advance(), Some(0));
        assert_eq!(nav.advance(), Some(1));
    }

    #[test]
    fn clamp_stays_on_last() {
        let mut nav = SelectionNavigator::new(AdvancePolicy::Clamp);
        nav.set_len(2);
        nav.advance();
        nav.advance();
        assert_eq!(nav.advance(), Some(1));
        assert_eq!(nav.advance(), Some(1));
    }

    #[test]
    fn wrap_returns_to_head() {
        let mut nav = SelectionNavigator::new(AdvancePolicy::Wrap);
        nav.set_len(2);
        nav.advance();
        nav.advance();
        assert_eq!(nav.advance(), Some(0));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut nav = SelectionNavigator::new(AdvancePolicy::Wrap);
        nav.set_len(0);
        assert_eq!(nav.advance(), None);
        assert_eq!(nav.current_selection::<u8>(&[]), None);
    }

    #[test]
    fn new_list_resets_cursor() {
        let mut nav = SelectionNavigator::new(AdvancePolicy::Clamp);
        nav.set_len(4);
        nav.advance();
        nav.set_len(4);
        assert_eq!(nav.cursor(), None);
        assert_eq!(nav.current_selection(&["a", "b", "c", "d"]), None);
    }
}
