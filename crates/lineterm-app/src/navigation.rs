//! Page navigation stack.
//!
//! An ordered stack replaces parent/child page links: the top is the active
//! view, the entry below it is its parent. Popping can never leave a dangling
//! parent because the parent is simply the next element.

/// Result of [`NavigationStack::pop`].
#[derive(Debug, PartialEq, Eq)]
pub enum PopOutcome<P> {
    /// The top page was discarded and its parent is active again.
    Restored {
        /// Page that was removed.
        discarded: P,
    },
    /// Only the root remains. The caller terminates instead.
    NoParent,
}

/// Stack of pages. Never empty.
#[derive(Debug, Clone)]
pub struct NavigationStack<P> {
    /// Bottom (root) first, active page last.
    pages: Vec<P>,
}

impl<P> NavigationStack<P> {
    /// Stack holding only `root`.
    pub fn with_root(root: P) -> Self {
        Self { pages: vec![root] }
    }

    /// Make `page` the active view, with the current top as its parent.
    pub fn push(&mut self, page: P) {
        self.pages.push(page);
    }

    /// Discard the active page and restore its parent.
    pub fn pop(&mut self) -> PopOutcome<P> {
        if self.pages.len() <= 1 {
            return PopOutcome::NoParent;
        }
        match self.pages.pop() {
            Some(discarded) => PopOutcome::Restored { discarded },
            None => PopOutcome::NoParent,
        }
    }

    /// Discard every page and start over from `root`.
    ///
    /// Returns the discarded pages, root first.
    pub fn reset(&mut self, root: P) -> Vec<P> {
        std::mem::replace(&mut self.pages, vec![root])
    }

    /// Active page.
    pub fn active(&self) -> &P {
        // INVARIANT: the stack always holds at least the root.
        let last = self.pages.len().saturating_sub(1);
        &self.pages[last]
    }

    /// Active page, mutably.
    pub fn active_mut(&mut self) -> &mut P {
        let last = self.pages.len().saturating_sub(1);
        &mut self.pages[last]
    }

    /// Parent of the active page. `None` at the root.
    pub fn parent(&self) -> Option<&P> {
        self.pages.len().checked_sub(2).and_then(|i| self.pages.get(i))
    }

    /// Parent of the active page, mutably.
    pub fn parent_mut(&mut self) -> Option<&mut P> {
        self.pages.len().checked_sub(2).and_then(|i| self.pages.get_mut(i))
    }

    /// Number of pages, root included.
    pub fn depth(&self) -> usize {
        self.pages.len()
    }

    /// Pages from root to active.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn pop_at_root_reports_no_parent() {
        let mut stack = NavigationStack::with_root("login");

        assert_eq!(stack.pop(), PopOutcome::NoParent);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.active(), "login");
    }

    #[test]
    fn pop_restores_parent() {
        let mut stack = NavigationStack::with_root("main");
        stack.push("friends");
        stack.push("chat");

        assert_eq!(stack.parent(), Some(&"friends"));
        assert_eq!(stack.pop(), PopOutcome::Restored { discarded: "chat" });
        assert_eq!(*stack.active(), "friends");
    }

    #[test]
    fn reset_discards_everything() {
        let mut stack = NavigationStack::with_root(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.reset(10), vec![1, 2, 3]);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.active(), 10);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push(u32),
        Pop,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![2 => any::<u32>().prop_map(Op::Push), 1 => Just(Op::Pop)]
    }

    proptest! {
        #[test]
        fn prop_pop_restores_view_before_push(
            ops in prop::collection::vec(op_strategy(), 0..40),
            pushed in prop::collection::vec(any::<u32>(), 1..10),
        ) {
            let mut stack = NavigationStack::with_root(0u32);
            for op in ops {
                match op {
                    Op::Push(page) => stack.push(page),
                    Op::Pop => { let _ = stack.pop(); },
                }
            }

            let depth_before = stack.depth();
            let mut views_before = Vec::new();
            for page in &pushed {
                views_before.push(*stack.active());
                stack.push(*page);
            }
            prop_assert_eq!(stack.depth(), depth_before + pushed.len());

            // Unwinding restores each view that was active before its push
            while let Some(expected) = views_before.pop() {
                let outcome = stack.pop();
                prop_assert!(matches!(outcome, PopOutcome::Restored { .. }), "pop lost a page");
                prop_assert_eq!(*stack.active(), expected);
            }
            prop_assert_eq!(stack.depth(), depth_before);
        }
    }
}
