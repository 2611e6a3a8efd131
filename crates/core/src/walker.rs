//! Linear cursor over a lesson's ordered content.
//!
//! The walker owns the sorted content list and a forward-only cursor.
//! Advancing past the last item is the designed end-of-lesson signal, not
//! an error: `current()` becomes `None` and `has_reached_end()` turns true.
//! There is no backward navigation; restarting a lesson builds a fresh
//! walker from a fresh fetch.

use crate::content::{ContentItem, QuestionItem};

/// Forward-only cursor over sorted lesson content.
#[derive(Debug, Clone)]
pub struct ContentWalker {
    items: Vec<ContentItem>,
    cursor: usize,
}

impl ContentWalker {
    /// Build a walker from raw lesson content.
    ///
    /// Items are stable-sorted by `order` ascending; items without an
    /// explicit order sort last, keeping their array position among
    /// themselves. The cursor starts at the first item.
    pub fn new(mut items: Vec<ContentItem>) -> Self {
        items.sort_by_key(|item| item.order().map_or(i64::MAX, i64::from));
        ContentWalker { items, cursor: 0 }
    }

    /// Restore a walker to a client-supplied cursor position.
    ///
    /// Positions beyond the end are clamped to `len` (the exhausted state),
    /// so a stale cursor can signal end-of-lesson but never index past it.
    pub fn with_cursor(items: Vec<ContentItem>, cursor: usize) -> Self {
        let mut walker = ContentWalker::new(items);
        walker.cursor = cursor.min(walker.items.len());
        walker
    }

    /// Move the cursor forward one item.
    ///
    /// When the cursor is already on the last item this pushes it past the
    /// end (`cursor == len`), which is the "lesson exhausted" state.
    pub fn advance(&mut self) {
        if self.cursor < self.items.len() {
            self.cursor += 1;
        }
    }

    /// The item under the cursor, or `None` once the walker is exhausted.
    pub fn current(&self) -> Option<&ContentItem> {
        self.items.get(self.cursor)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 1-based position for display ("item 3 of 5"), clamped to the total.
    pub fn display_position(&self) -> usize {
        (self.cursor + 1).min(self.items.len())
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// True while the cursor sits on the final item.
    pub fn is_last(&self) -> bool {
        !self.items.is_empty() && self.cursor >= self.items.len() - 1
    }

    /// True once the cursor has moved past the final item.
    pub fn has_reached_end(&self) -> bool {
        !self.items.is_empty() && self.cursor >= self.items.len()
    }

    /// The question-type items of the lesson, in walk order.
    pub fn questions(&self) -> Vec<&QuestionItem> {
        self.items.iter().filter_map(|i| i.as_question()).collect()
    }

    /// Look up a question by its stable id.
    pub fn find_question(&self, question_id: &str) -> Option<&QuestionItem> {
        self.questions().into_iter().find(|q| q.id == question_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentItem;

    fn text(order: Option<i32>, value: &str) -> ContentItem {
        ContentItem::Text {
            order,
            value: value.to_string(),
        }
    }

    fn question(order: Option<i32>, id: &str) -> ContentItem {
        serde_json::from_value(serde_json::json!({
            "type": "question",
            "order": order,
            "id": id,
            "value": format!("question {id}"),
            "answer": "ok"
        }))
        .unwrap()
    }

    #[test]
    fn sorts_by_order_ascending() {
        let mut walker = ContentWalker::new(vec![
            text(Some(3), "c"),
            text(Some(1), "a"),
            text(Some(2), "b"),
        ]);
        let mut orders = Vec::new();
        while let Some(item) = walker.current() {
            orders.push(item.order().unwrap());
            walker.advance();
        }
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn missing_order_sorts_last_and_is_stable() {
        let walker = ContentWalker::new(vec![
            text(None, "x"),
            text(Some(5), "a"),
            text(None, "y"),
        ]);
        let mut w = walker;
        assert_eq!(w.current().unwrap().order(), Some(5));
        w.advance();
        assert!(matches!(w.current().unwrap(), ContentItem::Text { value, .. } if value == "x"));
        w.advance();
        assert!(matches!(w.current().unwrap(), ContentItem::Text { value, .. } if value == "y"));
    }

    #[test]
    fn four_items_exhaust_after_four_advances() {
        let mut walker = ContentWalker::new(vec![
            text(Some(1), "a"),
            text(Some(2), "b"),
            question(Some(3), "q1"),
            text(Some(4), "d"),
        ]);

        assert_eq!(walker.display_position(), 1);
        assert_eq!(walker.total(), 4);
        assert!(!walker.has_reached_end());

        for _ in 0..4 {
            walker.advance();
        }

        assert!(walker.has_reached_end());
        assert!(walker.current().is_none());
        // Display position stays clamped to the total once exhausted.
        assert_eq!(walker.display_position(), 4);
    }

    #[test]
    fn is_last_on_final_item() {
        let mut walker = ContentWalker::new(vec![text(Some(1), "a"), text(Some(2), "b")]);
        assert!(!walker.is_last());
        walker.advance();
        assert!(walker.is_last());
        assert!(!walker.has_reached_end());
    }

    #[test]
    fn empty_lesson_never_reaches_end() {
        let mut walker = ContentWalker::new(vec![]);
        assert!(walker.current().is_none());
        assert!(!walker.has_reached_end());
        walker.advance();
        assert!(!walker.has_reached_end());
    }

    #[test]
    fn with_cursor_clamps_past_the_end() {
        let walker = ContentWalker::with_cursor(vec![text(Some(1), "a")], 99);
        assert!(walker.has_reached_end());
        assert_eq!(walker.cursor(), 1);
    }

    #[test]
    fn questions_sublist_preserves_walk_order() {
        let walker = ContentWalker::new(vec![
            question(Some(2), "q2"),
            text(Some(1), "intro"),
            question(Some(3), "q3"),
        ]);
        let ids: Vec<&str> = walker.questions().iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["q2", "q3"]);
        assert!(walker.find_question("q3").is_some());
        assert!(walker.find_question("missing").is_none());
    }
}
