use std::ops::Range;

/// Cursor and scroll offset over a list whose length is owned elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    pub cursor: usize,
    pub offset: usize,
    pub height: usize,
}

impl ListCursor {
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        let max = len as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, max) as usize;
        self.ensure_visible(len);
    }

    pub fn move_to(&mut self, index: usize, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        self.cursor = index.min(len - 1);
        self.ensure_visible(len);
    }

    pub fn move_to_end(&mut self, len: usize) {
        self.move_to(len.saturating_sub(1), len);
    }

    pub fn page_down(&mut self, len: usize) {
        let delta = self.height.max(1).min(len.max(1));
        self.move_cursor(delta as isize, len);
    }

    pub fn page_up(&mut self, len: usize) {
        let delta = self.height.max(1).min(len.max(1));
        self.move_cursor(-(delta as isize), len);
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.reset();
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
        self.ensure_visible(len);
    }

    pub fn ensure_visible(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            self.offset = 0;
            return;
        }
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.height {
            self.offset = self.cursor + 1 - self.height;
        }
        self.offset = self.offset.min(len.saturating_sub(self.height));
    }

    /// Indices currently on screen.
    pub fn visible(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = (self.offset + self.height.max(1)).min(len);
        start..end
    }

    /// Row of the cursor relative to the first visible row.
    pub fn relative(&self) -> usize {
        self.cursor.saturating_sub(self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(height: usize) -> ListCursor {
        ListCursor {
            height,
            ..ListCursor::default()
        }
    }

    #[test]
    fn scrolls_to_keep_cursor_visible() {
        let mut list = cursor(3);
        list.move_cursor(4, 10);
        assert_eq!(list.cursor, 4);
        assert_eq!(list.offset, 2);
        assert_eq!(list.visible(10), 2..5);
        assert_eq!(list.relative(), 2);

        list.move_cursor(-10, 10);
        assert_eq!((list.cursor, list.offset), (0, 0));

        list.move_to_end(10);
        assert_eq!((list.cursor, list.offset), (9, 7));
    }

    #[test]
    fn paging_and_clamping() {
        let mut list = cursor(4);
        list.page_down(6);
        assert_eq!(list.cursor, 4);
        list.page_down(6);
        assert_eq!(list.cursor, 5);
        list.page_up(6);
        assert_eq!(list.cursor, 1);

        list.move_to_end(6);
        list.clamp(2);
        assert_eq!(list.cursor, 1);
        assert_eq!(list.offset, 0);

        list.clamp(0);
        assert_eq!((list.cursor, list.offset), (0, 0));
        assert_eq!(list.visible(0), 0..0);
    }
}
