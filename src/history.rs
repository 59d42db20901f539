// Session history
// Append-only list of shown images with a navigation cursor

use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<PathBuf>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and move the cursor onto it
    pub fn push(&mut self, path: PathBuf) {
        self.entries.push(path);
        self.cursor = self.entries.len() - 1;
    }

    /// Step towards older entries, returning the new current entry
    pub fn back(&mut self) -> Option<&Path> {
        if self.cursor == 0 || self.entries.is_empty() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Step towards newer entries, returning the new current entry
    pub fn forward(&mut self) -> Option<&Path> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    #[allow(dead_code)]
    pub fn current(&self) -> Option<&Path> {
        self.entries.get(self.cursor).map(PathBuf::as_path)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_of(names: &[&str]) -> History {
        let mut history = History::new();
        for name in names {
            history.push(PathBuf::from(name));
        }
        history
    }

    #[test]
    fn empty_history_does_not_move() {
        let mut history = History::new();
        assert_eq!(history.back(), None);
        assert_eq!(history.forward(), None);
        assert_eq!(history.current(), None);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut history = history_of(&["a.png", "b.png", "c.png"]);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.forward(), None);
        assert_eq!(history.back(), Some(Path::new("b.png")));
        assert_eq!(history.back(), Some(Path::new("a.png")));
        assert_eq!(history.back(), None);
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.forward(), Some(Path::new("b.png")));
    }

    #[test]
    fn push_after_going_back_keeps_everything() {
        let mut history = history_of(&["a.png", "b.png"]);
        history.back();
        history.push(PathBuf::from("c.png"));
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current(), Some(Path::new("c.png")));
        assert_eq!(history.entries()[1], PathBuf::from("b.png"));
    }
}
