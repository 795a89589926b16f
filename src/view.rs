use std::error::Error;

use crate::note::{Note, sort_newest_first};
use crate::richtext::StyledBuffer;
use crate::store::NoteStore;

/// `Viewing -> Editing -> (save | cancel) -> Viewing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Viewing,
    Editing,
}

/// One note shown on a styled surface, with the edit cycle around it.
///
/// The buffer always holds the raw content. In `Viewing` it is styled and
/// read-only; in `Editing` styling is cleared and it accepts text.
#[derive(Debug)]
pub struct NoteView {
    notes: Vec<Note>,
    selected: Option<String>,
    buffer: StyledBuffer,
    state: ViewState,
}

impl NoteView {
    pub fn new(mut notes: Vec<Note>) -> Self {
        sort_newest_first(&mut notes);
        Self {
            notes,
            selected: None,
            buffer: StyledBuffer::new(),
            state: ViewState::Viewing,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn buffer(&self) -> &StyledBuffer {
        &self.buffer
    }

    pub fn selected(&self) -> Option<&Note> {
        let ts = self.selected.as_deref()?;
        self.notes.iter().find(|n| n.timestamp == ts)
    }

    /// Show the note with `timestamp`. Ignored while editing.
    pub fn select(&mut self, timestamp: &str) -> bool {
        if self.state == ViewState::Editing {
            return false;
        }
        if !self.notes.iter().any(|n| n.timestamp == timestamp) {
            return false;
        }
        self.selected = Some(timestamp.to_string());
        self.display();
        true
    }

    /// Select by position in newest-first order.
    pub fn select_index(&mut self, index: usize) -> bool {
        match self.notes.get(index).map(|n| n.timestamp.clone()) {
            Some(ts) => self.select(&ts),
            None => false,
        }
    }

    fn display(&mut self) {
        let content = self.selected().map(|n| n.content.clone());
        match content {
            Some(content) => {
                self.buffer.set_text(content);
                self.buffer.apply_styling();
            }
            None => {
                self.selected = None;
                self.buffer.set_text("");
            }
        }
        self.buffer.set_editable(false);
    }

    pub fn begin_edit(&mut self) -> Result<(), Box<dyn Error>> {
        if self.state == ViewState::Editing {
            return Err("Already editing".into());
        }
        if self.selected().is_none() {
            return Err("No note selected".into());
        }
        self.buffer.clear_styles();
        self.buffer.set_editable(true);
        self.state = ViewState::Editing;
        Ok(())
    }

    pub fn replace_text(&mut self, text: impl Into<String>) -> Result<(), Box<dyn Error>> {
        if !self.buffer.is_editable() {
            return Err("Note is read-only; start editing first".into());
        }
        self.buffer.set_text(text);
        Ok(())
    }

    /// Drop the edits and show the stored content again.
    pub fn cancel(&mut self) {
        self.state = ViewState::Viewing;
        self.display();
    }

    /// Persist the trimmed buffer under the selected note's timestamp, reload
    /// the full list and show the same note again if it still exists.
    pub fn save(&mut self, store: &NoteStore) -> Result<(), Box<dyn Error>> {
        if self.state != ViewState::Editing {
            return Err("Not editing".into());
        }
        let ts = self.selected.clone().ok_or("No note selected")?;
        let content = self.buffer.text().trim().to_string();
        if !store.update_content(&ts, &content)? {
            log::warn!("note {ts} vanished from the store before saving");
        }

        self.notes = store.load_sorted()?;
        self.state = ViewState::Viewing;
        if !self.select(&ts) {
            self.selected = None;
            self.display();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::richtext::TextStyle;
    use tempfile::tempdir;

    fn seeded_store() -> (tempfile::TempDir, NoteStore) {
        let tmp = tempdir().unwrap();
        let store = NoteStore::new(tmp.path().join("annotations.json"));
        store
            .save(&[
                Note { timestamp: "2024-01-01T09:00:00".into(), content: "Old\nbody".into() },
                Note {
                    timestamp: "2024-02-01T09:00:00".into(),
                    content: "New\n[work]\n<h>hot</h>".into(),
                },
            ])
            .unwrap();
        (tmp, store)
    }

    #[test]
    fn viewing_styles_the_selected_note() {
        let (_tmp, store) = seeded_store();
        let mut view = NoteView::new(store.load().unwrap());
        assert!(view.select_index(0));
        assert_eq!(view.selected().unwrap().timestamp, "2024-02-01T09:00:00");
        assert!(!view.buffer().is_editable());
        assert!(view.buffer().ranges().iter().any(|r| r.style == TextStyle::Highlight));
    }

    #[test]
    fn editing_clears_styles_and_unlocks() {
        let (_tmp, store) = seeded_store();
        let mut view = NoteView::new(store.load().unwrap());
        view.select_index(0);
        view.begin_edit().unwrap();
        assert_eq!(view.state(), ViewState::Editing);
        assert!(view.buffer().ranges().is_empty());
        assert!(view.buffer().is_editable());
        assert!(!view.select_index(1), "selection is locked while editing");
    }

    #[test]
    fn cancel_restores_original() {
        let (_tmp, store) = seeded_store();
        let mut view = NoteView::new(store.load().unwrap());
        view.select_index(1);
        view.begin_edit().unwrap();
        view.replace_text("scribbles").unwrap();
        view.cancel();
        assert_eq!(view.state(), ViewState::Viewing);
        assert_eq!(view.buffer().text(), "Old\nbody");
        assert_eq!(store.load().unwrap()[0].content, "Old\nbody");
    }

    #[test]
    fn save_trims_persists_and_reselects() {
        let (_tmp, store) = seeded_store();
        let mut view = NoteView::new(store.load().unwrap());
        view.select_index(1);
        view.begin_edit().unwrap();
        view.replace_text("  Old\n[x] <c>done</c>\n\n").unwrap();
        view.save(&store).unwrap();

        assert_eq!(view.state(), ViewState::Viewing);
        let selected = view.selected().unwrap();
        assert_eq!(selected.timestamp, "2024-01-01T09:00:00");
        assert_eq!(selected.content, "Old\n[x] <c>done</c>");
        assert_eq!(view.buffer().visible_text(), "Old\n[x] done");

        let stored = store.load().unwrap();
        assert_eq!(stored[0].content, "Old\n[x] <c>done</c>");
    }

    #[test]
    fn edit_requires_selection() {
        let (_tmp, store) = seeded_store();
        let mut view = NoteView::new(store.load().unwrap());
        assert!(view.begin_edit().is_err());
        assert!(view.replace_text("x").is_err());
        assert!(view.save(&store).is_err());
    }
}
