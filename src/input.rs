//! Input mode gate and the text buffers that go with it.
//!
//! `InputGate` holds the single authoritative mode record. The key dispatcher
//! reads `suppresses_hotkeys()` directly before acting on any single-key
//! command, so a keypress can never observe a stale mode.

/// Visibility/mode record. The three fields are independent of each other.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputMode {
    pub searching: bool,
    pub deck_import_open: bool,
    pub deck_browse_open: bool,
}

#[derive(Debug, Default)]
pub struct InputGate {
    mode: InputMode,
}

impl InputGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_searching(&self) -> bool {
        self.mode.searching
    }

    /// True while free text is being typed; all single-key commands are off.
    pub fn suppresses_hotkeys(&self) -> bool {
        self.mode.searching
    }

    pub fn enter_search(&mut self) {
        self.mode.searching = true;
    }

    pub fn exit_search(&mut self) {
        self.mode.searching = false;
    }

    pub fn toggle_deck_import(&mut self) {
        self.mode.deck_import_open = !self.mode.deck_import_open;
    }

    pub fn close_deck_import(&mut self) {
        self.mode.deck_import_open = false;
    }

    pub fn toggle_deck_browse(&mut self) {
        self.mode.deck_browse_open = !self.mode.deck_browse_open;
    }

    pub fn close_deck_browse(&mut self) {
        self.mode.deck_browse_open = false;
    }
}

/// Single-key board commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hotkey {
    AddCard,
    Reset,
    DeckImport,
    SavedDecks,
    DrawCard,
}

impl Hotkey {
    pub const ALL: [Hotkey; 5] = [
        Hotkey::AddCard,
        Hotkey::Reset,
        Hotkey::DeckImport,
        Hotkey::SavedDecks,
        Hotkey::DrawCard,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'e' => Some(Hotkey::AddCard),
            'r' => Some(Hotkey::Reset),
            'd' => Some(Hotkey::DeckImport),
            's' => Some(Hotkey::SavedDecks),
            'q' => Some(Hotkey::DrawCard),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Hotkey::AddCard => 'e',
            Hotkey::Reset => 'r',
            Hotkey::DeckImport => 'd',
            Hotkey::SavedDecks => 's',
            Hotkey::DrawCard => 'q',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Hotkey::AddCard => "Add Card",
            Hotkey::Reset => "Reset",
            Hotkey::DeckImport => "Deck Import",
            Hotkey::SavedDecks => "Saved Decks",
            Hotkey::DrawCard => "Draw Card",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeckField {
    #[default]
    Name,
    List,
}

/// Caller-visible text entry state.
#[derive(Debug, Default)]
pub struct TextBuffers {
    pub search: String,
    pub deck_name: String,
    pub deck_list: String,
    pub deck_field: DeckField,
}

impl TextBuffers {
    pub fn clear_deck_form(&mut self) {
        self.deck_name.clear();
        self.deck_list.clear();
        self.deck_field = DeckField::Name;
    }

    pub fn next_deck_field(&mut self) {
        self.deck_field = match self.deck_field {
            DeckField::Name => DeckField::List,
            DeckField::List => DeckField::Name,
        };
    }

    pub fn focused_deck_field_mut(&mut self) -> &mut String {
        match self.deck_field {
            DeckField::Name => &mut self.deck_name,
            DeckField::List => &mut self.deck_list,
        }
    }

    /// Pasted text; the name field only keeps the first line.
    pub fn paste_into_deck_form(&mut self, text: &str) {
        match self.deck_field {
            DeckField::Name => {
                let line = text.lines().next().unwrap_or("");
                self.deck_name.push_str(line);
            }
            DeckField::List => self.deck_list.push_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_deck_import() {
        let mut gate = InputGate::new();
        for searching in [false, true] {
            if searching {
                gate.enter_search();
            }
            let before = gate.mode().deck_import_open;
            gate.toggle_deck_import();
            assert_ne!(gate.mode().deck_import_open, before);
            gate.toggle_deck_import();
            assert_eq!(gate.mode().deck_import_open, before);
            assert_eq!(gate.is_searching(), searching);
        }
    }

    #[test]
    fn flags_are_independent() {
        let mut gate = InputGate::new();
        gate.toggle_deck_import();
        gate.toggle_deck_browse();
        gate.enter_search();
        assert_eq!(
            gate.mode(),
            InputMode { searching: true, deck_import_open: true, deck_browse_open: true }
        );

        gate.close_deck_browse();
        assert!(gate.mode().deck_import_open);
        assert!(gate.is_searching());
    }

    #[test]
    fn only_searching_suppresses_hotkeys() {
        let mut gate = InputGate::new();
        gate.toggle_deck_import();
        gate.toggle_deck_browse();
        assert!(!gate.suppresses_hotkeys());
        gate.enter_search();
        assert!(gate.suppresses_hotkeys());
        gate.exit_search();
        assert!(!gate.suppresses_hotkeys());
    }

    #[test]
    fn hotkeys_round_trip_through_their_key() {
        for hk in Hotkey::ALL {
            assert_eq!(Hotkey::from_char(hk.key()), Some(hk));
        }
        assert_eq!(Hotkey::from_char('E'), None);
        assert_eq!(Hotkey::from_char('x'), None);
    }

    #[test]
    fn paste_fills_focused_deck_field() {
        let mut buf = TextBuffers::default();
        buf.paste_into_deck_form("Mono Green\nignored");
        buf.next_deck_field();
        buf.paste_into_deck_form("4 Llanowar Elves\n20 Forest");
        assert_eq!(buf.deck_name, "Mono Green");
        assert_eq!(buf.deck_list, "4 Llanowar Elves\n20 Forest");

        buf.clear_deck_form();
        assert!(buf.deck_name.is_empty() && buf.deck_list.is_empty());
        assert_eq!(buf.deck_field, DeckField::Name);
    }
}
