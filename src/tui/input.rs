use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Pan(Direction),
    /// Add a sibling in normal mode, finish a link in connect mode.
    Activate,
    AddChild,
    Rename,
    DeleteNode,
    StartConnect,
    Disconnect,
    ToggleView,
    ToggleCollapse,
    ZoomIn,
    ZoomOut,
    Recenter,
    TogglePan,
    ToggleHelp,
    OpenSettings,
    Quit,
    SubmitText,
    Cancel,
    Backspace,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    if text_mode {
        return match key.code {
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::Move(Direction::Left),
            KeyCode::Right => Action::Move(Direction::Right),
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Up if shift => Action::Pan(Direction::Up),
        KeyCode::Down if shift => Action::Pan(Direction::Down),
        KeyCode::Left if shift => Action::Pan(Direction::Left),
        KeyCode::Right if shift => Action::Pan(Direction::Right),
        KeyCode::Up => Action::Move(Direction::Up),
        KeyCode::Down => Action::Move(Direction::Down),
        KeyCode::Left => Action::Move(Direction::Left),
        KeyCode::Right => Action::Move(Direction::Right),
        KeyCode::Enter => Action::Activate,
        KeyCode::Tab => Action::AddChild,
        KeyCode::Delete => Action::DeleteNode,
        KeyCode::F(2) => Action::Rename,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('0') => Action::Recenter,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('h') => Action::Move(Direction::Left),
        KeyCode::Char('j') => Action::Move(Direction::Down),
        KeyCode::Char('k') => Action::Move(Direction::Up),
        KeyCode::Char('l') => Action::Move(Direction::Right),
        KeyCode::Char('H') => Action::Pan(Direction::Left),
        KeyCode::Char('J') => Action::Pan(Direction::Down),
        KeyCode::Char('K') => Action::Pan(Direction::Up),
        KeyCode::Char('L') => Action::Pan(Direction::Right),
        KeyCode::Char('e') => Action::Rename,
        KeyCode::Char('D') => Action::DeleteNode,
        KeyCode::Char('c') => Action::StartConnect,
        KeyCode::Char('d') => Action::Disconnect,
        KeyCode::Char('v') => Action::ToggleView,
        KeyCode::Char('z') | KeyCode::Char(' ') => Action::ToggleCollapse,
        KeyCode::Char('p') => Action::TogglePan,
        KeyCode::Char('s') => Action::OpenSettings,
        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn editing_keys() {
        assert_eq!(action_for_key(key(KeyCode::Tab), false), Action::AddChild);
        assert_eq!(action_for_key(key(KeyCode::Enter), false), Action::Activate);
        assert_eq!(action_for_key(key(KeyCode::Char('e')), false), Action::Rename);
        assert_eq!(action_for_key(key(KeyCode::Delete), false), Action::DeleteNode);
        assert_eq!(action_for_key(key(KeyCode::Char('D')), false), Action::DeleteNode);
        assert_eq!(action_for_key(key(KeyCode::Char(' ')), false), Action::ToggleCollapse);
        assert_eq!(action_for_key(key(KeyCode::Char('v')), false), Action::ToggleView);
    }

    #[test]
    fn shift_arrows_pan() {
        let ev = KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(action_for_key(ev, false), Action::Pan(Direction::Left));
        assert_eq!(
            action_for_key(key(KeyCode::Left), false),
            Action::Move(Direction::Left)
        );
    }

    #[test]
    fn text_mode_captures_characters() {
        assert_eq!(action_for_key(key(KeyCode::Char('q')), true), Action::InputChar('q'));
        assert_eq!(action_for_key(key(KeyCode::Enter), true), Action::SubmitText);
        assert_eq!(action_for_key(key(KeyCode::Tab), true), Action::Noop);
    }
}
