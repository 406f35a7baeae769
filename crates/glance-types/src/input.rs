// ABOUTME: Input vocabulary shared by navigation trees and the preview coordinator
// ABOUTME: Mouse buttons, key presses and the one-click/two-click toggle threshold

use serde::{Deserialize, Serialize};

/// Mouse button reported with a tree click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Keys the preview coordinator reacts to on a focused tree.
///
/// Plain navigation (arrows, page up/down) is reported by trees as a
/// selection change and never reaches the coordinator as a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeKey {
    Enter,
    Space,
    Escape,
    Other,
}

/// Number of clicks needed to expand or collapse a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToggleClickCount {
    One,
    #[default]
    Two,
}

impl ToggleClickCount {
    pub fn from_one_click(one_click: bool) -> Self {
        if one_click { Self::One } else { Self::Two }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_click_count() {
        assert_eq!(ToggleClickCount::from_one_click(true), ToggleClickCount::One);
        assert_eq!(ToggleClickCount::from_one_click(false), ToggleClickCount::Two);
        assert_eq!(ToggleClickCount::One.as_u32(), 1);
        assert_eq!(ToggleClickCount::default().as_u32(), 2);
    }
}
