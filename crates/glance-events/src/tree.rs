// ABOUTME: Navigation tree events for selection, mouse and keyboard input
// ABOUTME: Emitted by tree widgets and consumed by the preview coordinator

use glance_types::{MouseButton, TreeId, TreeKey};

/// Events a navigation tree reports to its listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The tree's current selection changed (click or keyboard navigation)
    SelectionChanged { tree: TreeId },

    /// A mouse click landed on a tree node
    MouseClicked {
        tree: TreeId,
        button: MouseButton,
        click_count: u32,
    },

    /// A key was pressed while the tree had focus
    KeyPressed { tree: TreeId, key: TreeKey },
}

impl Event {
    pub fn tree(&self) -> TreeId {
        match self {
            Self::SelectionChanged { tree }
            | Self::MouseClicked { tree, .. }
            | Self::KeyPressed { tree, .. } => *tree,
        }
    }

    /// Left-button double click, the "pin this file" gesture
    pub fn is_double_click(&self) -> bool {
        matches!(
            self,
            Self::MouseClicked {
                button: MouseButton::Left,
                click_count: 2,
                ..
            }
        )
    }
}
