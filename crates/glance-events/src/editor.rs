// ABOUTME: Editor manager notifications around opening, closing and switching tabs
// ABOUTME: Before-events fire ahead of the change, after-events once it has applied

use glance_types::FileHandle;

/// Editor manager domain events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A tab for `file` is about to open
    BeforeOpen { file: FileHandle },

    /// The tab for `file` is about to close
    BeforeClose { file: FileHandle },

    /// A tab for `file` has opened
    AfterOpen { file: FileHandle },

    /// The tab for `file` has closed
    AfterClose { file: FileHandle },

    /// The active editor tab changed; `new_file` is None when no tab is left
    SelectionChanged { new_file: Option<FileHandle> },
}

impl Event {
    pub fn file(&self) -> Option<&FileHandle> {
        match self {
            Self::BeforeOpen { file }
            | Self::BeforeClose { file }
            | Self::AfterOpen { file }
            | Self::AfterClose { file } => Some(file),
            Self::SelectionChanged { new_file } => new_file.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_accessor() {
        let file = FileHandle::new("/work/a.rs");
        assert_eq!(
            Event::BeforeOpen { file: file.clone() }.file(),
            Some(&file)
        );
        assert_eq!(Event::SelectionChanged { new_file: None }.file(), None);
        assert_eq!(
            Event::SelectionChanged {
                new_file: Some(file.clone())
            }
            .file(),
            Some(&file)
        );
    }
}
