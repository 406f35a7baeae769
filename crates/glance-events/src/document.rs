// ABOUTME: Document content events raised by the document observer
// ABOUTME: Used to promote previews into permanent tabs when they are edited

use glance_types::FileHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The content of a watched file was modified
    ContentChanged { file: FileHandle },
}

impl Event {
    pub fn file(&self) -> &FileHandle {
        match self {
            Self::ContentChanged { file } => file,
        }
    }
}
