// ABOUTME: Captures and restores editor view state when a preview tab is reused
// ABOUTME: Snapshot kinds are chosen from an ordered provider list, most specific first

use glance_logging::trace;

/// What kind of editor a view hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    Text,
    /// Text editor with a rendered preview pane next to it (markdown and friends)
    TextWithPreview,
    Image,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitLayout {
    EditorOnly,
    PreviewOnly,
    EditorAndPreview,
}

/// View state access for a single editor
pub trait EditorView {
    fn kind(&self) -> EditorKind;

    fn caret_offset(&self) -> usize;

    fn set_caret_offset(&mut self, offset: usize);

    /// First visible line
    fn scroll_top(&self) -> usize;

    fn set_scroll_top(&mut self, line: usize);

    fn split_layout(&self) -> Option<SplitLayout> {
        None
    }

    fn set_split_layout(&mut self, _layout: SplitLayout) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextState {
    pub caret_offset: usize,
    pub scroll_top: usize,
}

impl TextState {
    fn capture(view: &dyn EditorView) -> Self {
        Self {
            caret_offset: view.caret_offset(),
            scroll_top: view.scroll_top(),
        }
    }

    fn restore(&self, view: &mut dyn EditorView) {
        view.set_caret_offset(self.caret_offset);
        view.set_scroll_top(self.scroll_top);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSnapshot {
    Text(TextState),
    TextWithPreview { text: TextState, layout: SplitLayout },
}

impl EditorSnapshot {
    pub fn restore(&self, view: &mut dyn EditorView) {
        match self {
            Self::Text(text) => text.restore(view),
            Self::TextWithPreview { text, layout } => {
                text.restore(view);
                view.set_split_layout(*layout);
            }
        }
    }
}

pub type Predicate = fn(&dyn EditorView) -> bool;
pub type Constructor = fn(&dyn EditorView) -> EditorSnapshot;

fn is_text_with_preview(view: &dyn EditorView) -> bool {
    view.kind() == EditorKind::TextWithPreview
}

fn is_text(view: &dyn EditorView) -> bool {
    matches!(view.kind(), EditorKind::Text | EditorKind::TextWithPreview)
}

fn capture_text_with_preview(view: &dyn EditorView) -> EditorSnapshot {
    EditorSnapshot::TextWithPreview {
        text: TextState::capture(view),
        layout: view.split_layout().unwrap_or(SplitLayout::EditorAndPreview),
    }
}

fn capture_text(view: &dyn EditorView) -> EditorSnapshot {
    EditorSnapshot::Text(TextState::capture(view))
}

/// Ordered `(predicate, constructor)` pairs; the first matching predicate wins
pub struct EditorSnapshotFactory {
    providers: Vec<(Predicate, Constructor)>,
}

impl Default for EditorSnapshotFactory {
    fn default() -> Self {
        Self {
            providers: vec![
                (
                    is_text_with_preview as Predicate,
                    capture_text_with_preview as Constructor,
                ),
                (is_text as Predicate, capture_text as Constructor),
            ],
        }
    }
}

impl EditorSnapshotFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider that is consulted before all existing ones
    pub fn with_provider(mut self, predicate: Predicate, constructor: Constructor) -> Self {
        self.providers.insert(0, (predicate, constructor));
        self
    }

    /// Snapshot `view`, or None when no provider supports it
    pub fn capture(&self, view: Option<&dyn EditorView>) -> Option<EditorSnapshot> {
        let view = view?;
        let snapshot = self
            .providers
            .iter()
            .find(|(supports, _)| supports(view))
            .map(|(_, capture)| capture(view));

        if snapshot.is_none() {
            trace!(kind = ?view.kind(), "No snapshot provider for editor");
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct View {
        kind: EditorKind,
        caret: usize,
        top: usize,
        layout: Option<SplitLayout>,
    }

    impl View {
        fn new(kind: EditorKind) -> Self {
            Self {
                kind,
                caret: 0,
                top: 0,
                layout: None,
            }
        }
    }

    impl EditorView for View {
        fn kind(&self) -> EditorKind {
            self.kind
        }

        fn caret_offset(&self) -> usize {
            self.caret
        }

        fn set_caret_offset(&mut self, offset: usize) {
            self.caret = offset;
        }

        fn scroll_top(&self) -> usize {
            self.top
        }

        fn set_scroll_top(&mut self, line: usize) {
            self.top = line;
        }

        fn split_layout(&self) -> Option<SplitLayout> {
            self.layout
        }

        fn set_split_layout(&mut self, layout: SplitLayout) {
            self.layout = Some(layout);
        }
    }

    #[test]
    fn test_most_specific_provider_wins() {
        let factory = EditorSnapshotFactory::new();
        let mut view = View::new(EditorKind::TextWithPreview);
        view.caret = 42;
        view.layout = Some(SplitLayout::PreviewOnly);

        let snapshot = factory.capture(Some(&view)).unwrap();
        assert_eq!(
            snapshot,
            EditorSnapshot::TextWithPreview {
                text: TextState {
                    caret_offset: 42,
                    scroll_top: 0
                },
                layout: SplitLayout::PreviewOnly,
            }
        );
    }

    #[test]
    fn test_restore_into_reused_view() {
        let factory = EditorSnapshotFactory::new();
        let mut source = View::new(EditorKind::Text);
        source.caret = 7;
        source.top = 120;

        let snapshot = factory.capture(Some(&source)).unwrap();
        let mut target = View::new(EditorKind::Text);
        snapshot.restore(&mut target);

        assert_eq!((target.caret, target.top), (7, 120));
    }

    #[test]
    fn test_unsupported_editor_has_no_snapshot() {
        let factory = EditorSnapshotFactory::new();
        assert_eq!(factory.capture(Some(&View::new(EditorKind::Image))), None);
        assert_eq!(factory.capture(None), None);
    }

    #[test]
    fn test_custom_provider_takes_precedence() {
        fn is_image(view: &dyn EditorView) -> bool {
            view.kind() == EditorKind::Image
        }
        fn capture_image(view: &dyn EditorView) -> EditorSnapshot {
            EditorSnapshot::Text(TextState {
                caret_offset: 0,
                scroll_top: view.scroll_top(),
            })
        }

        let factory = EditorSnapshotFactory::new().with_provider(is_image, capture_image);
        let mut view = View::new(EditorKind::Image);
        view.top = 3;

        assert_eq!(
            factory.capture(Some(&view)),
            Some(EditorSnapshot::Text(TextState {
                caret_offset: 0,
                scroll_top: 3
            }))
        );
    }
}
