//! Presentation of console state

use crate::console::ConsoleView;

/// Sink for console snapshots
///
/// The console logic never draws. Each UX tick it builds a
/// [`ConsoleView`] and hands it to the surface, which decides what
/// changed and how to show it.
pub trait RenderSurface {
    fn render(&mut self, view: &ConsoleView<'_>);
}
