use std::ops::Range;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Block, StatefulWidget, Widget};
use unicode_width::UnicodeWidthStr;

use crate::flatten::Flattened;
use crate::model::TreeModel;
use crate::view_state::TreeViewState;

/// A terminal view on one or more trees.
///
/// Every node is shown with the [`text`](TreeModel::text) of its [`TreeModel`].
/// Which nodes are opened and selected is kept in the [`TreeViewState`].
///
/// # Example
///
/// ```
/// # use growing_tree::{Tree, TreeView, TreeViewState};
/// # use ratatui::backend::TestBackend;
/// # use ratatui::Terminal;
/// # use ratatui::widgets::Block;
/// # let mut terminal = Terminal::new(TestBackend::new(32, 32)).unwrap();
/// let tree = Tree::grown(3_u8, |n: &u8| (1..*n).collect::<Vec<_>>());
/// let mut state = TreeViewState::default();
///
/// terminal.draw(|frame| {
///     let area = frame.size();
///
///     let widget = TreeView::new(tree.root()).block(Block::bordered().title("Tree"));
///
///     frame.render_stateful_widget(widget, area, &mut state);
/// })?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[must_use]
#[derive(Debug, Clone)]
pub struct TreeView<'a, M> {
    roots: Vec<M>,

    block: Option<Block<'a>>,
    /// Style used as a base style for the widget
    style: Style,

    /// Style used to render the selected node
    highlight_style: Style,
    /// Symbol in front of the selected node (shifts all nodes to the right)
    highlight_symbol: &'a str,

    /// Symbol in front of a node whose children are hidden
    node_closed_symbol: &'a str,
    /// Symbol in front of a node whose children are shown
    node_open_symbol: &'a str,
    /// Symbol in front of a node without children
    node_no_children_symbol: &'a str,
}

impl<'a, M> TreeView<'a, M>
where
    M: TreeModel + Clone,
{
    /// Show a single tree starting at `root`.
    pub fn new(root: M) -> Self {
        Self::forest(vec![root])
    }

    /// Show multiple trees next to each other on the top level.
    pub fn forest(roots: Vec<M>) -> Self {
        Self {
            roots,
            block: None,
            style: Style::new(),
            highlight_style: Style::new(),
            highlight_symbol: "",
            node_closed_symbol: "\u{25b6} ", // Arrow to right
            node_open_symbol: "\u{25bc} ",   // Arrow down
            node_no_children_symbol: "  ",
        }
    }

    #[must_use]
    pub fn roots(&self) -> &[M] {
        &self.roots
    }

    #[allow(clippy::missing_const_for_fn)]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub const fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }

    pub const fn highlight_symbol(mut self, highlight_symbol: &'a str) -> Self {
        self.highlight_symbol = highlight_symbol;
        self
    }

    pub const fn node_closed_symbol(mut self, symbol: &'a str) -> Self {
        self.node_closed_symbol = symbol;
        self
    }

    pub const fn node_open_symbol(mut self, symbol: &'a str) -> Self {
        self.node_open_symbol = symbol;
        self
    }

    pub const fn node_no_children_symbol(mut self, symbol: &'a str) -> Self {
        self.node_no_children_symbol = symbol;
        self
    }
}

/// A visible node together with its text.
struct Row<M> {
    flattened: Flattened<M>,
    text: Text<'static>,
}

impl<M: TreeModel> Row<M> {
    fn new(flattened: Flattened<M>) -> Self {
        let text = Text::raw(flattened.item.text());
        Self { flattened, text }
    }

    fn height(&self) -> usize {
        self.text.height()
    }
}

/// The rows starting at `offset` which fit into `available` lines.
///
/// With `keep` the window is moved until that row is inside of it.
fn scroll_window(
    heights: &[usize],
    offset: usize,
    available: usize,
    keep: Option<usize>,
) -> Range<usize> {
    // Keep at least the last row visible
    let mut start = offset.min(heights.len().saturating_sub(1));
    if let Some(keep) = keep {
        start = start.min(keep);
    }

    let mut used = 0;
    let mut end = start;
    while let Some(&height) = heights.get(end) {
        if used + height > available {
            break;
        }
        used += height;
        end += 1;
    }

    if let Some(keep) = keep {
        while end <= keep {
            used += heights[end];
            end += 1;
            while used > available {
                used = used.saturating_sub(heights[start]);
                start += 1;
            }
        }
    }

    start..end
}

/// Write `symbol` at `x` without crossing the right edge of `area`.
/// Returns the column after it.
fn put(buf: &mut Buffer, area: Rect, x: u16, symbol: &str, style: Style) -> u16 {
    let max_width = area.right().saturating_sub(x);
    let (x, _) = buf.set_stringn(x, area.y, symbol, usize::from(max_width), style);
    x
}

impl<'a, M> TreeView<'a, M>
where
    M: TreeModel + Clone,
{
    fn node_symbol(&self, row: &Row<M>, state: &TreeViewState) -> &'a str {
        if row.flattened.item.is_leaf() {
            self.node_no_children_symbol
        } else if state.opened.contains(&row.flattened.identifier) {
            self.node_open_symbol
        } else {
            self.node_closed_symbol
        }
    }

    /// Draw `row` into `area`: gutter, indentation, node symbol and finally the text.
    fn render_row(
        &self,
        buf: &mut Buffer,
        area: Rect,
        row: &Row<M>,
        gutter: Option<&str>,
        state: &TreeViewState,
    ) {
        buf.set_style(area, self.style);

        let mut x = area.x;
        if let Some(gutter) = gutter {
            x = put(buf, area, x, gutter, self.style);
        }
        x = put(buf, area, x, &" ".repeat(row.flattened.depth() * 2), self.style);
        x = put(buf, area, x, self.node_symbol(row, state), self.style);

        let max_width = area.right().saturating_sub(x);
        for (line, y) in row.text.lines.iter().zip(area.y..area.bottom()) {
            buf.set_line(x, y, line, max_width);
        }
    }
}

impl<M> StatefulWidget for TreeView<'_, M>
where
    M: TreeModel + Clone,
{
    type State = TreeViewState;

    fn render(mut self, full_area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        buf.set_style(full_area, self.style);

        let area = self.block.take().map_or(full_area, |block| {
            let inner_area = block.inner(full_area);
            block.render(full_area, buf);
            inner_area
        });
        if area.is_empty() {
            return;
        }

        let rows = state
            .flatten(&self.roots)
            .into_iter()
            .map(Row::new)
            .collect::<Vec<_>>();
        if rows.is_empty() {
            return;
        }

        let has_selection = !state.selected.is_empty();
        let keep = if state.ensure_selected_in_view_on_next_render && has_selection {
            rows.iter()
                .position(|row| row.flattened.identifier == state.selected)
        } else {
            None
        };
        let heights = rows.iter().map(Row::height).collect::<Vec<_>>();
        let window = scroll_window(&heights, state.offset, usize::from(area.height), keep);
        state.offset = window.start;
        state.ensure_selected_in_view_on_next_render = false;

        let blank = " ".repeat(self.highlight_symbol.width());
        let mut y = area.y;
        for row in &rows[window] {
            let height = u16::try_from(row.height()).unwrap_or(area.height);
            let row_area = Rect::new(area.x, y, area.width, height).intersection(area);
            y = y.saturating_add(height);

            let is_selected = row.flattened.identifier == state.selected;
            let gutter = has_selection.then(|| {
                if is_selected {
                    self.highlight_symbol
                } else {
                    blank.as_str()
                }
            });
            self.render_row(buf, row_area, row, gutter, state);
            if is_selected {
                buf.set_style(row_area, self.highlight_style);
            }
        }
    }
}

impl<M> Widget for TreeView<'_, M>
where
    M: TreeModel + Clone,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut state = TreeViewState::default();
        StatefulWidget::render(self, area, buf, &mut state);
    }
}

#[cfg(test)]
fn render(
    view: TreeView<'_, crate::NodeRef<'_, &str>>,
    state: &mut TreeViewState,
    width: u16,
    height: u16,
) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    StatefulWidget::render(view, area, &mut buffer, state);
    buffer
}

#[test]
fn closed_root_hides_children() {
    let tree = crate::flatten::example();
    let buffer = render(TreeView::new(tree.root()), &mut TreeViewState::default(), 8, 2);
    assert_eq!(buffer, Buffer::with_lines(vec!["▶ root  ", "        "]));
}

#[test]
fn opened_nodes_are_indented() {
    let tree = crate::flatten::example();
    let mut state = TreeViewState::default();
    state.open(vec![0]);
    state.open(vec![0, 1]);
    let buffer = render(TreeView::new(tree.root()), &mut state, 10, 7);
    assert_eq!(
        buffer,
        Buffer::with_lines(vec![
            "▼ root    ",
            "    a     ",
            "  ▼ b     ",
            "      c   ",
            "    ▶ d   ",
            "      g   ",
            "    h     ",
        ])
    );
}

#[test]
fn selection_is_scrolled_into_view() {
    let tree = crate::flatten::example();
    let mut state = TreeViewState::default();
    state.open(vec![0]);
    state.select(vec![0, 2]);
    let view = TreeView::new(tree.root()).highlight_symbol(">");
    let buffer = render(view, &mut state, 7, 2);
    assert_eq!(state.get_offset(), 2);
    assert_eq!(buffer, Buffer::with_lines(vec!["   ▶ b ", ">    h "]));
}

#[test]
fn too_small_area_renders_nothing() {
    let tree = crate::flatten::example();
    let mut state = TreeViewState::default();
    let buffer = render(TreeView::new(tree.root()), &mut state, 0, 0);
    assert_eq!(buffer.area.area(), 0);
}

#[test]
fn scroll_window_fills_from_the_offset() {
    assert_eq!(scroll_window(&[1, 1, 1, 1], 1, 2, None), 1..3);
    // An offset behind the end still shows the last row
    assert_eq!(scroll_window(&[1, 1, 1, 1], 10, 2, None), 3..4);
}

#[test]
fn scroll_window_moves_to_the_kept_row() {
    assert_eq!(scroll_window(&[1, 1, 1, 1], 0, 2, Some(3)), 2..4);
    assert_eq!(scroll_window(&[1, 1, 1, 1], 3, 2, Some(0)), 0..2);
    assert_eq!(scroll_window(&[2, 1, 1], 0, 2, Some(2)), 1..3);
}
