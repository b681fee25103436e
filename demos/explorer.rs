use std::fmt;
use std::path::PathBuf;

use crossterm::event::{Event, KeyCode, MouseEventKind};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;
use ratatui::Terminal;

use growing_tree::{Tree, TreeView, TreeViewState};

const MAX_DEPTH: usize = 3;

/// A filesystem entry shown by its file name.
struct Entry {
    path: PathBuf,
    is_dir: bool,
    depth: usize,
}

impl Entry {
    fn new(path: PathBuf, depth: usize) -> Self {
        let is_dir = path.is_dir();
        Self {
            path,
            is_dir,
            depth,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().to_string(),
        );
        if self.is_dir {
            write!(f, "{name}/")
        } else {
            f.write_str(&name)
        }
    }
}

/// Directories grow their (non hidden) entries until [`MAX_DEPTH`].
fn grow(entry: &Entry) -> Vec<Entry> {
    if !entry.is_dir || entry.depth >= MAX_DEPTH {
        return Vec::new();
    }
    // Ignore errors. A real world file viewer should handle them.
    let Ok(read) = entry.path.read_dir() else {
        return Vec::new();
    };
    let mut children = read
        .flatten()
        .map(|child| child.path())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| !name.to_string_lossy().starts_with('.'))
        })
        .map(|path| Entry::new(path, entry.depth + 1))
        .collect::<Vec<_>>();
    children.sort_by(|a, b| a.path.cmp(&b.path));
    children
}

struct App {
    state: TreeViewState,
    tree: Tree<Entry>,
}

impl App {
    fn new() -> Self {
        let root = Entry::new(PathBuf::from("."), 0);
        let mut state = TreeViewState::default();
        state.open(vec![0]);
        Self {
            state,
            tree: Tree::grown(root, grow),
        }
    }
}

fn main() -> std::io::Result<()> {
    // Terminal initialization
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // App
    let app = App::new();
    let res = run_app(&mut terminal, app);

    // restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        let roots = [app.tree.root()];
        terminal.draw(|frame| {
            let area = frame.size();
            let widget = TreeView::forest(roots.to_vec())
                .block(
                    Block::bordered()
                        .title(format!("{} entries", app.tree.len()))
                        .title_bottom(format!("{:?}", app.state.selected())),
                )
                .highlight_style(
                    Style::new()
                        .fg(Color::Black)
                        .bg(Color::LightGreen)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol(">> ");
            frame.render_stateful_widget(widget, area, &mut app.state);
        })?;

        let state = &mut app.state;
        match crossterm::event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('\n' | ' ') => state.toggle_selected(),
                KeyCode::Left => state.key_left(),
                KeyCode::Right => state.key_right(),
                KeyCode::Down => state.key_down(&roots),
                KeyCode::Up => state.key_up(&roots),
                KeyCode::Home => state.select_first(&roots),
                KeyCode::End => state.select_last(&roots),
                KeyCode::PageDown => state.scroll_down(3),
                KeyCode::PageUp => state.scroll_up(3),
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => state.scroll_down(1),
                MouseEventKind::ScrollUp => state.scroll_up(1),
                _ => false,
            },
            _ => false,
        };
    }
}

#[test]
fn entries_remember_whether_they_are_directories() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let dir = Entry::new(manifest_dir.join("src"), 0);
    assert!(dir.is_dir);
    assert_eq!(dir.to_string(), "src/");
    assert!(grow(&dir).iter().any(|child| child.to_string() == "lib.rs"));

    let file = Entry::new(manifest_dir.join("Cargo.toml"), 0);
    assert!(!file.is_dir);
    assert_eq!(file.to_string(), "Cargo.toml");
    assert!(grow(&file).is_empty());
}
