//! Keyboard and pointer shortcut reference shown in the help dialog.

/// A shortcut definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, description: &'static str) -> Self {
        Self { key, description }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Double-click", "Place a new card"),
            Shortcut::new("Drag canvas", "Pan the board"),
            Shortcut::new("Scroll", "Zoom around the cursor"),
            Shortcut::new("Drag card", "Move a card"),
            Shortcut::new("Drag corner", "Resize a card"),
            Shortcut::new("Drag anchor", "Draw an arrow, release near an anchor to attach"),
            Shortcut::new("Enter", "Embed the typed link"),
            Shortcut::new("Delete", "Delete selected arrow"),
            Shortcut::new("Backspace", "Delete selected arrow"),
            Shortcut::new("Escape", "Close help or clear selection"),
        ]
    }

    /// Lines for the help dialog, aligned into two columns.
    pub fn help_lines() -> Vec<String> {
        Self::all()
            .iter()
            .map(|shortcut| format!("{:14} {}", shortcut.key, shortcut.description))
            .collect()
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Shortcuts ===");
        for line in Self::help_lines() {
            println!("  {}", line);
        }
        println!();
    }
}
