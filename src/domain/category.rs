use serde::Serialize;

pub type CategoryId = &'static str;

/// A fixed spending bucket. Categories are compiled into the binary and
/// never change while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    /// Stable identifier used by forms and exports
    pub id: CategoryId,
    /// Display name
    pub name: &'static str,
    /// Icon glyph shown next to the name
    pub icon: &'static str,
}

impl Category {
    pub const fn new(id: CategoryId, name: &'static str, icon: &'static str) -> Self {
        Self { id, name, icon }
    }

    /// Icon and name, e.g. "☕️ Coffee & Drinks".
    pub fn label(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The spending categories, in display order.
pub const CATEGORIES: [Category; 8] = [
    Category::new("eat-out", "Eat Outside", "\u{1F374}"),
    Category::new("coffee", "Coffee & Drinks", "\u{2615}\u{FE0F}"),
    Category::new("groceries", "Groceries", "\u{1F345}"),
    Category::new("car", "Car & Gas", "\u{1F697}"),
    Category::new("fun", "Fun", "\u{2728}"),
    Category::new("fitness", "Fitness", "\u{1F3CB}\u{FE0F}"),
    Category::new("home", "Home", "\u{1F3E0}"),
    Category::new("other", "Other", "\u{26A1}\u{FE0F}"),
];

/// Look up a category in a category table by id.
pub fn lookup_category<'a>(categories: &'a [Category], id: &str) -> Option<&'a Category> {
    categories.iter().find(|c| c.id == id)
}
