use anyhow::Result;

/// A single page-location descriptor. Ordered and hashable so candidate lists
/// and test fixtures can key on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locator {
    Css(String),
    XPath(String),
    /// Anchor whose visible text equals the value exactly.
    LinkText(String),
}

impl Locator {
    pub fn css(selector: &str) -> Self {
        Locator::Css(selector.to_string())
    }

    pub fn xpath(expression: &str) -> Self {
        Locator::XPath(expression.to_string())
    }

    pub fn link_text(text: &str) -> Self {
        Locator::LinkText(text.to_string())
    }
}

/// The automation capabilities the extractors consume. A lookup or interaction
/// miss is a value (`None`, `false`, empty vec), not an error; `Err` is
/// reserved for session-level faults such as a failed navigation.
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn read_text(&mut self, locator: &Locator) -> Option<String>;
    fn read_all_texts(&mut self, locator: &Locator) -> Vec<String>;
    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> Option<String>;
    fn click(&mut self, locator: &Locator) -> bool;
    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> bool;
    fn go_back(&mut self);
    fn close(&mut self) -> Result<()>;
}
