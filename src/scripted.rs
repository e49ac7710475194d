use crate::browser::{BrowserSession, Locator};
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet};

/// What a scripted click does to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    Stay,
    Navigate(String),
    /// Navigate to the template with `{query}` replaced by the last typed
    /// text, modelling a search submission.
    NavigateToTyped(String),
}

#[derive(Debug, Clone, Default)]
pub struct PageFixture {
    pub texts: BTreeMap<Locator, String>,
    pub text_lists: BTreeMap<Locator, Vec<String>>,
    pub attributes: BTreeMap<(Locator, String), String>,
    pub clicks: BTreeMap<Locator, ClickEffect>,
    pub typeable: BTreeSet<Locator>,
}

impl PageFixture {
    pub fn with_text(mut self, locator: Locator, text: &str) -> Self {
        self.texts.insert(locator, text.to_string());
        self
    }

    pub fn with_texts(mut self, locator: Locator, texts: &[&str]) -> Self {
        self.text_lists
            .insert(locator, texts.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn with_attribute(mut self, locator: Locator, attribute: &str, value: &str) -> Self {
        self.attributes
            .insert((locator, attribute.to_string()), value.to_string());
        self
    }

    pub fn with_click(mut self, locator: Locator, effect: ClickEffect) -> Self {
        self.clicks.insert(locator, effect);
        self
    }

    pub fn with_typeable(mut self, locator: Locator) -> Self {
        self.typeable.insert(locator);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Navigate(String),
    ReadText(Locator),
    ReadAll(Locator),
    ReadAttribute(Locator, String),
    Click(Locator),
    Type(Locator, String),
    Back,
    Close,
}

/// In-memory [`BrowserSession`] replaying canned pages. Every interaction is
/// logged so tests can assert attempt order and short-circuiting. Navigating
/// to a URL without a fixture is allowed and simply makes every subsequent
/// lookup miss, the way an unexpected live layout would.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    pages: BTreeMap<String, PageFixture>,
    current: String,
    history: Vec<String>,
    last_typed: String,
    pub log: Vec<Interaction>,
    pub closed: bool,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_page(&mut self, url: &str, page: PageFixture) {
        self.pages.insert(url.to_string(), page);
    }

    pub fn current_url(&self) -> &str {
        &self.current
    }

    fn page(&self) -> Option<&PageFixture> {
        self.pages.get(&self.current)
    }

    fn move_to(&mut self, url: String) {
        if !self.current.is_empty() {
            self.history.push(std::mem::take(&mut self.current));
        }
        self.current = url;
    }
}

impl BrowserSession for ScriptedSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.log.push(Interaction::Navigate(url.to_string()));
        self.move_to(url.to_string());
        Ok(())
    }

    fn read_text(&mut self, locator: &Locator) -> Option<String> {
        self.log.push(Interaction::ReadText(locator.clone()));
        self.page()?.texts.get(locator).cloned()
    }

    fn read_all_texts(&mut self, locator: &Locator) -> Vec<String> {
        self.log.push(Interaction::ReadAll(locator.clone()));
        self.page()
            .and_then(|page| page.text_lists.get(locator).cloned())
            .unwrap_or_default()
    }

    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> Option<String> {
        self.log
            .push(Interaction::ReadAttribute(locator.clone(), attribute.to_string()));
        self.page()?
            .attributes
            .get(&(locator.clone(), attribute.to_string()))
            .cloned()
    }

    fn click(&mut self, locator: &Locator) -> bool {
        self.log.push(Interaction::Click(locator.clone()));
        let Some(effect) = self.page().and_then(|page| page.clicks.get(locator)).cloned() else {
            return false;
        };
        match effect {
            ClickEffect::Stay => true,
            ClickEffect::Navigate(url) => {
                self.move_to(url);
                true
            }
            ClickEffect::NavigateToTyped(template) => {
                let url = template.replace("{query}", &self.last_typed);
                self.move_to(url);
                true
            }
        }
    }

    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> bool {
        self.log
            .push(Interaction::Type(locator.clone(), text.to_string()));
        let typeable = self
            .page()
            .is_some_and(|page| page.typeable.contains(locator));
        if typeable {
            self.last_typed = text.to_string();
        }
        typeable
    }

    fn go_back(&mut self) {
        self.log.push(Interaction::Back);
        if let Some(previous) = self.history.pop() {
            self.current = previous;
        }
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Interaction::Close);
        self.closed = true;
        Ok(())
    }
}
