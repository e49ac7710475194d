use crate::browser::{BrowserSession, Locator};
use anyhow::{Context, Result, anyhow};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::sync::Arc;
use tracing::{debug, warn};

/// [`BrowserSession`] backed by a headless Chrome tab. One session per
/// extractor; the browser process lives as long as the session.
pub struct ChromeSession {
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch() -> Result<Self> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|err| anyhow!("failed to assemble chrome launch options: {err}"))?;
        let browser = Browser::new(options).context("failed to launch chrome")?;
        let tab = browser.new_tab().context("failed to open a browser tab")?;
        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn find(&self, locator: &Locator) -> Option<Element<'_>> {
        match locator {
            Locator::Css(selector) => self.tab.find_element(selector).ok(),
            Locator::XPath(expression) => self.tab.find_element_by_xpath(expression).ok(),
            Locator::LinkText(text) => {
                self.tab.find_element_by_xpath(&link_text_xpath(text)).ok()
            }
        }
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("failed to navigate to {url}"))?;
        self.tab
            .wait_until_navigated()
            .with_context(|| format!("navigation to {url} did not settle"))?;
        Ok(())
    }

    fn read_text(&mut self, locator: &Locator) -> Option<String> {
        self.find(locator)?.get_inner_text().ok()
    }

    fn read_all_texts(&mut self, locator: &Locator) -> Vec<String> {
        let found = match locator {
            Locator::Css(selector) => self.tab.find_elements(selector),
            Locator::XPath(expression) => self.tab.find_elements_by_xpath(expression),
            Locator::LinkText(text) => self.tab.find_elements_by_xpath(&link_text_xpath(text)),
        };
        found
            .map(|elements| {
                elements
                    .iter()
                    .filter_map(|element| element.get_inner_text().ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn read_attribute(&mut self, locator: &Locator, attribute: &str) -> Option<String> {
        self.find(locator)?.get_attribute_value(attribute).ok()?
    }

    fn click(&mut self, locator: &Locator) -> bool {
        let Some(element) = self.find(locator) else {
            return false;
        };
        element.click().is_ok()
    }

    fn clear_and_type(&mut self, locator: &Locator, text: &str) -> bool {
        let Some(element) = self.find(locator) else {
            return false;
        };
        if element
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .is_err()
        {
            return false;
        }
        element.type_into(text).is_ok()
    }

    fn go_back(&mut self) {
        if let Err(err) = self.tab.evaluate("window.history.back()", false) {
            warn!(error = %err, "history.back() failed; staying on the current page");
            return;
        }
        if let Err(err) = self.tab.wait_until_navigated() {
            debug!(error = %err, "back navigation did not settle");
        }
    }

    fn close(&mut self) -> Result<()> {
        self.tab
            .close(true)
            .map(|_| ())
            .context("failed to close browser tab")
    }
}

// concat() sidesteps XPath quoting when the link text itself contains an
// apostrophe, which product names occasionally do.
fn link_text_xpath(text: &str) -> String {
    if text.contains('\'') {
        let parts: Vec<String> = text
            .split('\'')
            .map(|part| format!("'{part}'"))
            .collect();
        format!(
            "//a[normalize-space(.)=concat({})]",
            parts.join(", \"'\", ")
        )
    } else {
        format!("//a[normalize-space(.)='{text}']")
    }
}
