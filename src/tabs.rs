use tracing::debug;

use crate::page::TabSection;

/// Shows exactly one tab section at a time.
pub struct TabController;

impl TabController {
    /// Hide every section, then reveal the one matching `id`.
    ///
    /// An unknown id leaves every section hidden. Returns whether a section
    /// was revealed.
    pub fn show(sections: &mut [TabSection], id: &str) -> bool {
        for section in sections.iter_mut() {
            section.set_visible(false);
        }
        match sections.iter_mut().find(|section| section.id() == id) {
            Some(section) => {
                section.set_visible(true);
                true
            }
            None => {
                debug!(tab = id, "no tab section matches");
                false
            }
        }
    }
}
