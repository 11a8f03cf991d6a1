//! Gallery catalog browser
//!
//! Steps through the catalog with previous/next controls, wrapping at both
//! ends.

use crate::catalog::{Catalog, ModelDescriptor};

#[derive(Debug, Clone, Default)]
pub struct CatalogBrowser {
    index: usize,
}

impl CatalogBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current<'a>(&self, catalog: &'a Catalog) -> Option<&'a ModelDescriptor> {
        catalog.get(self.index)
    }

    pub fn next(&mut self, catalog: &Catalog) {
        if !catalog.is_empty() {
            self.index = (self.index + 1) % catalog.len();
        }
    }

    pub fn prev(&mut self, catalog: &Catalog) {
        if !catalog.is_empty() {
            self.index = (self.index + catalog.len() - 1) % catalog.len();
        }
    }

    /// Jump to the model anchored to marker `index`
    pub fn show(&mut self, catalog: &Catalog, index: usize) {
        if index < catalog.len() {
            self.index = index;
        }
    }

    /// e.g. "Modelo 3 de 9"
    pub fn position_text(&self, catalog: &Catalog) -> String {
        format!("Modelo {} de {}", self.index + 1, catalog.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_ways() {
        let catalog = Catalog::builtin().unwrap();
        let mut browser = CatalogBrowser::new();

        browser.prev(&catalog);
        assert_eq!(browser.index(), catalog.len() - 1);
        browser.next(&catalog);
        assert_eq!(browser.index(), 0);
        assert_eq!(browser.current(&catalog).unwrap().id, "telstar");
        assert_eq!(browser.position_text(&catalog), "Modelo 1 de 9");
    }

    #[test]
    fn test_show_ignores_unknown_index() {
        let catalog = Catalog::builtin().unwrap();
        let mut browser = CatalogBrowser::new();
        browser.show(&catalog, 4);
        assert_eq!(browser.index(), 4);
        browser.show(&catalog, 40);
        assert_eq!(browser.index(), 4);
    }
}
