//! Medicine catalog interface and in-memory implementation.

use rxnear_core::Medicine;

use crate::StoreError;

/// Read-only medicine lookup used by availability scoring.
///
/// The four lookups match the resolution chain the scorer walks: exact name,
/// cross-field search, generic name, brand alias.
pub trait MedicineCatalog {
    /// Case-insensitive exact name match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying catalog failure.
    fn find_by_exact_name(&self, name: &str) -> Result<Option<Medicine>, StoreError>;

    /// Case-insensitive substring search across name, generic name, brand
    /// names, category, and description.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying catalog failure.
    fn search_all_fields(&self, term: &str) -> Result<Vec<Medicine>, StoreError>;

    /// Case-insensitive substring match on the generic name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying catalog failure.
    fn find_by_generic_name(&self, term: &str) -> Result<Vec<Medicine>, StoreError>;

    /// Case-insensitive substring match against brand-name aliases.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an underlying catalog failure.
    fn find_by_brand_alias(&self, term: &str) -> Result<Vec<Medicine>, StoreError>;
}

/// Immutable in-memory medicine snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMedicineCatalog {
    medicines: Vec<Medicine>,
}

impl InMemoryMedicineCatalog {
    #[must_use]
    pub fn new(medicines: Vec<Medicine>) -> Self {
        Self { medicines }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.medicines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.medicines.is_empty()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl MedicineCatalog for InMemoryMedicineCatalog {
    fn find_by_exact_name(&self, name: &str) -> Result<Option<Medicine>, StoreError> {
        let name = name.trim().to_lowercase();
        Ok(self
            .medicines
            .iter()
            .find(|m| m.name.to_lowercase() == name)
            .cloned())
    }

    fn search_all_fields(&self, term: &str) -> Result<Vec<Medicine>, StoreError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .medicines
            .iter()
            .filter(|m| {
                contains_ci(&m.name, &term)
                    || m.generic_name
                        .as_deref()
                        .is_some_and(|g| contains_ci(g, &term))
                    || m.brand_names.iter().any(|b| contains_ci(b, &term))
                    || m.category
                        .as_deref()
                        .is_some_and(|c| contains_ci(c, &term))
                    || m.description
                        .as_deref()
                        .is_some_and(|d| contains_ci(d, &term))
            })
            .cloned()
            .collect())
    }

    fn find_by_generic_name(&self, term: &str) -> Result<Vec<Medicine>, StoreError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .medicines
            .iter()
            .filter(|m| {
                m.generic_name
                    .as_deref()
                    .is_some_and(|g| contains_ci(g, &term))
            })
            .cloned()
            .collect())
    }

    fn find_by_brand_alias(&self, term: &str) -> Result<Vec<Medicine>, StoreError> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .medicines
            .iter()
            .filter(|m| m.brand_names.iter().any(|b| contains_ci(b, &term)))
            .cloned()
            .collect())
    }
}
