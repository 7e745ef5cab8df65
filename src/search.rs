use crate::api::{RecipeApi, RecipeSummary};
use crate::error::AppResult;

/// A query and the results of its most recent completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Search {
    pub query: String,
    pub results: Vec<RecipeSummary>,
}

impl Search {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
        }
    }

    /// Replaces `results` wholesale on success; leaves them untouched on
    /// failure.
    pub async fn search(&mut self, api: &dyn RecipeApi) -> AppResult<&[RecipeSummary]> {
        let results = api.search(&self.query).await?;
        log::debug!("Search {:?} returned {} results", self.query, results.len());
        self.results = results;
        Ok(&self.results)
    }

    /// One-based page of results; pages past the end are empty.
    pub fn paginate(&self, page: usize, page_size: usize) -> &[RecipeSummary] {
        if page == 0 || page_size == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(page_size);
        if start >= self.results.len() {
            return &[];
        }
        let end = start.saturating_add(page_size).min(self.results.len());
        &self.results[start..end]
    }

    pub fn num_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.results.len().div_ceil(page_size)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.results.iter().position(|r| r.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_with(n: usize) -> Search {
        let mut search = Search::new("pasta");
        search.results = (0..n)
            .map(|i| RecipeSummary {
                id: i.to_string(),
                title: format!("Pasta {i}"),
                author: "Ann".into(),
                image: String::new(),
            })
            .collect();
        search
    }

    #[test]
    fn pages_are_one_based_slices() {
        let search = search_with(25);
        assert_eq!(search.paginate(1, 10).len(), 10);
        assert_eq!(search.paginate(1, 10)[0].id, "0");
        assert_eq!(search.paginate(3, 10).len(), 5);
        assert_eq!(search.paginate(3, 10)[0].id, "20");
        assert_eq!(search.num_pages(10), 3);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let search = search_with(5);
        assert!(search.paginate(0, 10).is_empty());
        assert!(search.paginate(2, 10).is_empty());
        assert!(search.paginate(usize::MAX, 10).is_empty());
        assert!(search.paginate(1, 0).is_empty());
        assert!(Search::new("x").paginate(1, 10).is_empty());
    }

    #[test]
    fn position_finds_result() {
        let search = search_with(3);
        assert_eq!(search.position("2"), Some(2));
        assert_eq!(search.position("9"), None);
    }
}
