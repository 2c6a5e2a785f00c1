// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Página (a partir de 1)
    pub page: Option<u32>,
    /// Itens por página (máximo 100)
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page() - 1) * self.limit()
    }
}

/// Envelope paginado: `{count, next, previous, results}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `path` é o caminho da rota, usado para montar os links de navegação.
    pub fn new(results: Vec<T>, count: i64, query: &PageQuery, path: &str) -> Self {
        let page = query.page();
        let size = query.page_size();
        let link = |p: u32| format!("{path}?page={p}&page_size={size}");

        let has_next = i64::from(page) * i64::from(size) < count;
        Self {
            count,
            next: has_next.then(|| link(page + 1)),
            previous: (page > 1).then(|| link(page - 1)),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_links() {
        let query = PageQuery { page: Some(2), page_size: Some(10) };
        assert_eq!(query.offset(), 10);
        assert_eq!(query.limit(), 10);

        let page = Page::new(vec![1, 2, 3], 25, &query, "/api/companies/x/members");
        assert_eq!(page.next.as_deref(), Some("/api/companies/x/members?page=3&page_size=10"));
        assert_eq!(page.previous.as_deref(), Some("/api/companies/x/members?page=1&page_size=10"));

        let last = PageQuery { page: Some(3), page_size: Some(10) };
        assert!(Page::new(vec![0; 5], 25, &last, "/m").next.is_none());
    }

    #[test]
    fn clamps_bad_input() {
        let query = PageQuery { page: Some(0), page_size: Some(10_000) };
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 100);
        assert_eq!(PageQuery::default().page_size(), 20);
    }
}
