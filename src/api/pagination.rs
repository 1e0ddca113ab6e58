use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

/// Query-string pagination parameters shared by the list endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated pagination window
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl PageQuery {
    /// Apply defaults and validate bounds
    pub fn resolve(&self) -> Result<Page, ApiError> {
        let api = &config::config().api;

        let page = self.page.unwrap_or(1);
        let limit = self.limit.unwrap_or(api.default_page_limit);

        if page < 1 || limit < 1 {
            return Err(ApiError::bad_request(
                "Page and limit must be positive numbers",
            ));
        }

        if limit > api.max_page_limit {
            return Err(ApiError::bad_request(format!(
                "Limit cannot be greater than {}",
                api.max_page_limit
            )));
        }

        Ok(Page { page, limit })
    }
}

/// Pagination block included in list responses
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub limit: i64,
}

impl PageInfo {
    pub fn new(total: i64, page: Page) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page.limit - 1) / page.limit
        };

        Self {
            total,
            current_page: page.page,
            total_pages,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_defaults() {
        let page = PageQuery::default().resolve().unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn rejects_non_positive_page_and_limit() {
        for query in [
            PageQuery {
                page: Some(0),
                limit: None,
            },
            PageQuery {
                page: None,
                limit: Some(0),
            },
            PageQuery {
                page: Some(-1),
                limit: Some(10),
            },
        ] {
            let err = query.resolve().unwrap_err();
            assert_eq!(err.message(), "Page and limit must be positive numbers");
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn caps_limit() {
        let err = PageQuery {
            page: Some(1),
            limit: Some(500),
        }
        .resolve()
        .unwrap_err();
        assert_eq!(err.message(), "Limit cannot be greater than 100");
    }

    #[test]
    fn computes_offsets() {
        let page = PageQuery {
            page: Some(3),
            limit: Some(25),
        }
        .resolve()
        .unwrap();
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn total_pages_is_zero_for_empty_sets() {
        let info = PageInfo::new(0, Page { page: 1, limit: 10 });
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.total, 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let info = PageInfo::new(11, Page { page: 1, limit: 10 });
        assert_eq!(info.total_pages, 2);

        let info = PageInfo::new(10, Page { page: 1, limit: 10 });
        assert_eq!(info.total_pages, 1);
    }
}
