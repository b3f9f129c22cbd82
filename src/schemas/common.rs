use serde::Serialize;

/// Default page size when the caller does not choose one
pub const DEFAULT_PER_PAGE: u64 = 10;

/// One page of a listing, shaped the same for every collection
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, current_page: u64, per_page: u64, total: u64) -> Self {
        let last_page = if per_page == 0 {
            1
        } else {
            total.div_ceil(per_page).max(1)
        };

        Self {
            data,
            current_page,
            per_page,
            total,
            last_page,
        }
    }
}

/// Resolved `page` / `per_page` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, per_page: Option<u64>, default_per_page: u64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// A batch item that could not be applied
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContentError {
    pub content_id: i64,
    pub error: String,
}

/// Result of a batch content update: applied rows plus per-item refusals
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome<T> {
    pub updated: Vec<T>,
    pub errors: Vec<ContentError>,
}

impl<T> BatchOutcome<T> {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_rounds_up() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 21);
        assert_eq!(page.last_page, 3);
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 0);
        assert_eq!(page.last_page, 1);
    }

    #[test]
    fn test_page_request_clamps_page() {
        let req = PageRequest::new(Some(0), None, 30);
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 30);
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(Some(3), Some(15), 30);
        assert_eq!(req.offset(), 30);
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let req = PageRequest::new(Some(u64::MAX), Some(100), 10);
        assert_eq!(req.offset(), u64::MAX);
    }
}
