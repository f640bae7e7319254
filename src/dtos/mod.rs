use serde::{Deserialize, Serialize};

pub mod ticketdtos;
pub mod userdtos;

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "currentPage")]
    pub current_page: u32,

    #[serde(rename = "totalPages")]
    pub total_pages: u32,

    #[serde(rename = "totalCount")]
    pub total_count: i64,

    #[serde(rename = "hasNext")]
    pub has_next: bool,

    #[serde(rename = "hasPrev")]
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: usize, total_count: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            ((total_count as f64) / (limit as f64)).ceil() as u32
        };

        Pagination {
            current_page: page,
            total_pages,
            total_count,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_math() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);

        let last = Pagination::new(3, 10, 25);
        assert!(!last.has_next);
        assert!(last.has_prev);
    }

    #[test]
    fn pagination_with_no_rows() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
