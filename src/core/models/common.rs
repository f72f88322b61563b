use crate::error::Error;

pub static MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Builds a limit/offset pair from a 1-based page number.
    pub fn from_page(page: i64, size: i64) -> Result<Self, Error> {
        if page < 1 {
            return Err(Error::Validation("page must start from 1".into()));
        }
        if size < 1 || size > MAX_PAGE_SIZE {
            return Err(Error::Validation(format!("size must be between 1 and {}", MAX_PAGE_SIZE)));
        }
        let offset = (page - 1).checked_mul(size).ok_or_else(|| Error::Validation("page is out of range".into()))?;
        Ok(Self::new(size, offset))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_page() {
        assert_eq!(Pagination::from_page(1, 10).unwrap(), Pagination::new(10, 0));
        assert_eq!(Pagination::from_page(3, 20).unwrap(), Pagination::new(20, 40));
        assert!(Pagination::from_page(0, 10).is_err());
        assert!(Pagination::from_page(1, 0).is_err());
        assert!(Pagination::from_page(1, MAX_PAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_from_page_out_of_range() {
        let res = Pagination::from_page(i64::MAX, MAX_PAGE_SIZE);
        assert!(matches!(res, Err(Error::Validation(_))));
        assert_eq!(Pagination::from_page(i64::MAX, 1).unwrap(), Pagination::new(1, i64::MAX - 1));
    }
}
