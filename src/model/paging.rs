//! Sorting and pagination requests and results.

use crate::model::CustomerField;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    fn parse(s: &str) -> Option<Direction> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub field: CustomerField,
    pub direction: Direction,
}

/// Ordered list of sort keys. Empty means store order (by id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sort(pub Vec<SortOrder>);

impl Sort {
    pub fn unsorted() -> Self {
        Sort(Vec::new())
    }

    pub fn by(field: CustomerField, direction: Direction) -> Self {
        Sort(vec![SortOrder { field, direction }])
    }

    pub fn is_unsorted(&self) -> bool {
        self.0.is_empty()
    }

    /// Append the orders of one `sort` query value: `prop[,prop...][,asc|desc]`.
    /// The trailing direction applies to every property in the value.
    pub fn push_param(&mut self, raw: &str) -> Result<(), String> {
        let mut tokens: Vec<&str> = raw.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();
        let direction = match tokens.last().and_then(|t| Direction::parse(t)) {
            Some(d) => {
                tokens.pop();
                d
            }
            None => Direction::Asc,
        };
        for token in tokens {
            let field = CustomerField::from_property(token)
                .ok_or_else(|| format!("unknown sort property '{}'", token))?;
            self.0.push(SortOrder { field, direction });
        }
        Ok(())
    }

    /// Query string form, one `sort=` value per key.
    pub fn to_query(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Asc => "asc",
                    Direction::Desc => "desc",
                };
                format!("sort={},{}", o.field.property(), dir)
            })
            .collect()
    }
}

/// Compare two optional values the way PostgreSQL orders them by default:
/// nulls sort last ascending and first descending.
pub fn compare_nullable<T: Ord>(a: Option<T>, b: Option<T>, direction: Direction) -> Ordering {
    let ord = match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    };
    match direction {
        Direction::Asc => ord,
        Direction::Desc => ord.reverse(),
    }
}

/// Zero-based page request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Self {
        PageRequest { number, size: size.max(1) }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// One slice of a sorted result plus the total across all pages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages(),
            number: self.number,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_param_single_property_defaults_ascending() {
        let mut sort = Sort::unsorted();
        sort.push_param("lastName").unwrap();
        assert_eq!(sort, Sort::by(CustomerField::LastName, Direction::Asc));
    }

    #[test]
    fn sort_param_trailing_direction_applies_to_all() {
        let mut sort = Sort::unsorted();
        sort.push_param("lastName,firstName,DESC").unwrap();
        assert_eq!(sort.0.len(), 2);
        assert!(sort.0.iter().all(|o| o.direction == Direction::Desc));
        assert_eq!(sort.0[1].field, CustomerField::FirstName);
    }

    #[test]
    fn sort_param_unknown_property() {
        let mut sort = Sort::unsorted();
        let err = sort.push_param("salary,asc").unwrap_err();
        assert!(err.contains("salary"));
    }

    #[test]
    fn sort_to_query() {
        let mut sort = Sort::unsorted();
        sort.push_param("email,desc").unwrap();
        sort.push_param("id").unwrap();
        assert_eq!(sort.to_query(), vec!["sort=email,desc", "sort=id,asc"]);
    }

    #[test]
    fn nulls_last_ascending_first_descending() {
        assert_eq!(compare_nullable(None, Some("a"), Direction::Asc), Ordering::Greater);
        assert_eq!(compare_nullable(None, Some("a"), Direction::Desc), Ordering::Less);
        assert_eq!(compare_nullable(Some("a"), Some("b"), Direction::Desc), Ordering::Greater);
    }

    #[test]
    fn page_arithmetic() {
        let page: Page<u8> = Page {
            content: vec![],
            number: 1,
            size: 20,
            total_elements: 41,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(PageRequest::new(2, 20).offset(), 40);
        assert_eq!(PageRequest::new(0, 0).size, 1);
    }

    #[test]
    fn last_page_has_no_next() {
        let page: Page<u8> = Page {
            content: vec![],
            number: 2,
            size: 20,
            total_elements: 41,
        };
        assert!(!page.has_next());
        let empty: Page<u8> = Page {
            content: vec![],
            number: 0,
            size: 20,
            total_elements: 0,
        };
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
    }
}
