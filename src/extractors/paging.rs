//! `page`, `size` and `sort` query parameters.

use crate::error::AppError;
use crate::model::{PageRequest, Sort};
use crate::state::AppState;
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

/// Sort always; a page only when `page` or `size` was given.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paging {
    pub sort: Sort,
    pub page: Option<PageRequest>,
}

impl Paging {
    /// Parse raw query pairs; `sort` may repeat. Sizes are clamped to `1..=max_size`.
    pub fn from_pairs(pairs: &[(String, String)], default_size: u32, max_size: u32) -> Result<Self, AppError> {
        let mut sort = Sort::unsorted();
        let mut number: Option<u32> = None;
        let mut size: Option<u32> = None;
        for (k, v) in pairs {
            match k.as_str() {
                "sort" => sort.push_param(v).map_err(AppError::BadRequest)?,
                "page" => {
                    let n: i64 = v
                        .trim()
                        .parse()
                        .map_err(|_| AppError::BadRequest(format!("invalid page '{}'", v)))?;
                    number = Some(n.clamp(0, i64::from(u32::MAX)) as u32);
                }
                "size" => {
                    let n: i64 = v
                        .trim()
                        .parse()
                        .map_err(|_| AppError::BadRequest(format!("invalid size '{}'", v)))?;
                    size = Some(if n < 1 { default_size } else { n.min(i64::from(max_size)) as u32 });
                }
                _ => {}
            }
        }
        let page = match (number, size) {
            (None, None) => None,
            (n, s) => Some(PageRequest::new(n.unwrap_or(0), s.unwrap_or(default_size))),
        };
        Ok(Paging { sort, page })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Paging {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        let paging = &state.config.paging;
        Paging::from_pairs(&pairs, paging.default_page_size, paging.max_page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerField, Direction};

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn no_params_means_unpaged_unsorted() {
        let p = Paging::from_pairs(&[], 20, 2000).unwrap();
        assert_eq!(p.page, None);
        assert!(p.sort.is_unsorted());
    }

    #[test]
    fn size_alone_requests_first_page() {
        let p = Paging::from_pairs(&pairs(&[("size", "5")]), 20, 2000).unwrap();
        assert_eq!(p.page, Some(PageRequest::new(0, 5)));
    }

    #[test]
    fn size_is_clamped() {
        let p = Paging::from_pairs(&pairs(&[("page", "-3"), ("size", "99999")]), 20, 2000).unwrap();
        assert_eq!(p.page, Some(PageRequest::new(0, 2000)));
        let p = Paging::from_pairs(&pairs(&[("size", "0")]), 20, 2000).unwrap();
        assert_eq!(p.page, Some(PageRequest::new(0, 20)));
    }

    #[test]
    fn repeated_sort() {
        let p = Paging::from_pairs(&pairs(&[("sort", "lastName,desc"), ("sort", "firstName")]), 20, 2000).unwrap();
        assert_eq!(p.sort.0.len(), 2);
        assert_eq!(p.sort.0[0].field, CustomerField::LastName);
        assert_eq!(p.sort.0[0].direction, Direction::Desc);
        assert_eq!(p.sort.0[1].direction, Direction::Asc);
    }

    #[test]
    fn malformed_values_rejected() {
        assert!(Paging::from_pairs(&pairs(&[("page", "two")]), 20, 2000).is_err());
        assert!(Paging::from_pairs(&pairs(&[("sort", "salary")]), 20, 2000).is_err());
    }
}
