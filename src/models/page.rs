//! Paginated list payloads

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// One page of records plus the server-side total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub total: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn new(list: Vec<T>, total: u64) -> Self {
        Self { list, total }
    }

    /// Number of pages for `page_size`, at least 1
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total, page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

pub fn total_pages(total: u64, page_size: u32) -> u32 {
    if page_size == 0 || total == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[serde_as]
#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct Wrapped<T> {
    #[serde(default, alias = "data", alias = "records", alias = "rows")]
    list: Option<Vec<T>>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned"))]
enum PageRepr<T> {
    Bare(Vec<T>),
    Wrapped(Wrapped<T>),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageRepr::<T>::deserialize(deserializer)? {
            PageRepr::Bare(list) => {
                let total = list.len() as u64;
                Page { list, total }
            }
            PageRepr::Wrapped(w) => {
                let list = w.list.unwrap_or_default();
                let total = w.total.unwrap_or(list.len() as u64);
                Page { list, total }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_and_data_keys() {
        let p: Page<i64> = serde_json::from_value(json!({"list": [1, 2], "total": 12})).unwrap();
        assert_eq!(p.list, vec![1, 2]);
        assert_eq!(p.total, 12);

        let p: Page<i64> = serde_json::from_value(json!({"data": [3], "total": "7"})).unwrap();
        assert_eq!(p.list, vec![3]);
        assert_eq!(p.total, 7);
    }

    #[test]
    fn test_bare_array() {
        let p: Page<i64> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(p.total, 3);
    }

    #[test]
    fn test_missing_total_defaults_to_len() {
        let p: Page<i64> = serde_json::from_value(json!({"list": [1, 2]})).unwrap();
        assert_eq!(p.total, 2);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }
}
