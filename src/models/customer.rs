use serde::{Deserialize, Serialize};

/// A booking as the backend lists it. Unknown fields are carried through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub make_and_model: Option<String>,
    #[serde(default)]
    pub registration_no: Option<String>,
    #[serde(default)]
    pub selected_date: Option<String>,
    #[serde(default)]
    pub selected_time_slot: Option<String>,
    #[serde(default)]
    pub total_price: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub class_selection: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPage {
    pub customers: Vec<CustomerRecord>,
    #[serde(default)]
    pub total_pages: u32,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Raw `?page=&pageSize=&search=` parameters as they appear in the URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
}

/// Table pagination state. `page_index` is zero-based; the URL and the
/// backend both count pages from one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page_index: u32,
    pub page_size: u32,
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn from_params(params: &ListParams) -> Self {
        let page = params.page.filter(|p| *p > 0).unwrap_or(1);
        let page_size = params
            .page_size
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self {
            page_index: page - 1,
            page_size,
            search: params.search.clone().unwrap_or_default(),
        }
    }

    /// A new search term sends the table back to the first page.
    pub fn with_search(mut self, term: &str) -> Self {
        if self.search != term {
            self.search = term.to_string();
            self.page_index = 0;
        }
        self
    }

    /// Pairs to mirror back into the page URL. Empty search is omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", (self.page_index + 1).to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        pairs
    }

    pub fn upstream_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", (self.page_index + 1).to_string()),
            ("limit", self.page_size.to_string()),
            ("search", self.search.trim().to_string()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundRequest {
    pub capture_id: String,
    pub refund_amount: f64,
    #[serde(default)]
    pub refund_reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub full_name: String,
    pub email: String,
    pub mobile_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    pub password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let q = ListQuery::from_params(&ListParams::default());
        assert_eq!(q, ListQuery::default());
        assert_eq!(q.page_size, 10);
    }

    #[test]
    fn test_list_query_page_is_one_based_in_url() {
        let q = ListQuery::from_params(&ListParams {
            page: Some(3),
            page_size: Some(25),
            search: Some("ford".into()),
        });
        assert_eq!(q.page_index, 2);
        assert_eq!(
            q.to_query_pairs(),
            vec![
                ("page", "3".to_string()),
                ("pageSize", "25".to_string()),
                ("search", "ford".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_page_and_size_fall_back() {
        let q = ListQuery::from_params(&ListParams {
            page: Some(0),
            page_size: Some(0),
            search: None,
        });
        assert_eq!(q.page_index, 0);
        assert_eq!(q.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_new_search_resets_page() {
        let q = ListQuery {
            page_index: 4,
            ..Default::default()
        };
        let same = q.clone().with_search("");
        assert_eq!(same.page_index, 4);
        let changed = q.with_search("AB12");
        assert_eq!(changed.page_index, 0);
        assert_eq!(changed.search, "AB12");
    }

    #[test]
    fn test_empty_search_omitted_from_url() {
        let pairs = ListQuery::default().to_query_pairs();
        assert!(pairs.iter().all(|(k, _)| *k != "search"));
    }

    #[test]
    fn test_upstream_pairs_trim_search() {
        let q = ListQuery::default().with_search("  smith ");
        let pairs = q.upstream_pairs();
        assert_eq!(pairs[1], ("limit", "10".to_string()));
        assert_eq!(pairs[2], ("search", "smith".to_string()));
    }

    #[test]
    fn test_customer_record_accepts_mongo_id() {
        let rec: CustomerRecord = serde_json::from_str(
            r#"{"_id":"abc","firstName":"Jane","lastName":"Doe","paypalOrderId":"P-1"}"#,
        )
        .unwrap();
        assert_eq!(rec.id, "abc");
        assert_eq!(rec.extra["paypalOrderId"], "P-1");
    }
}
