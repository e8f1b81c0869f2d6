//! NWS Area Forecast Discussion products: the list/detail JSON shapes, picking
//! the newest product and printing it.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::cmp::Ordering;
use std::fmt;
use std::io::{self, Write};

const DEFAULT_PRODUCT_NAME: &str = "Area Forecast Discussion";
const RULE_WIDTH: usize = 72;

/// Response of `/products/types/AFD/locations/{wfo}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductList {
    #[serde(rename = "@graph", default)]
    pub graph: Vec<ProductStub>,
}

/// One entry of a product list. The text is usually absent here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductStub {
    pub id: String,
    pub issued: String,
    pub product_code: String,
    pub product_name: String,
    pub office: String,
}

/// Response of `/products/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDetail {
    pub id: String,
    pub issued: String,
    pub product_text: String,
    pub product_name: String,
    pub product_code: String,
}

fn parse_issued(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s.trim()).ok()
}

/// Newest first; stubs without a readable `issued` go last, ordered among
/// themselves by descending id.
pub fn compare_newest_first(a: &ProductStub, b: &ProductStub) -> Ordering {
    match (parse_issued(&a.issued), parse_issued(&b.issued)) {
        (Some(ta), Some(tb)) => tb.cmp(&ta),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.id.cmp(&a.id),
    }
}

/// Returns the newest stub of a list, if any.
pub fn newest(mut stubs: Vec<ProductStub>) -> Option<ProductStub> {
    stubs.sort_by(compare_newest_first);
    stubs.into_iter().next()
}

/// Resolves a product id against the API base, leaving absolute URLs alone.
pub fn product_url(base_url: &str, id_or_url: &str) -> String {
    let s = id_or_url.trim();
    if s.starts_with("http://") || s.starts_with("https://") {
        s.to_string()
    } else {
        format!("{}/products/{}", base_url.trim_end_matches('/'), s)
    }
}

/// The latest discussion for one forecast office.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaForecastDiscussion {
    pub wfo: String,
    pub issued: String,
    pub product_name: String,
    pub text: String,
}

impl AreaForecastDiscussion {
    /// Combines a product detail with the list entry it was found through;
    /// the list's `issued` fills in when the detail has none.
    pub fn new(wfo: &str, stub: &ProductStub, detail: ProductDetail) -> Self {
        let issued = if detail.issued.trim().is_empty() {
            stub.issued.clone()
        } else {
            detail.issued
        };
        AreaForecastDiscussion {
            wfo: wfo.to_string(),
            issued,
            product_name: detail.product_name,
            text: detail.product_text,
        }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)
    }
}

/// Header line, a rule, then the product text with a trailing newline.
impl fmt::Display for AreaForecastDiscussion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.product_name.trim().is_empty() {
            DEFAULT_PRODUCT_NAME
        } else {
            &self.product_name
        };
        writeln!(f, "{} ({}) - issued {}", self.wfo, name, self.issued)?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        f.write_str(&self.text)?;
        if !self.text.ends_with('\n') {
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub(id: &str, issued: &str) -> ProductStub {
        ProductStub {
            id: id.to_string(),
            issued: issued.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_newest_first_ordering() {
        let stubs = vec![
            stub("a", "2025-06-20T10:00:00+00:00"),
            stub("z", "not a time"),
            stub("b", "2025-06-21T09:00:00-04:00"),
            stub("y", ""),
            stub("c", "2025-06-21T12:00:00+00:00"),
        ];
        let mut sorted = stubs.clone();
        sorted.sort_by(compare_newest_first);
        let ids: Vec<&str> = sorted.iter().map(|s| s.id.as_str()).collect();
        // 09:00-04:00 is 13:00Z, newer than 12:00Z.
        assert_eq!(ids, ["b", "c", "a", "z", "y"]);
        assert_eq!(newest(stubs).unwrap().id, "b");
        assert!(newest(Vec::new()).is_none());
    }

    #[test]
    fn test_product_list_shape() {
        let list: ProductList = serde_json::from_str(
            r#"{"@context": {}, "@graph": [
                {"@id": "https://api.weather.gov/products/abc", "id": "abc",
                 "issued": "2025-06-21T12:00:00+00:00", "productCode": "AFD",
                 "productName": "Area Forecast Discussion", "office": "KMRX"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(list.graph.len(), 1);
        assert_eq!(list.graph[0].product_code, "AFD");

        let empty: ProductList = serde_json::from_str("{}").unwrap();
        assert!(empty.graph.is_empty());
    }

    #[test]
    fn test_product_url() {
        assert_eq!(
            product_url("https://api.weather.gov", "abc-123"),
            "https://api.weather.gov/products/abc-123"
        );
        assert_eq!(
            product_url("https://api.weather.gov/", " https://example.org/p/1 "),
            "https://example.org/p/1"
        );
    }

    #[test]
    fn test_render_falls_back_to_stub_issued_and_default_name() {
        let detail = ProductDetail {
            product_text: "\n000\nFXUS64 KMRX 211200\nAFDMRX".to_string(),
            ..Default::default()
        };
        let afd = AreaForecastDiscussion::new("MRX", &stub("abc", "2025-06-21T12:00:00+00:00"), detail);
        assert_eq!(afd.issued, "2025-06-21T12:00:00+00:00");
        let rendered = afd.to_string();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some("MRX (Area Forecast Discussion) - issued 2025-06-21T12:00:00+00:00")
        );
        assert_eq!(lines.next(), Some("-".repeat(72).as_str()));
        assert!(rendered.ends_with("AFDMRX\n"));
    }

    #[test]
    fn test_render_keeps_existing_trailing_newline() {
        let afd = AreaForecastDiscussion {
            wfo: "MRX".to_string(),
            issued: "x".to_string(),
            product_name: "Discussion".to_string(),
            text: "body\n".to_string(),
        };
        let mut out = Vec::new();
        afd.write_to(&mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();
        assert!(rendered.starts_with("MRX (Discussion) - issued x\n"));
        assert!(rendered.ends_with("body\n"));
        assert!(!rendered.ends_with("body\n\n"));
    }
}
