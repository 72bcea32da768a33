use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// One price quote as returned by the quote endpoint.
///
/// Every numeric field is optional; the upstream omits them freely.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[schema(example = "AAPL")]
    #[serde(default)]
    pub symbol: String,
    pub price: Option<f64>,
    pub change: Option<f64>,
    pub changes_percentage: Option<f64>,
}

/// Display direction of a quote's change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Quote {
    /// Leniently map one element of the upstream array.
    ///
    /// Numbers are kept only when they are JSON numbers; a missing symbol
    /// becomes the empty string.
    pub fn from_value(value: &Value) -> Self {
        let symbol = match value.get("symbol") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        let number = |key: &str| value.get(key).and_then(Value::as_f64);

        Self {
            symbol,
            price: number("price"),
            change: number("change"),
            changes_percentage: number("changesPercentage"),
        }
    }

    /// Signed percentage change used for display.
    ///
    /// `changesPercentage` wins, then `change / price * 100`, else `0`.
    pub fn percent_change(&self) -> f64 {
        match (self.changes_percentage, self.change, self.price) {
            (Some(pct), _, _) => pct,
            (None, Some(change), Some(price)) => change / price * 100.0,
            _ => 0.0,
        }
    }

    pub fn direction(&self) -> Direction {
        if self.percent_change() >= 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reported_percentage_wins() {
        let q = Quote {
            symbol: "AAPL".into(),
            price: Some(150.0),
            change: Some(3.0),
            changes_percentage: Some(2.0),
        };
        assert_eq!(q.percent_change(), 2.0);
        assert_eq!(q.direction(), Direction::Up);
    }

    #[test]
    fn percentage_derived_from_change_and_price() {
        let q = Quote {
            symbol: "MSFT".into(),
            price: Some(100.0),
            change: Some(-5.0),
            changes_percentage: None,
        };
        assert_eq!(q.percent_change(), -5.0);
        assert_eq!(q.direction(), Direction::Down);
    }

    #[test]
    fn missing_numbers_default_to_flat_and_up() {
        let q = Quote {
            symbol: "NVDA".into(),
            ..Default::default()
        };
        assert_eq!(q.percent_change(), 0.0);
        assert_eq!(q.direction(), Direction::Up);
    }

    #[test]
    fn change_without_price_is_flat() {
        let q = Quote {
            symbol: "GOOGL".into(),
            change: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(q.percent_change(), 0.0);
    }

    #[test]
    fn from_value_tolerates_odd_fields() {
        let q = Quote::from_value(&json!({
            "symbol": "AAPL",
            "price": "150",
            "change": 3,
            "changesPercentage": 2.0,
            "name": "Apple Inc."
        }));
        assert_eq!(q.symbol, "AAPL");
        assert_eq!(q.price, None);
        assert_eq!(q.change, Some(3.0));
        assert_eq!(q.changes_percentage, Some(2.0));

        let empty = Quote::from_value(&json!(42));
        assert_eq!(empty, Quote::default());
    }

    #[test]
    fn serializes_camel_case() {
        let q = Quote {
            symbol: "AAPL".into(),
            changes_percentage: Some(1.5),
            ..Default::default()
        };
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["changesPercentage"], json!(1.5));
    }
}
