use crate::error::{PaymentError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::{self, BufRead};

/// One inbound request. `user_id` carries the caller identity header.
#[derive(Debug, Deserialize, PartialEq, Clone)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Health,
    CreateVpa {
        user_id: String,
        prefix: String,
        account_id: String,
    },
    ListVpas {
        user_id: String,
    },
    ValidateVpa {
        vpa: String,
    },
    DeactivateVpa {
        user_id: String,
        vpa: String,
    },
    Pay {
        user_id: String,
        to_vpa: String,
        amount: Decimal,
        #[serde(default)]
        note: String,
    },
    Collect {
        user_id: String,
        from_vpa: String,
        amount: Decimal,
        #[serde(default)]
        note: String,
    },
    ListCollectRequests {
        user_id: String,
    },
    ListTransactions {
        user_id: String,
        #[serde(default = "default_page", deserialize_with = "lenient_int")]
        page: i64,
        #[serde(default = "default_limit", deserialize_with = "lenient_int")]
        limit: i64,
    },
    CreateMandate {
        user_id: String,
        payee_vpa: String,
        amount: Decimal,
        frequency: String,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        #[serde(default)]
        purpose: String,
    },
    ListMandates {
        user_id: String,
    },
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

/// Paging values arrive as query-style input. Anything that is not an
/// integer reads as 0 and is normalized by the service.
fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Reads requests from a JSON-lines source, one request per line.
///
/// Blank lines are skipped. A line that does not parse yields an error for
/// that line only; reading continues with the next one.
pub struct RequestReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> RequestReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Lazily reads and deserializes requests.
    pub fn requests(self) -> impl Iterator<Item = Result<Request>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                serde_json::from_str(&line)
                    .map_err(|e| PaymentError::Validation(e.to_string())),
            ),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                Some(Err(PaymentError::Validation(e.to_string())))
            }
            Err(e) => Some(Err(e.into())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_reader_valid_stream() {
        let data = r#"{"op":"create_vpa","user_id":"65a1b2c3d4e5f60718293a4b","prefix":"john","account_id":"ACC1"}

{"op":"pay","user_id":"65a1b2c3d4e5f60718293a4b","to_vpa":"x@bank","amount":100}
{"op":"list_transactions","user_id":"65a1b2c3d4e5f60718293a4b"}"#;
        let results: Vec<Result<Request>> = RequestReader::new(data.as_bytes()).requests().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(
            results[1].as_ref().unwrap(),
            &Request::Pay {
                user_id: "65a1b2c3d4e5f60718293a4b".into(),
                to_vpa: "x@bank".into(),
                amount: dec!(100),
                note: String::new(),
            }
        );
        assert!(matches!(
            results[2].as_ref().unwrap(),
            Request::ListTransactions { page: 1, limit: 20, .. }
        ));
    }

    #[test]
    fn test_reader_malformed_line() {
        let data = "{\"op\":\"teleport\"}\nnot json\n{\"op\":\"health\"}";
        let results: Vec<Result<Request>> = RequestReader::new(data.as_bytes()).requests().collect();

        assert!(matches!(results[0], Err(PaymentError::Validation(_))));
        assert!(matches!(results[1], Err(PaymentError::Validation(_))));
        assert_eq!(results[2].as_ref().unwrap(), &Request::Health);
    }

    #[test]
    fn test_reader_non_utf8_line_is_invalid_request() {
        let data: &[u8] = b"{\"op\":\"health\"}\n\xff\xfe\n{\"op\":\"health\"}\n";
        let results: Vec<Result<Request>> = RequestReader::new(data).requests().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &Request::Health);
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, PaymentError::Validation(_)));
        assert_eq!(err.code(), "invalid_request");
        assert_eq!(results[2].as_ref().unwrap(), &Request::Health);
    }

    #[test]
    fn test_reader_unparsable_paging_reads_as_zero() {
        let data = r#"{"op":"list_transactions","user_id":"u","page":"first","limit":"many"}
{"op":"list_transactions","user_id":"u","page":"3","limit":50}
{"op":"list_transactions","user_id":"u","page":null,"limit":2.5}"#;
        let pages: Vec<(i64, i64)> = RequestReader::new(data.as_bytes())
            .requests()
            .map(|r| match r.unwrap() {
                Request::ListTransactions { page, limit, .. } => (page, limit),
                other => panic!("unexpected request {other:?}"),
            })
            .collect();

        assert_eq!(pages, [(0, 0), (3, 50), (0, 0)]);
    }
}
