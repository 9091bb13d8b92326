use crate::model::{LogQuery, TimeRange};

/// Structured log-search criteria as entered in the console. Empty fields
/// are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub free_text: String,
    pub status: String,
    pub host: String,
    pub rule_id: String,
}

/// Translate a filter into the log store's query dialect.
///
/// Clauses are emitted in a fixed order (text, status, host, rule_id) and
/// joined with AND so the same filter always produces the same string. An
/// empty filter matches everything.
pub fn build_query(filter: &LogFilter) -> String {
    let mut conditions = Vec::new();

    if !filter.free_text.is_empty() {
        conditions.push(format!("_msg:*{}*", filter.free_text));
    }
    if !filter.status.is_empty() {
        conditions.push(format!("status:{}", filter.status));
    }
    if !filter.host.is_empty() {
        conditions.push(format!("host:{}", filter.host));
    }
    if !filter.rule_id.is_empty() {
        conditions.push(format!("rule_id:{}", filter.rule_id));
    }

    if conditions.is_empty() {
        "*".to_string()
    } else {
        conditions.join(" AND ")
    }
}

/// Pair the query string with a time range and page window to form a
/// complete search request. The fetch itself happens elsewhere.
pub fn to_log_query(
    filter: &LogFilter,
    time_range: TimeRange,
    limit: usize,
    offset: usize,
) -> LogQuery {
    LogQuery {
        query: build_query(filter),
        time_range,
        limit,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_matches_all() {
        assert_eq!(build_query(&LogFilter::default()), "*");
    }

    #[test]
    fn test_free_text_and_status() {
        let filter = LogFilter {
            free_text: "sql".to_string(),
            status: "403".to_string(),
            ..Default::default()
        };
        assert_eq!(build_query(&filter), "_msg:*sql* AND status:403");
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let filter = LogFilter {
            free_text: "union".to_string(),
            status: "403".to_string(),
            host: "example.com".to_string(),
            rule_id: "942100".to_string(),
        };
        assert_eq!(
            build_query(&filter),
            "_msg:*union* AND status:403 AND host:example.com AND rule_id:942100"
        );
    }

    #[test]
    fn test_single_clause_has_no_joiner() {
        let filter = LogFilter {
            host: "example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(build_query(&filter), "host:example.com");
    }

    #[test]
    fn test_to_log_query_carries_page_window() {
        let range = TimeRange::last_hours(24);
        let query = to_log_query(&LogFilter::default(), range, 100, 50);

        assert_eq!(query.query, "*");
        assert_eq!(query.limit, 100);
        assert_eq!(query.offset, 50);
        assert_eq!(query.time_range, range);
    }
}
