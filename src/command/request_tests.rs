use crate::command::request::{RequestError, SearchRunsRequest, parse_tz_offset};
use crate::shared::time::TzOffset;

#[test]
fn defaults_when_nothing_is_given() {
    let req = SearchRunsRequest::parse(None, None).unwrap();
    assert_eq!(req, SearchRunsRequest::default());
    assert!(req.report_progress);
    assert_eq!(req.limit, None);
}

#[test]
fn parses_all_parameters() {
    let req = SearchRunsRequest::parse(
        Some("q=run.name%20%3D%3D%20%27a%27&limit=25&offset=abc&report_progress=0&exclude_params=true&exclude_traces=1&skip_system=false"),
        Some("-120"),
    )
    .unwrap();

    assert_eq!(req.query, "run.name == 'a'");
    assert_eq!(req.limit, Some(25));
    assert_eq!(req.offset.as_deref(), Some("abc"));
    assert!(!req.report_progress);
    assert!(req.exclude_params);
    assert!(req.exclude_traces);
    assert!(!req.skip_system);
    assert_eq!(req.tz_offset, TzOffset(-120));
}

#[test]
fn query_alias_and_plus_encoding() {
    let req = SearchRunsRequest::parse(Some("query=run.active+and+run.name+%21%3D+%27x%27"), None)
        .unwrap();
    assert_eq!(req.query, "run.active and run.name != 'x'");
}

#[test]
fn non_positive_limit_is_unbounded() {
    for raw in ["limit=0", "limit=-5", "limit="] {
        let req = SearchRunsRequest::parse(Some(raw), None).unwrap();
        assert_eq!(req.limit, None, "{raw}");
    }
}

#[test]
fn empty_offset_means_first_page() {
    let req = SearchRunsRequest::parse(Some("offset="), None).unwrap();
    assert_eq!(req.offset, None);
}

#[test]
fn rejects_malformed_values() {
    assert_eq!(
        SearchRunsRequest::parse(Some("limit=ten"), None).unwrap_err(),
        RequestError::InvalidParam {
            name: "limit",
            value: "ten".to_string()
        }
    );
    assert!(matches!(
        SearchRunsRequest::parse(Some("report_progress=yes"), None),
        Err(RequestError::InvalidParam { name: "report_progress", .. })
    ));
    assert!(matches!(
        SearchRunsRequest::parse(None, Some("UTC+2")),
        Err(RequestError::InvalidHeader { .. })
    ));
}

#[test]
fn tz_header_accepts_whitespace_and_blank() {
    assert_eq!(parse_tz_offset(" 60 ").unwrap(), TzOffset(60));
    assert_eq!(parse_tz_offset("").unwrap(), TzOffset(0));
    assert!(parse_tz_offset("1.5").is_err());
}

#[test]
fn ignores_unknown_parameters() {
    let req = SearchRunsRequest::parse(Some("foo=bar&limit=3"), None).unwrap();
    assert_eq!(req.limit, Some(3));
}
