use blowpipe::client::login::parse_assertion;

#[test]
fn test_valid_assertion_is_extracted() {
    let body = "]{\"actionsuccess\":true,\"assertion\":\"abc123,signed\"}";
    assert_eq!(parse_assertion(body).unwrap(), "abc123,signed");
}

#[test]
fn test_rejected_assertion_is_an_error() {
    let body = "]{\"assertion\":\";;Wrong password.\"}";
    assert!(parse_assertion(body).is_err());
}

#[test]
fn test_body_without_sentinel_is_an_error() {
    assert!(parse_assertion("<!doctype html>oops").is_err());
    assert!(parse_assertion("").is_err());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(parse_assertion("]{not json").is_err());
}

#[test]
fn test_missing_assertion_is_an_error() {
    assert!(parse_assertion("]{\"actionsuccess\":false}").is_err());
}
