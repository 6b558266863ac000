// Token extraction from the raw `Authorization` header value.
//
// The header is split on single spaces and the second field is taken as the
// token. The scheme keyword is not inspected, so `Basic xyz` yields `xyz`.

pub fn extract_token(header: Option<&str>) -> &str {
    header
        .and_then(|value| value.split(' ').nth(1))
        .unwrap_or("")
}
