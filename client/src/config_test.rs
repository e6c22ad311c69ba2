use super::*;

#[test]
fn from_values_defaults_api_base_url() {
    let cfg = ClientConfig::from_values(None, None, None, None);
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.cognito.client_id, "");
}

#[test]
fn from_values_trims_trailing_slash() {
    let cfg = ClientConfig::from_values(None, None, None, Some("https://api.example.test/v1/"));
    assert_eq!(cfg.api_base_url, "https://api.example.test/v1");
}

#[test]
fn from_values_blank_api_base_url_uses_default() {
    let cfg = ClientConfig::from_values(None, None, None, Some("   "));
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
}

#[test]
fn from_values_derives_region_from_pool() {
    let cfg = ClientConfig::from_values(None, Some("us-west-2_Pool1"), Some("abc"), None);
    assert_eq!(cfg.cognito.region, "us-west-2");
    assert_eq!(cfg.cognito.user_pool_id, "us-west-2_Pool1");
    assert_eq!(cfg.cognito.client_id, "abc");
}

#[test]
fn from_values_explicit_region_wins() {
    let cfg = ClientConfig::from_values(Some("eu-central-1"), Some("us-west-2_Pool1"), Some("abc"), None);
    assert_eq!(cfg.cognito.endpoint(), "https://cognito-idp.eu-central-1.amazonaws.com/");
}
