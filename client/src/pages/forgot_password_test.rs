use super::*;

#[test]
fn validate_reset_request_trims_email() {
    assert_eq!(validate_reset_request("  user@example.com "), Ok("user@example.com".to_owned()));
    assert!(validate_reset_request("   ").is_err());
}

#[test]
fn validate_reset_confirm_checks_each_field() {
    assert_eq!(validate_reset_confirm(" ", "pw", "pw"), Err("Enter the code we sent you."));
    assert_eq!(validate_reset_confirm("123456", "", ""), Err("Enter a new password."));
    assert_eq!(validate_reset_confirm("123456", "pw1", "pw2"), Err("Passwords do not match."));
}

#[test]
fn validate_reset_confirm_trims_code_only() {
    assert_eq!(
        validate_reset_confirm(" 123456 ", " pw ", " pw "),
        Ok(("123456".to_owned(), " pw ".to_owned()))
    );
}

#[test]
fn delivery_message_names_medium_and_destination() {
    let delivery = CodeDelivery { destination: Some("u***@e***.com".into()), medium: Some("EMAIL".into()) };
    assert_eq!(delivery_message(&delivery), "We sent a code by email to u***@e***.com.");
}

#[test]
fn delivery_message_without_medium() {
    let delivery = CodeDelivery { destination: Some("+1***99".into()), medium: None };
    assert_eq!(delivery_message(&delivery), "We sent a code to +1***99.");
}

#[test]
fn delivery_message_without_details() {
    assert_eq!(delivery_message(&CodeDelivery::default()), "We sent you a code.");
}
