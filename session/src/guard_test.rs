use super::*;

#[test]
fn unauthenticated_always_redirects_to_login() {
    for target in ["/profile", "/records", "/referrals", "/"] {
        assert_eq!(check(AuthState::Unauthenticated, target), Access::Redirect(LOGIN_PATH));
    }
}

#[test]
fn authenticated_renders_target_unchanged() {
    for target in ["/profile", "/records", "/referrals"] {
        assert_eq!(check(AuthState::Authenticated, target), Access::Render(target));
    }
}

#[test]
fn unknown_waits_instead_of_redirecting() {
    assert_eq!(check(AuthState::Unknown, "/profile"), Access::Pending);
    assert!(!should_redirect(AuthState::Unknown));
}

#[test]
fn should_redirect_only_when_unauthenticated() {
    assert!(should_redirect(AuthState::Unauthenticated));
    assert!(!should_redirect(AuthState::Authenticated));
}

#[test]
fn logout_flips_decision_on_next_evaluation() {
    let mut state = AuthState::Authenticated;
    assert_eq!(check(state, "/profile"), Access::Render("/profile"));
    state = AuthState::Unauthenticated;
    assert_eq!(check(state, "/profile"), Access::Redirect(LOGIN_PATH));
}
