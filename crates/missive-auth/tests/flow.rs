//! End-to-end exercises of the auth core against an in-memory database.

use std::sync::Arc;

use missive_auth::{
    AuthError, Authenticator, Caller, NewCredential, PasswordHasher, TokenService, guard,
};
use missive_db::Database;

fn core() -> (Arc<Database>, Authenticator, Arc<TokenService>) {
    let db = Arc::new(Database::open_in_memory().expect("in-memory db"));
    let tokens = Arc::new(TokenService::new("test-secret"));
    let hasher = PasswordHasher::new(1).expect("hasher");
    let auth = Authenticator::new(db.clone(), hasher, tokens.clone());
    (db, auth, tokens)
}

fn new_credential(username: &str, password: &str) -> NewCredential {
    NewCredential {
        username: username.to_string(),
        password: password.to_string(),
        first_name: username.to_string(),
        last_name: "Tester".to_string(),
        phone: "+15550001111".to_string(),
    }
}

#[test]
fn register_persists_and_never_exposes_the_hash() {
    let (db, auth, _) = core();

    let cred = auth.register(new_credential("alice", "secret1")).unwrap();
    assert_eq!(cred.username, "alice");
    assert_eq!(cred.joined_at, cred.last_login_at);

    let row = db.get_user_by_username("alice").unwrap().unwrap();
    assert_ne!(row.password_hash, "secret1");
    assert!(!row.password_hash.contains("secret1"));
}

#[test]
fn duplicate_registration_conflicts_and_leaves_the_first_intact() {
    let (db, auth, _) = core();

    auth.register(new_credential("alice", "secret1")).unwrap();
    let before = db.get_user_by_username("alice").unwrap().unwrap();

    let err = auth
        .register(new_credential("alice", "other-password"))
        .unwrap_err();
    assert!(matches!(err, AuthError::Conflict));

    let after = db.get_user_by_username("alice").unwrap().unwrap();
    assert_eq!(before.password_hash, after.password_hash);
    assert_eq!(before.joined_at, after.joined_at);
}

#[test]
fn login_failures_are_indistinguishable() {
    let (_, auth, _) = core();
    auth.register(new_credential("alice", "secret1")).unwrap();

    let wrong_password = auth.login("alice", "wrong").unwrap_err();
    let unknown_user = auth.login("nobody", "whatever").unwrap_err();

    assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    assert!(matches!(unknown_user, AuthError::InvalidCredentials));
    // Identical user-facing text: nothing distinguishes the two cases.
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
}

#[test]
fn login_issues_a_verifiable_token_and_touches_last_login() {
    let (db, auth, tokens) = core();
    auth.register(new_credential("alice", "secret1")).unwrap();
    let registered = db.get_user_by_username("alice").unwrap().unwrap();

    let token = auth.login("alice", "secret1").unwrap();
    let claims = tokens.verify(&token).unwrap();
    assert_eq!(claims.sub, "alice");

    let after = db.get_user_by_username("alice").unwrap().unwrap();
    assert!(after.last_login_at >= registered.last_login_at);
}

#[test]
fn touch_last_login_not_found_for_unknown_user() {
    let (_, auth, _) = core();
    auth.register(new_credential("alice", "secret1")).unwrap();

    assert!(auth.touch_last_login("alice").is_ok());
    assert!(matches!(
        auth.touch_last_login("nobody"),
        Err(AuthError::NotFound)
    ));
}

#[test]
fn full_messaging_flow_with_authorization() {
    let (db, auth, tokens) = core();
    auth.register(new_credential("alice", "secret1")).unwrap();
    auth.register(new_credential("bob", "secret2")).unwrap();
    auth.register(new_credential("carol", "secret3")).unwrap();

    // bob sends alice a message
    let id = db
        .insert_message("bob", "alice", "hi", chrono::Utc::now())
        .unwrap();

    // alice logs in and acts as the claims subject
    let token = auth.login("alice", "secret1").unwrap();
    let alice = Caller::User(tokens.verify(&token).unwrap().sub);
    let bob = Caller::User("bob".to_string());
    let carol = Caller::User("carol".to_string());

    let detail = db.get_message(id).unwrap().unwrap();
    let (from, to) = (
        detail.message.from_username.as_str(),
        detail.message.to_username.as_str(),
    );

    // Both participants can view; a third party cannot.
    assert!(guard::ensure_can_view(&alice, from, to).is_ok());
    assert!(guard::ensure_can_view(&bob, from, to).is_ok());
    assert!(matches!(
        guard::ensure_can_view(&carol, from, to),
        Err(AuthError::Forbidden)
    ));

    // Only the recipient may mark the message read.
    assert!(matches!(
        guard::ensure_can_mark_read(&bob, to),
        Err(AuthError::Forbidden)
    ));
    assert!(guard::ensure_can_mark_read(&alice, to).is_ok());

    let first = db.mark_message_read(id, chrono::Utc::now()).unwrap().unwrap();

    // Re-marking is permitted for the recipient and leaves read_at alone.
    assert!(guard::ensure_can_mark_read(&alice, to).is_ok());
    let second = db.mark_message_read(id, chrono::Utc::now()).unwrap().unwrap();
    assert_eq!(first, second);
}
