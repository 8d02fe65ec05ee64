use redacterr::Redact;

#[derive(Debug, thiserror::Error, Redact)]
enum LoginError {
    #[error("invalid password for {user}")]
    InvalidPassword { user: String },
    #[error("account {0} locked after {1} attempts")]
    Locked(String, #[safe] u8),
    #[error("session expired")]
    Expired,
}

fn main() {
    let err = LoginError::Locked("alice".into(), 5);
    assert_eq!(err.redacted().to_string(), "account <redacted String> locked after 5 attempts");
}
