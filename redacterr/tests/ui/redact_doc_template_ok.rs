use redacterr::Redact;

/// Token {token} was rejected by {issuer}
#[derive(Redact)]
struct TokenRejected {
    token: String,
    #[safe]
    issuer: &'static str,
}

fn main() {
    let err = TokenRejected {
        token: "abc123".into(),
        issuer: "auth",
    };
    assert_eq!(err.redacted().to_string(), "Token <redacted String> was rejected by auth");
}
