use redacterr::{Redact, RedactedError};

#[derive(Debug, thiserror::Error, Redact)]
enum Layered<E: std::error::Error + 'static> {
    #[error("upstream: {0}")]
    Upstream(#[redact(nested)] E),
    #[error("{kind} while reading {path}")]
    Read {
        #[safe]
        kind: String,
        path: String,
    },
}

fn main() {
    let err: Layered<RedactedError> = Layered::Upstream(RedactedError::new(std::io::Error::other("x")));
    assert_eq!(err.redacted().to_string(), "upstream: ");
}
