use redacterr::Redact;

#[derive(Redact)]
enum Never {}

fn assert_redact<T: Redact>() {}

fn main() {
    assert_redact::<Never>();
}
