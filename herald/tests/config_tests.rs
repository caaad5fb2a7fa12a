//! Configuration parsing tests.

use herald::controller::Herald;

#[test]
fn shipped_example_config_parses() {
    let content = std::fs::read_to_string("../herald.config.ron")
        .expect("example config should be present at the workspace root");
    if let Err(e) = ron::from_str::<Herald>(&content) {
        panic!("example config should parse: {e}");
    }
}

#[test]
fn minimal_config_uses_defaults() {
    let parsed = ron::from_str::<Herald>(
        r#"Herald(
            transport: Api((
                endpoint: "https://api.example.com/v1/send",
                api_key: "secret",
            )),
        )"#,
    );
    if let Err(e) = parsed {
        panic!("minimal config should parse: {e}");
    }
}

#[test]
fn missing_transport_is_rejected() {
    assert!(ron::from_str::<Herald>("Herald()").is_err());
}
