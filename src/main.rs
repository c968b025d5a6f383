//! Thin binary wrapper.
//!
//! `fracpie` is primarily a library; this binary exists to preserve the
//! convenience of `cargo run`. Logging setup stays here so the library
//! remains unopinionated.
//!
//! Run:
//! - `RUST_LOG=info cargo run`

fn main() -> anyhow::Result<()> {
    env_logger::init();

    fracpie::render::app::run_with_config(fracpie::render::app::AppConfig {
        title: "fracpie: adding fractions with common denominators".to_string(),
        ..Default::default()
    })
}
