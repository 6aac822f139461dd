//! tablesynth - play a short chord progression through the default output
//!
//! Run with: cargo run --release
//! Set RUST_LOG=info to see engine setup, TABLESYNTH_TABLE_SIZE to trade
//! startup time for table resolution.

mod app;

use app::Player;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tablesynth::SynthConfig;

const TABLE_SIZE_VAR: &str = "TABLESYNTH_TABLE_SIZE";

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    env_logger::init();

    let mut config = SynthConfig::default();
    if let Ok(raw) = std::env::var(TABLE_SIZE_VAR) {
        let table_size = raw
            .parse::<usize>()
            .wrap_err_with(|| format!("{TABLE_SIZE_VAR} must be a positive integer, got {raw:?}"))?;
        config = config.with_table_size(table_size);
    }

    // I - vi - IV - V in C
    Player::new(config)
        .bpm(90.0)
        .chord(&[60, 64, 67])
        .chord(&[57, 60, 64])
        .chord(&[53, 57, 60, 65])
        .chord(&[55, 59, 62, 67])
        .run()
}
