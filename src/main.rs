//! Live-status test service.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                  LIVECHECK                        │
//!                      │                                                   │
//!   Client Request     │  ┌────────┐    ┌──────────┐    ┌──────────────┐   │
//!   ───────────────────┼─▶│  http  │───▶│  batch   │───▶│  comparator  │   │
//!                      │  │ server │    │ (paced)  │    │  (A ∥ B)     │   │
//!                      │  └────────┘    └──────────┘    └──────┬───────┘   │
//!                      │                                       │           │
//!                      │                          ┌────────────┴────────┐  │
//!                      │                          ▼                     ▼  │
//!                      │                   ┌────────────┐       ┌──────────┐│
//!                      │                   │  ApiProbe  │       │RoomProbe ││
//!                      │                   │ (Source A) │       │(Source B)││
//!                      │                   └─────┬──────┘       └────┬─────┘│
//!                      │                         │                   │      │
//!                      └─────────────────────────┼───────────────────┼──────┘
//!                                                ▼                   ▼
//!                                           data API           room endpoint
//! ```
//!
//! Configuration comes from an optional TOML file (`LIVECHECK_CONFIG`)
//! overlaid with `TIKAPI_KEY`, `PORT` and friends; `.env` is honoured.

use std::path::PathBuf;

use livecheck::config::load_config;
use livecheck::lifecycle::startup;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let config_path = std::env::var_os("LIVECHECK_CONFIG").map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    startup::run(config).await
}
