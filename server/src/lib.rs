// server/src/lib.rs

//! HTTP front end for the Harvest marketplace: actix-web routes over a
//! shared `harvest::Marketplace` backed by the in-memory store.

pub mod config;
pub mod errors;
pub mod seed;
pub mod state;
pub mod web;

use std::sync::Arc;

use harvest::{Marketplace, MemoryStore};

use crate::config::AppConfig;
use crate::errors::Result;
use crate::state::AppState;

/// Creates the store and marketplace, seeding demo data when configured.
pub async fn build_state(config: AppConfig) -> Result<AppState> {
  let store = Arc::new(MemoryStore::new());
  if config.seed_demo_data {
    seed::seed_demo_data(store.as_ref()).await?;
  }
  let market = Marketplace::new(store)?;
  Ok(AppState {
    market,
    config: Arc::new(config),
  })
}
