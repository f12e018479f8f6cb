// server/src/state.rs
use crate::config::AppConfig;
use harvest::Marketplace;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub market: Marketplace,
  pub config: Arc<AppConfig>,
}
