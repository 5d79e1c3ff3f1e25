use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use crate::{config::AppConfig, engine::AnswerEngine};

/// Estado compartido entre handlers. El motor es de sólo lectura, así que
/// las peticiones concurrentes no necesitan ningún bloqueo.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub engine: Arc<AnswerEngine>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}
