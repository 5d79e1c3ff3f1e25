// Módulos de la aplicación
mod aggregate;
mod api;
mod app_state;
mod config;
mod dataset;
mod engine;
mod entities;
mod format;
mod intent;
mod matcher;
mod models;
mod questions;

use std::sync::{Arc, Mutex};

use crate::app_state::AppState;
use axum::Router;
use tokio::sync::oneshot;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Cargar configuración
    let cfg = config::AppConfig::from_env().expect("Error al cargar la configuración");

    // 3. Cargar el dataset de ventas. Sin dataset no se sirven peticiones.
    let dataset = dataset::SalesDataset::load(&cfg.dataset_path)
        .expect("Error al cargar el dataset de ventas");
    if dataset.is_empty() {
        warn!("El dataset no contiene registros; todas las consultas responderán 'sin datos'.");
    }

    // 4. Cargar las preguntas permitidas (obligatorias en modo validado)
    let allowed_questions = match &cfg.questions_path {
        Some(path) => questions::load_allowed_questions(path)
            .expect("Error al cargar las preguntas permitidas"),
        None => Vec::new(),
    };

    // 5. Construir el motor de respuestas
    let engine = engine::AnswerEngine::new(Arc::new(dataset), allowed_questions, cfg.chat_mode);

    // Crear canal para la señal de apagado.
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    // 6. Crear estado compartido de la aplicación
    let app_state = AppState {
        config: cfg.clone(),
        engine: Arc::new(engine),
        shutdown_sender: Arc::new(Mutex::new(Some(shutdown_tx))),
    };

    // 7. Configurar el router de la API y el servicio de ficheros estáticos
    let app = Router::new()
        .merge(api::create_router(app_state.clone()))
        .fallback_service(ServeDir::new("frontend"))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // 8. Iniciar el servidor
    let server_addr = &app_state.config.server_addr;
    let listener = tokio::net::TcpListener::bind(server_addr)
        .await
        .unwrap();
    let server_url = format!("http://{}", server_addr);
    info!("🚀 Servidor escuchando en {}", &server_url);

    // Abrir el frontend en el navegador por defecto
    if webbrowser::open(&server_url).is_err() {
        info!("No se pudo abrir el navegador. Por favor, accede a {} manualmente.", server_url);
    }

    // Configurar el apagado ordenado.
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_rx.await.ok();
            info!("Señal de apagado recibida, iniciando cierre del servidor.");
        })
        .await
        .unwrap();

    info!("✅ Servidor cerrado correctamente.");
}
