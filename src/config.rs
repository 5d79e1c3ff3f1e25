//! Carga y gestión de configuración de la aplicación (dataset + chatbot).

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Modo de funcionamiento del motor de respuestas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatMode {
    /// Clasificación directa del texto libre (dashboard abierto).
    Open,
    /// Sólo se responden mensajes que casan con la lista de preguntas.
    Validated,
}

impl ChatMode {
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "validated" | "strict" => Ok(Self::Validated),
            other => Err(anyhow!("Modo de chat no soportado: {other}")),
        }
    }
}

/// Configuración completa de la aplicación.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub questions_path: Option<PathBuf>,
    pub chat_mode: ChatMode,
    pub server_addr: String,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        let dataset_path: PathBuf = env::var("DATASET_PATH")
            .map_err(|_| anyhow!("Falta DATASET_PATH en el entorno"))?
            .into();

        let questions_path = env::var("QUESTIONS_PATH").ok().map(PathBuf::from);

        let chat_mode_str = env::var("CHAT_MODE").unwrap_or_else(|_| "open".to_string());
        let chat_mode = ChatMode::from_str(&chat_mode_str)?;

        let server_addr =
            env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:3322".to_string());

        if chat_mode == ChatMode::Validated && questions_path.is_none() {
            return Err(anyhow!(
                "El modo 'validated' requiere QUESTIONS_PATH con la lista de preguntas"
            ));
        }

        Ok(Self {
            dataset_path,
            questions_path,
            chat_mode,
            server_addr,
        })
    }
}
