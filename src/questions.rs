//! Carga de la lista de preguntas permitidas desde un PDF o fichero de texto.
//!
//! La lista es una entrada opaca para el validador: se conservan las líneas
//! que terminan en '?' y el resto del documento se ignora.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

/// Lee el fichero indicado (PDF o texto plano según la extensión) y devuelve
/// las preguntas encontradas, en minúsculas.
pub fn load_allowed_questions(path: &Path) -> Result<Vec<String>> {
    let extension = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| {
            anyhow!("No se pudo extraer texto del PDF {}: {}", path.display(), e)
        })?,
        _ => fs::read_to_string(path).with_context(|| {
            format!("No se pudo leer el fichero de preguntas {}", path.display())
        })?,
    };

    let questions = extract_question_lines(&text);
    if questions.is_empty() {
        warn!("Ninguna pregunta encontrada en {}", path.display());
    } else {
        info!(
            "{} preguntas permitidas cargadas desde {}",
            questions.len(),
            path.display()
        );
    }
    Ok(questions)
}

/// Conserva sólo las líneas que terminan en '?', recortadas y en minúsculas.
fn extract_question_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.ends_with('?'))
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn conserva_solo_las_lineas_interrogativas() {
        let text = "Dashboard FAQ\n\nWhat is the total sales?\nNotas sueltas\n  Top selling product?  \n";
        assert_eq!(
            extract_question_lines(text),
            vec!["what is the total sales?", "top selling product?"]
        );
    }

    #[test]
    fn carga_un_fichero_de_texto() {
        let mut file = tempfile::Builder::new()
            .suffix(".txt")
            .tempfile()
            .unwrap();
        writeln!(file, "Sales in June?").unwrap();
        writeln!(file, "esto no es una pregunta").unwrap();
        file.flush().unwrap();

        let questions = load_allowed_questions(file.path()).unwrap();
        assert_eq!(questions, vec!["sales in june?"]);
    }

    #[test]
    fn fichero_ausente_es_error() {
        assert!(load_allowed_questions(Path::new("/no/existe/preguntas.txt")).is_err());
    }
}
