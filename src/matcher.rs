//! Validación difusa de mensajes contra la lista de preguntas permitidas.

use strsim::normalized_levenshtein;

/// Ratio mínimo de similitud para aceptar una pregunta.
pub const MATCH_CUTOFF: f64 = 0.6;

/// Devuelve la pregunta permitida más parecida al mensaje si su ratio de
/// similitud (Levenshtein normalizado) alcanza el umbral; `None` en caso
/// contrario. Determinista y sin efectos secundarios.
pub fn match_question<'a>(message: &str, allowed: &'a [String]) -> Option<&'a str> {
    let message = message.to_lowercase();

    allowed
        .iter()
        .map(|question| (normalized_levenshtein(&message, question), question))
        .filter(|(score, _)| *score >= MATCH_CUTOFF)
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, question)| question.as_str())
}
