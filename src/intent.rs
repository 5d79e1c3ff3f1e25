//! Clasificación de intenciones por reglas de palabras clave.
//!
//! Conviven dos clasificadores para los dos modos de despliegue:
//!   - el abierto (dashboard), una lista ordenada de reglas (predicado,
//!     intención) donde gana la primera que dispara;
//!   - el validado, que comprueba primero las intenciones globales de
//!     conversación y sólo después las preguntas de negocio.

use crate::dataset::MONTH_NAMES;

/// Intención clasificada de un mensaje del usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    // Small-talk / intenciones globales
    Greeting,
    Thanks,
    Goodbye,
    Help,
    HowAreYou,
    Acknowledgement,
    // Consultas del dashboard (modo abierto)
    TotalSales,
    TopCategory,
    TopProduct,
    SalesByChannel,
    MonthlyTrend,
    TopLocations,
    // Consultas del pipeline validado
    CategorySales,
    MonthlySales,
    Unknown,
}

type Predicate = fn(&str) -> bool;

/// Reglas del clasificador abierto, evaluadas en orden de prioridad.
/// El orden importa: "top category" debe ganar antes que "category" a secas.
const OPEN_RULES: &[(Predicate, Intent)] = &[
    (is_total_sales, Intent::TotalSales),
    (is_top_category, Intent::TopCategory),
    (is_top_product, Intent::TopProduct),
    (is_sales_by_channel, Intent::SalesByChannel),
    (is_monthly_trend, Intent::MonthlyTrend),
    (is_top_locations, Intent::TopLocations),
    (is_greeting, Intent::Greeting),
    (is_thanks, Intent::Thanks),
    (is_help, Intent::Help),
    (is_how_are_you, Intent::HowAreYou),
    (is_acknowledgement, Intent::Acknowledgement),
];

/// Clasifica un mensaje en el modo abierto. Si ninguna regla dispara se
/// devuelve `Unknown`; el motor responde entonces con un texto explícito de
/// "no entendido" en lugar de un cuerpo vacío.
pub fn classify_open(message: &str) -> Intent {
    let message = message.to_lowercase();
    OPEN_RULES
        .iter()
        .find(|(predicate, _)| predicate(&message))
        .map(|(_, intent)| *intent)
        .unwrap_or(Intent::Unknown)
}

/// Intención global del pipeline validado. Si dispara, la respuesta es
/// enlatada y el dataset no se consulta.
pub fn classify_global(message: &str) -> Option<Intent> {
    let message = message.to_lowercase();

    if contains_any(&message, &["hi", "hello", "hey"]) {
        return Some(Intent::Greeting);
    }
    if contains_any(&message, &["thank", "thanks", "thank you"]) {
        return Some(Intent::Thanks);
    }
    if contains_any(&message, &["bye", "exit", "quit", "see you later", "goodbye"]) {
        return Some(Intent::Goodbye);
    }
    if contains_any(&message, &["help", "support", "what can you do"]) {
        return Some(Intent::Help);
    }
    None
}

/// Segundo clasificador del pipeline validado, aplicado sólo a mensajes que
/// han superado el filtro de preguntas permitidas.
pub fn classify_validated(message: &str) -> Intent {
    let message = message.to_lowercase();

    if message.contains("total sales") || message.contains("overall sales") {
        return Intent::TotalSales;
    }
    if message.contains("top") && message.contains("product") {
        return Intent::TopProduct;
    }
    if message.contains("category") {
        return Intent::CategorySales;
    }
    if message.contains("month") || MONTH_NAMES.iter().any(|m| message.contains(m)) {
        return Intent::MonthlySales;
    }
    Intent::Unknown
}

fn contains_any(message: &str, words: &[&str]) -> bool {
    words.iter().any(|word| message.contains(word))
}

fn is_total_sales(q: &str) -> bool {
    q.contains("total") && contains_any(q, &["sales", "revenue", "sale"])
}

fn is_top_category(q: &str) -> bool {
    q.contains("category") && contains_any(q, &["top", "highest", "best", "max"])
}

fn is_top_product(q: &str) -> bool {
    q.contains("product") && contains_any(q, &["top", "highest", "best"])
}

fn is_sales_by_channel(q: &str) -> bool {
    contains_any(q, &["channel", "online", "store"])
}

fn is_monthly_trend(q: &str) -> bool {
    contains_any(q, &["monthly", "trend"])
}

fn is_top_locations(q: &str) -> bool {
    contains_any(q, &["location", "city"])
}

fn is_greeting(q: &str) -> bool {
    contains_any(q, &["hi", "hello", "hey"])
}

fn is_thanks(q: &str) -> bool {
    contains_any(q, &["thanks", "thank you"])
}

fn is_help(q: &str) -> bool {
    q.contains("help") || q.contains("what can you do")
}

fn is_how_are_you(q: &str) -> bool {
    contains_any(
        q,
        &[
            "how are you",
            "how r you",
            "how is it going",
            "how was doing",
            "how are things",
        ],
    )
}

fn is_acknowledgement(q: &str) -> bool {
    contains_any(
        q,
        &["ok", "okay", "done", "great", "cool", "fine", "awesome", "nice"],
    )
}
