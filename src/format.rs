//! Formateo de respuestas: moneda con separadores de miles y los textos
//! fijos de conversación de ambos pipelines.

use crate::models::{AnswerRow, FilterSet};

// --- Textos del pipeline abierto (dashboard) ---

pub const OPEN_GREETING: &str = "Hi 👋 I’m your sales analytics assistant. You can ask me about sales, products, trends, and performance.";

pub const OPEN_THANKS: &str = "You're welcome! 😊 Happy to help.";

pub const OPEN_HELP: &str = "I can help you with:\n• Top category by sales\n• Top products\n• Monthly sales trend\n• Online vs store sales\n• Total revenue\n• Top locations";

pub const HOW_ARE_YOU: &str = "I’m doing great 😊 Thanks for asking! I’m ready to help you analyze sales, products, trends, or performance.";

pub const ACKNOWLEDGEMENT: &str = "👍 Got it! What would you like to check next?";

/// Respuesta explícita cuando ninguna regla dispara, para no devolver nunca
/// un cuerpo vacío.
pub const FALLBACK: &str = "🤔 I didn’t understand that. Try asking about sales, products, categories, trends or locations.";

pub const NO_DATA: &str = "❌ I can't find sales data for your request.";

// --- Textos del pipeline validado ---

pub const VALIDATED_GREETING: &str = "👋 Hi! I’m your sales dashboard assistant. Ask me about sales, products, or categories.";

pub const VALIDATED_THANKS: &str = "😊 You’re welcome! Happy to help.";

pub const GOODBYE: &str = "👋 Goodbye! Come back anytime.";

pub const VALIDATED_HELP: &str = "ℹ️ I can help you with:\n- Sales summary\n- Top products\n- Category performance\n- Monthly analysis\n\nTry asking: *Top selling product in June*";

/// Rechazo del validador cuando el mensaje no casa con ninguna pregunta
/// permitida. Distinto del texto de "sin datos".
pub const REFUSAL: &str = "❌ I can answer only dashboard-related questions.\nTry asking about sales, products, categories, or months.";

pub const VALIDATED_NO_DATA: &str = "❌ Sorry, I couldn’t find data for that.";

/// Formatea un importe como rupias con separadores de miles y exactamente
/// dos decimales, p. ej. `₹15,000.00`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = cents / 100;
    let fraction = cents % 100;

    let grouped = group_thousands(&units.to_string());
    let sign = if negative { "-" } else { "" };
    format!("₹{sign}{grouped}.{fraction:02}")
}

/// Respuesta del total de ventas: identifica sobre qué se ha medido
/// (producto, categoría o todos los productos) y el mes si se filtró.
pub fn total_sales_answer(filters: &FilterSet, total: f64) -> String {
    let subject = if let Some(product) = &filters.product {
        product.clone()
    } else if let Some(category) = &filters.category {
        format!("{category} category")
    } else {
        "all products".to_string()
    };

    let month_part = filters
        .month
        .as_deref()
        .map(|month| format!(" in {}", title_case(month)))
        .unwrap_or_default();

    format!(
        "🛍️ Total sales for {subject}{month_part} is {}.",
        format_currency(total)
    )
}

/// Filas (etiqueta, importe formateado) a partir de grupos sumados.
pub fn rows(groups: &[(String, f64)]) -> Vec<AnswerRow> {
    groups
        .iter()
        .map(|(label, total)| AnswerRow {
            label: label.clone(),
            amount: format_currency(*total),
        })
        .collect()
}

/// Primera letra en mayúscula; suficiente para los nombres de mes.
pub fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*byte as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn la_moneda_lleva_miles_y_dos_decimales() {
        assert_eq!(format_currency(15000.0), "₹15,000.00");
        assert_eq!(format_currency(1234567.891), "₹1,234,567.89");
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(999.5), "₹999.50");
        assert_eq!(format_currency(-42.0), "₹-42.00");
    }

    #[test]
    fn el_total_identifica_producto_categoria_o_todo() {
        let all = FilterSet::default();
        assert_eq!(
            total_sales_answer(&all, 17000.0),
            "🛍️ Total sales for all products is ₹17,000.00."
        );

        let by_category = FilterSet {
            category: Some("Men".to_string()),
            month: Some("june".to_string()),
            ..Default::default()
        };
        assert_eq!(
            total_sales_answer(&by_category, 11000.0),
            "🛍️ Total sales for Men category in June is ₹11,000.00."
        );

        let by_product = FilterSet {
            product: Some("Denim Jacket".to_string()),
            category: Some("Men".to_string()),
            ..Default::default()
        };
        assert_eq!(
            total_sales_answer(&by_product, 11000.0),
            "🛍️ Total sales for Denim Jacket is ₹11,000.00."
        );
    }

    #[test]
    fn title_case_para_meses() {
        assert_eq!(title_case("june"), "June");
        assert_eq!(title_case(""), "");
    }
}
