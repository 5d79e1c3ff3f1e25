//! Motor de respuestas: une clasificación, extracción de entidades,
//! agregación y formateo detrás de una única interfaz.
//!
//! Los dos modos de despliegue comparten el motor:
//!   - `Open`: clasificación directa del texto libre (dashboard).
//!   - `Validated`: sólo se responden mensajes que casan con la lista de
//!     preguntas permitidas; el resto se rechaza con un texto fijo.

use std::sync::Arc;

use tracing::debug;

use crate::aggregate;
use crate::config::ChatMode;
use crate::dataset::SalesDataset;
use crate::entities;
use crate::format;
use crate::intent::{self, Intent};
use crate::matcher;
use crate::models::{Answer, Entity, FilterSet};

/// Motor construido una sola vez al arrancar e inyectado en los handlers.
/// Todo su estado es de sólo lectura.
pub struct AnswerEngine {
    dataset: Arc<SalesDataset>,
    allowed_questions: Vec<String>,
    mode: ChatMode,
}

impl AnswerEngine {
    pub fn new(
        dataset: Arc<SalesDataset>,
        allowed_questions: Vec<String>,
        mode: ChatMode,
    ) -> Self {
        Self {
            dataset,
            allowed_questions,
            mode,
        }
    }

    pub fn record_count(&self) -> usize {
        self.dataset.len()
    }

    /// Responde a un mensaje según el modo configurado.
    pub fn answer(&self, message: &str) -> Answer {
        match self.mode {
            ChatMode::Open => self.answer_open(message),
            ChatMode::Validated => self.answer_validated(message),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline abierto (dashboard)
    // ------------------------------------------------------------------

    fn answer_open(&self, message: &str) -> Answer {
        let intent = intent::classify_open(message);
        debug!(?intent, "mensaje clasificado (modo abierto)");

        match intent {
            Intent::TotalSales => self.total_sales(message),
            Intent::TopCategory => self.top_category(),
            Intent::TopProduct => self.top_products(),
            Intent::SalesByChannel => self.sales_by_channel(),
            Intent::MonthlyTrend => self.monthly_trend(),
            Intent::TopLocations => self.top_locations(),
            Intent::Greeting => Answer::text(format::OPEN_GREETING),
            Intent::Thanks => Answer::text(format::OPEN_THANKS),
            Intent::Help => Answer::text(format::OPEN_HELP),
            Intent::HowAreYou => Answer::text(format::HOW_ARE_YOU),
            Intent::Acknowledgement => Answer::text(format::ACKNOWLEDGEMENT),
            _ => Answer::text(format::FALLBACK),
        }
    }

    /// Total de ventas con filtros opcionales de mes, categoría y producto,
    /// todos extraídos del propio mensaje y combinados con AND.
    fn total_sales(&self, message: &str) -> Answer {
        let filters = entities::extract_filters(message, &self.dataset);
        let (total, matched) = aggregate::filtered_total(&self.dataset, &filters);

        if matched == 0 || total == 0.0 {
            return Answer::text(format::NO_DATA);
        }
        Answer::text(format::total_sales_answer(&filters, total))
    }

    fn top_category(&self) -> Answer {
        let top = aggregate::top_groups(&self.dataset, |r| non_empty(&r.product_category), 1);
        match top.first() {
            Some((category, total)) => Answer::text(format!(
                "Top category by sales is {} with revenue {}",
                category,
                format::format_currency(*total)
            )),
            None => Answer::text(format::NO_DATA),
        }
    }

    fn top_products(&self) -> Answer {
        let top = aggregate::top_groups(&self.dataset, |r| non_empty(&r.product_name), 5);
        if top.is_empty() {
            return Answer::text(format::NO_DATA);
        }

        let mut lines = vec!["🏆 Top 5 Products by Sales:".to_string()];
        for (rank, (product, total)) in top.iter().enumerate() {
            lines.push(format!(
                "{}. {} – {}",
                rank + 1,
                product,
                format::format_currency(*total)
            ));
        }
        Answer::with_data(lines.join("\n"), format::rows(&top))
    }

    fn sales_by_channel(&self) -> Answer {
        let by_channel = aggregate::group_sum(&self.dataset, |r| non_empty(&r.sales_channel));
        if by_channel.is_empty() {
            return Answer::text(format::NO_DATA);
        }
        Answer::with_data("Sales by channel", format::rows(&by_channel))
    }

    fn monthly_trend(&self) -> Answer {
        let trend = aggregate::monthly_trend(&self.dataset);
        if trend.is_empty() {
            return Answer::text(format::NO_DATA);
        }
        Answer::with_data("Monthly sales trend", format::rows(&trend))
    }

    fn top_locations(&self) -> Answer {
        let top = aggregate::top_groups(&self.dataset, |r| non_empty(&r.location), 5);
        if top.is_empty() {
            return Answer::text(format::NO_DATA);
        }
        Answer::with_data("Top locations by sales", format::rows(&top))
    }

    // ------------------------------------------------------------------
    // Pipeline validado
    // ------------------------------------------------------------------

    fn answer_validated(&self, message: &str) -> Answer {
        // Las intenciones globales responden sin consultar el dataset.
        if let Some(global) = intent::classify_global(message) {
            debug!(?global, "intención global, se omite el dataset");
            return Answer::text(global_reply(global));
        }

        let Some(matched) = matcher::match_question(message, &self.allowed_questions) else {
            debug!("mensaje sin pregunta permitida equivalente");
            return Answer::text(format::REFUSAL);
        };
        debug!(matched, "pregunta validada");

        let intent = intent::classify_validated(message);
        let entity = entities::extract_entity(message, &self.dataset);

        match intent {
            Intent::TotalSales => {
                let (total, rows) =
                    aggregate::filtered_total(&self.dataset, &FilterSet::default());
                if rows == 0 || total == 0.0 {
                    return Answer::text(format::VALIDATED_NO_DATA);
                }
                Answer::text(format!(
                    "📊 **Total Sales:** {}",
                    format::format_currency(total)
                ))
            }
            Intent::TopProduct => {
                let top = aggregate::top_groups(&self.dataset, |r| non_empty(&r.product_name), 1);
                match top.first() {
                    Some((product, total)) => Answer::text(format!(
                        "🏆 **Top Selling Product:** {} ({})",
                        product,
                        format::format_currency(*total)
                    )),
                    None => Answer::text(format::VALIDATED_NO_DATA),
                }
            }
            Intent::CategorySales => match entity {
                Some(Entity::Category(category)) => {
                    let filters = FilterSet {
                        category: Some(category.clone()),
                        ..Default::default()
                    };
                    let (total, rows) = aggregate::filtered_total(&self.dataset, &filters);
                    if rows == 0 || total == 0.0 {
                        return Answer::text(format::VALIDATED_NO_DATA);
                    }
                    Answer::text(format!(
                        "📦 **Total Sales for {}:** {}",
                        category,
                        format::format_currency(total)
                    ))
                }
                _ => Answer::text(format::VALIDATED_NO_DATA),
            },
            Intent::MonthlySales => match entity {
                Some(Entity::Month(month)) => {
                    let filters = FilterSet {
                        month: Some(month.clone()),
                        ..Default::default()
                    };
                    let (total, rows) = aggregate::filtered_total(&self.dataset, &filters);
                    if rows == 0 || total == 0.0 {
                        return Answer::text(format::VALIDATED_NO_DATA);
                    }
                    Answer::text(format!(
                        "📅 **Sales in {}:** {}",
                        format::title_case(&month),
                        format::format_currency(total)
                    ))
                }
                _ => Answer::text(format::VALIDATED_NO_DATA),
            },
            _ => Answer::text(format::VALIDATED_NO_DATA),
        }
    }
}

fn global_reply(intent: Intent) -> &'static str {
    match intent {
        Intent::Greeting => format::VALIDATED_GREETING,
        Intent::Thanks => format::VALIDATED_THANKS,
        Intent::Goodbye => format::GOODBYE,
        _ => format::VALIDATED_HELP,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testdata::clothing_dataset;

    fn open_engine() -> AnswerEngine {
        AnswerEngine::new(Arc::new(clothing_dataset()), Vec::new(), ChatMode::Open)
    }

    fn validated_engine() -> AnswerEngine {
        let allowed = vec![
            "what is the total sales?".to_string(),
            "top selling product?".to_string(),
            "what are the sales for the men category?".to_string(),
            "what were the sales in june?".to_string(),
        ];
        AnswerEngine::new(Arc::new(clothing_dataset()), allowed, ChatMode::Validated)
    }

    #[test]
    fn el_total_sin_filtros_suma_toda_la_tabla() {
        let engine = open_engine();
        let answer = engine.answer("total sales");
        assert_eq!(
            answer.answer,
            "🛍️ Total sales for all products is ₹17,000.00."
        );
    }

    #[test]
    fn el_total_filtrado_por_mes_menciona_el_mes() {
        let engine = open_engine();
        let answer = engine.answer("total sales in june");
        assert!(answer.answer.contains("15,000.00"), "{}", answer.answer);
        assert!(answer.answer.contains("June"), "{}", answer.answer);
    }

    #[test]
    fn el_total_sin_datos_responde_sin_datos() {
        let engine = open_engine();
        let answer = engine.answer("total sales in december");
        assert_eq!(answer.answer, format::NO_DATA);
    }

    #[test]
    fn top_productos_con_menos_de_cinco_no_falla() {
        let engine = open_engine();
        let answer = engine.answer("top 5 products");
        let rows = answer.data.expect("debe llevar datos tabulares");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].label, "Denim Jacket");
        assert_eq!(rows[0].amount, "₹11,000.00");
        assert!(answer.answer.starts_with("🏆 Top 5 Products by Sales:"));
    }

    #[test]
    fn ventas_por_canal_devuelve_tabla() {
        let engine = open_engine();
        let answer = engine.answer("online vs store sales");
        assert_eq!(answer.answer, "Sales by channel");
        let rows = answer.data.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn la_tendencia_mensual_es_cronologica() {
        let engine = open_engine();
        let answer = engine.answer("show me the monthly trend");
        let rows = answer.data.unwrap();
        assert_eq!(rows[0].label, "2023-06");
        assert_eq!(rows[1].label, "2023-07");
        assert_eq!(rows[0].amount, "₹15,000.00");
    }

    #[test]
    fn top_ubicaciones_ordenadas() {
        let engine = open_engine();
        let answer = engine.answer("top locations");
        let rows = answer.data.unwrap();
        assert_eq!(rows[0].label, "Mumbai");
        assert_eq!(rows[0].amount, "₹11,000.00");
    }

    #[test]
    fn el_saludo_no_toca_el_dataset() {
        let dataset = Arc::new(clothing_dataset());
        let engine = AnswerEngine::new(dataset.clone(), Vec::new(), ChatMode::Open);
        let answer = engine.answer("hello");
        assert_eq!(answer.answer, format::OPEN_GREETING);
        assert_eq!(dataset.access_count(), 0);
    }

    #[test]
    fn sin_regla_hay_respuesta_explicita() {
        let engine = open_engine();
        let answer = engine.answer("abracadabra");
        assert_eq!(answer.answer, format::FALLBACK);
        assert!(answer.data.is_none());
    }

    #[test]
    fn modo_validado_saluda_sin_tocar_el_dataset() {
        let dataset = Arc::new(clothing_dataset());
        let engine = AnswerEngine::new(dataset.clone(), Vec::new(), ChatMode::Validated);
        let answer = engine.answer("hello");
        assert_eq!(answer.answer, format::VALIDATED_GREETING);
        assert_eq!(dataset.access_count(), 0);
    }

    #[test]
    fn modo_validado_rechaza_preguntas_desconocidas() {
        let engine = validated_engine();
        let answer = engine.answer("tell me a joke about penguins");
        assert_eq!(answer.answer, format::REFUSAL);
    }

    #[test]
    fn modo_validado_responde_el_total() {
        let engine = validated_engine();
        let answer = engine.answer("what is the total sales?");
        assert_eq!(answer.answer, "📊 **Total Sales:** ₹17,000.00");
    }

    #[test]
    fn modo_validado_responde_ventas_por_categoria() {
        let engine = validated_engine();
        let answer = engine.answer("what are the sales for the men category?");
        assert_eq!(answer.answer, "📦 **Total Sales for Men:** ₹11,000.00");
    }

    #[test]
    fn modo_validado_responde_ventas_del_mes() {
        let engine = validated_engine();
        let answer = engine.answer("what were the sales in june?");
        assert_eq!(answer.answer, "📅 **Sales in June:** ₹15,000.00");
    }
}
