//! Modelos de dominio (registros de ventas, entidades y respuestas del chatbot).

use chrono::NaiveDate;
use serde::Serialize;

/// Representa una fila del dataset de ventas.
/// Inmutable tras la carga; las fechas e importes inválidos quedan como `None`.
#[derive(Debug, Clone)]
pub struct SalesRecord {
    pub sale_date: Option<NaiveDate>,
    pub order_date: Option<NaiveDate>,
    pub product_name: String,
    pub product_category: String,
    pub sales_channel: String,
    pub location: String,
    pub total_amount: Option<f64>,
    /// Nombre completo del mes derivado de `sale_date`, en minúsculas.
    pub month: Option<String>,
}

/// Entidad extraída del texto libre del usuario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Month(String),
    Category(String),
    Product(String),
}

/// Filtros opcionales para el cálculo de ventas totales.
/// Los filtros presentes se combinan con AND sobre el dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub month: Option<String>,
    pub category: Option<String>,
    pub product: Option<String>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.category.is_none() && self.product.is_none()
    }

    /// Incorpora una entidad extraída como filtro de su tipo.
    pub fn apply(&mut self, entity: Entity) {
        match entity {
            Entity::Month(month) => self.month = Some(month),
            Entity::Category(category) => self.category = Some(category),
            Entity::Product(product) => self.product = Some(product),
        }
    }
}

/// Fila (etiqueta, importe formateado) para render tabular o de gráficos.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AnswerRow {
    pub label: String,
    pub amount: String,
}

/// Respuesta del motor: texto formateado y, para resultados con forma de
/// lista, una secuencia ordenada de filas.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<AnswerRow>>,
}

impl Answer {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            data: None,
        }
    }

    pub fn with_data(answer: impl Into<String>, rows: Vec<AnswerRow>) -> Self {
        Self {
            answer: answer.into(),
            data: Some(rows),
        }
    }
}
