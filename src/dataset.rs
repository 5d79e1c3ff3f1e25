//! Carga del dataset de ventas (CSV) en una tabla en memoria de sólo lectura.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::models::SalesRecord;

/// Nombres completos de los doce meses, en minúsculas.
/// Es el vocabulario fijo del extractor de entidades de tipo mes.
pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Formatos de fecha aceptados, probados en orden.
/// El convenio es día-primero; el formato ISO se acepta como alternativa.
const DATE_FORMATS: [&str; 6] = [
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%d-%m-%y",
    "%d/%m/%y",
    "%Y/%m/%d",
];

/// Fila cruda del CSV, tal y como llega del fichero.
/// Todos los campos se leen como texto y se convierten después,
/// de forma que un valor inválido nunca haga fallar la carga.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "saleDate", default)]
    sale_date: String,
    #[serde(rename = "orderDate", default)]
    order_date: String,
    #[serde(rename = "productName", default)]
    product_name: String,
    #[serde(rename = "productCategory", default)]
    product_category: String,
    #[serde(rename = "salesChannel", default)]
    sales_channel: String,
    #[serde(rename = "location", default)]
    location: String,
    #[serde(rename = "totalAmount", default)]
    total_amount: String,
}

/// Dataset de ventas inmutable, compartido por todas las peticiones.
///
/// Mantiene los valores distintos de categoría y producto (para el extractor
/// de entidades) y un contador atómico de accesos a los registros, que los
/// tests usan para verificar que el small-talk nunca toca los datos.
pub struct SalesDataset {
    records: Vec<SalesRecord>,
    categories: Vec<String>,
    products: Vec<String>,
    accesses: AtomicU64,
}

impl SalesDataset {
    /// Carga el dataset desde un fichero CSV. Un fichero ausente o ilegible
    /// es un error fatal; una fecha o importe malformados no lo son.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("No se pudo abrir el dataset: {}", path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<RawRow>() {
            let raw = row.with_context(|| format!("Fila malformada en {}", path.display()))?;
            records.push(to_record(raw));
        }

        info!(
            "Dataset cargado: {} registros desde {}",
            records.len(),
            path.display()
        );
        Ok(Self::from_records(records))
    }

    /// Construye el dataset a partir de registros ya en memoria.
    /// Deriva el mes de cada registro y los valores distintos de las columnas.
    /// Es el punto de entrada para datasets sintéticos en los tests.
    pub fn from_records(mut records: Vec<SalesRecord>) -> Self {
        for record in &mut records {
            record.month = record.sale_date.map(|d| month_name(d).to_string());
        }

        let categories = distinct(records.iter().map(|r| r.product_category.as_str()));
        let products = distinct(records.iter().map(|r| r.product_name.as_str()));

        Self {
            records,
            categories,
            products,
            accesses: AtomicU64::new(0),
        }
    }

    /// Acceso de sólo lectura a los registros. Incrementa el contador de accesos.
    pub fn records(&self) -> &[SalesRecord] {
        self.accesses.fetch_add(1, Ordering::Relaxed);
        &self.records
    }

    /// Valores distintos de `productCategory`, en orden de primera aparición.
    pub fn categories(&self) -> &[String] {
        self.accesses.fetch_add(1, Ordering::Relaxed);
        &self.categories
    }

    /// Valores distintos de `productName`, en orden de primera aparición.
    pub fn products(&self) -> &[String] {
        self.accesses.fetch_add(1, Ordering::Relaxed);
        &self.products
    }

    /// Número de registros cargados. No cuenta como acceso de consulta.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Número de veces que alguna consulta ha leído los datos.
    pub fn access_count(&self) -> u64 {
        self.accesses.load(Ordering::Relaxed)
    }
}

/// Nombre completo del mes de una fecha, en minúsculas.
pub fn month_name(date: NaiveDate) -> &'static str {
    MONTH_NAMES[date.month0() as usize]
}

fn to_record(raw: RawRow) -> SalesRecord {
    SalesRecord {
        sale_date: parse_date(&raw.sale_date),
        order_date: parse_date(&raw.order_date),
        product_name: raw.product_name.trim().to_string(),
        product_category: raw.product_category.trim().to_string(),
        sales_channel: raw.sales_channel.trim().to_string(),
        location: raw.location.trim().to_string(),
        total_amount: parse_amount(&raw.total_amount),
        // Se deriva en from_records a partir de sale_date.
        month: None,
    }
}

/// Parseo permisivo de fechas: se prueban varios formatos y un valor
/// irreconocible queda como `None`, nunca como error.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Importe numérico; separadores de miles y espacios se toleran.
/// Los valores no finitos ("nan", "inf") cuentan como inválidos: un solo
/// NaN contaminaría todas las sumas posteriores.
fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            result.push(trimmed.to_string());
        }
    }
    result
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_date_acepta_dia_primero_e_iso() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 12).unwrap();
        assert_eq!(parse_date("12-06-2023"), Some(expected));
        assert_eq!(parse_date("12/06/2023"), Some(expected));
        assert_eq!(parse_date("2023-06-12"), Some(expected));
    }

    #[test]
    fn parse_date_invalida_es_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("no es una fecha"), None);
        assert_eq!(parse_date("45-45-2023"), None);
    }

    #[test]
    fn parse_amount_tolera_miles_y_rechaza_texto() {
        assert_eq!(parse_amount("1,500.50"), Some(1500.50));
        assert_eq!(parse_amount(" 42 "), Some(42.0));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn parse_amount_descarta_valores_no_finitos() {
        assert_eq!(parse_amount("nan"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("-inf"), None);
    }

    #[test]
    fn un_importe_nan_no_envenena_las_sumas() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "saleDate,orderDate,productName,productCategory,salesChannel,location,totalAmount"
        )
        .unwrap();
        writeln!(file, "01-06-2023,01-06-2023,Denim Jacket,Men,Online,Mumbai,100.00").unwrap();
        writeln!(file, "02-06-2023,02-06-2023,Denim Jacket,Men,Online,Mumbai,nan").unwrap();
        file.flush().unwrap();

        let dataset = SalesDataset::load(file.path()).unwrap();
        assert_eq!(dataset.records()[1].total_amount, None);

        let (total, matched) = crate::aggregate::filtered_total(
            &dataset,
            &crate::models::FilterSet::default(),
        );
        assert!(total.is_finite());
        assert_eq!(total, 100.0);
        assert_eq!(matched, 2);
    }

    #[test]
    fn month_name_es_minusculas() {
        assert_eq!(month_name(testdata::date(2023, 6, 1)), "june");
        assert_eq!(month_name(testdata::date(2023, 12, 31)), "december");
    }

    #[test]
    fn load_deriva_mes_y_coacciona_valores_invalidos() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "saleDate,orderDate,productName,productCategory,salesChannel,location,totalAmount"
        )
        .unwrap();
        writeln!(file, "15-06-2023,10-06-2023,Denim Jacket,Men,Online,Mumbai,1500.00").unwrap();
        writeln!(file, "fecha-mala,,Summer Dress,Women,Store,Delhi,no-numerico").unwrap();
        file.flush().unwrap();

        let dataset = SalesDataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);

        let records = dataset.records();
        assert_eq!(records[0].month.as_deref(), Some("june"));
        assert_eq!(records[0].total_amount, Some(1500.0));
        assert_eq!(records[1].sale_date, None);
        assert_eq!(records[1].month, None);
        assert_eq!(records[1].total_amount, None);
    }

    #[test]
    fn load_falla_si_no_existe_el_fichero() {
        let result = SalesDataset::load(Path::new("/no/existe/ventas.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn from_records_calcula_valores_distintos_sin_duplicados() {
        let dataset = testdata::clothing_dataset();
        assert_eq!(dataset.categories(), &["Men", "Women", "Kids"]);
        assert_eq!(
            dataset.products(),
            &["Denim Jacket", "Summer Dress", "Kids Hoodie"]
        );
    }

    #[test]
    fn is_empty_distingue_el_dataset_sin_registros() {
        let empty = SalesDataset::from_records(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert!(!testdata::clothing_dataset().is_empty());
    }

    #[test]
    fn el_contador_de_accesos_registra_las_lecturas() {
        let dataset = testdata::clothing_dataset();
        assert_eq!(dataset.access_count(), 0);
        let _ = dataset.records();
        let _ = dataset.categories();
        assert_eq!(dataset.access_count(), 2);
    }
}
