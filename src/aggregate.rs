//! Motor de agregación: filtros de igualdad y sumas/agrupaciones sobre el
//! dataset en memoria. Todas las operaciones son lecturas acotadas; los
//! importes nulos contribuyen 0 y nunca provocan error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;

use crate::dataset::SalesDataset;
use crate::models::{FilterSet, SalesRecord};

/// Suma de `totalAmount` tras aplicar los filtros (combinados con AND).
/// Devuelve también el número de filas que casaron, para poder distinguir
/// "sin datos" de "total cero".
pub fn filtered_total(dataset: &SalesDataset, filters: &FilterSet) -> (f64, usize) {
    let mut total = 0.0;
    let mut matched = 0usize;

    for record in dataset.records() {
        if !matches_filters(record, filters) {
            continue;
        }
        matched += 1;
        total += amount(record);
    }

    (total, matched)
}

/// Comprueba los filtros presentes como igualdades sin distinguir mayúsculas.
pub fn matches_filters(record: &SalesRecord, filters: &FilterSet) -> bool {
    if let Some(month) = &filters.month {
        match &record.month {
            Some(record_month) if record_month.eq_ignore_ascii_case(month) => {}
            _ => return false,
        }
    }
    if let Some(category) = &filters.category {
        if !record.product_category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(product) = &filters.product {
        if !record.product_name.eq_ignore_ascii_case(product) {
            return false;
        }
    }
    true
}

/// Agrupa por la clave indicada y suma importes, conservando el orden de
/// primera aparición de cada grupo. Las filas sin clave se descartan.
pub fn group_sum<F>(dataset: &SalesDataset, key: F) -> Vec<(String, f64)>
where
    F: Fn(&SalesRecord) -> Option<String>,
{
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, f64> = HashMap::new();

    for record in dataset.records() {
        let Some(group) = key(record) else { continue };
        if !sums.contains_key(&group) {
            order.push(group.clone());
        }
        *sums.entry(group).or_insert(0.0) += amount(record);
    }

    order.into_iter().map(|group| {
        let total = sums[&group];
        (group, total)
    }).collect()
}

/// Agrupa, suma y ordena de forma descendente, devolviendo como máximo
/// `limit` entradas. Con menos grupos que `limit` se devuelven todos.
pub fn top_groups<F>(dataset: &SalesDataset, key: F, limit: usize) -> Vec<(String, f64)>
where
    F: Fn(&SalesRecord) -> Option<String>,
{
    let mut groups = group_sum(dataset, key);
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    groups.truncate(limit);
    groups
}

/// Tendencia mensual: suma por mes natural derivado de `saleDate`, con
/// etiqueta `AAAA-MM` y en orden cronológico. Las filas sin fecha de venta
/// válida quedan fuera.
pub fn monthly_trend(dataset: &SalesDataset) -> Vec<(String, f64)> {
    let mut sums: BTreeMap<(i32, u32), f64> = BTreeMap::new();

    for record in dataset.records() {
        let Some(date) = record.sale_date else { continue };
        *sums.entry((date.year(), date.month())).or_insert(0.0) += amount(record);
    }

    sums.into_iter()
        .map(|((year, month), total)| (format!("{year:04}-{month:02}"), total))
        .collect()
}

fn amount(record: &SalesRecord) -> f64 {
    record.total_amount.unwrap_or(0.0)
}
