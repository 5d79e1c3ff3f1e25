//! Extracción de entidades (mes, categoría, producto) por búsqueda de
//! subcadenas sobre el vocabulario del dataset.

use crate::dataset::{SalesDataset, MONTH_NAMES};
use crate::models::{Entity, FilterSet};

/// Extractor de entidad única usado por el pipeline validado.
///
/// Orden de prioridad fijo: primero el mes (lista fija de doce nombres),
/// después la categoría (valores distintos del dataset). Devuelve la primera
/// coincidencia; `None` significa "sin filtro", nunca un error.
pub fn extract_entity(text: &str, dataset: &SalesDataset) -> Option<Entity> {
    let text = text.to_lowercase();

    if let Some(month) = find_month(&text) {
        return Some(Entity::Month(month.to_string()));
    }

    find_value(&text, dataset.categories()).map(Entity::Category)
}

/// Extractor triple usado por la consulta de ventas totales: mes, categoría
/// y producto se buscan de forma independiente y las entidades presentes se
/// aplican como filtros simultáneos.
pub fn extract_filters(text: &str, dataset: &SalesDataset) -> FilterSet {
    let text = text.to_lowercase();

    let mut filters = FilterSet::default();
    let found = [
        find_month(&text).map(|m| Entity::Month(m.to_string())),
        find_value(&text, dataset.categories()).map(Entity::Category),
        find_value(&text, dataset.products()).map(Entity::Product),
    ];
    for entity in found.into_iter().flatten() {
        filters.apply(entity);
    }
    filters
}

fn find_month(text: &str) -> Option<&'static str> {
    MONTH_NAMES.iter().copied().find(|m| text.contains(m))
}

fn find_value(text: &str, values: &[String]) -> Option<String> {
    values
        .iter()
        .find(|value| text.contains(&value.to_lowercase()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::testdata::clothing_dataset;

    #[test]
    fn el_mes_tiene_prioridad_sobre_la_categoria() {
        let dataset = clothing_dataset();
        let entity = extract_entity("sales for men in june", &dataset);
        assert_eq!(entity, Some(Entity::Month("june".to_string())));
    }

    #[test]
    fn la_categoria_conserva_su_forma_original() {
        let dataset = clothing_dataset();
        let entity = extract_entity("how did MEN perform?", &dataset);
        assert_eq!(entity, Some(Entity::Category("Men".to_string())));
    }

    #[test]
    fn sin_coincidencias_devuelve_none() {
        let dataset = clothing_dataset();
        assert_eq!(extract_entity("what about shoes?", &dataset), None);
    }

    #[test]
    fn extract_filters_combina_los_tres_tipos() {
        let dataset = clothing_dataset();
        let filters = extract_filters("total sales of Denim Jacket for men in June", &dataset);
        assert_eq!(filters.month.as_deref(), Some("june"));
        assert_eq!(filters.category.as_deref(), Some("Men"));
        assert_eq!(filters.product.as_deref(), Some("Denim Jacket"));
    }

    #[test]
    fn extract_filters_sin_entidades_queda_vacio() {
        let dataset = clothing_dataset();
        let filters = extract_filters("total sales", &dataset);
        assert!(filters.is_empty());
    }
}
