use agro_etl::columns::{normalize_column_name, normalize_column_names, normalize_columns};
use agro_etl::data::Value;
use agro_etl::frame::Table;
use proptest::prelude::*;

#[test]
fn normalize_column_names_preserves_length_and_order() {
    let canonical = normalize_column_names(&["Entidad ", "Superficie Cultivada", "Produccion_Ton"]);
    assert_eq!(canonical, ["entidad", "superficie_cultivada", "produccion_ton"]);
}

#[test]
fn normalize_columns_resolves_collisions_last_write_wins() {
    let mut table = Table::new(
        vec!["Cultivo".into(), "CULTIVO ".into(), "Superficie".into()],
        vec![vec![
            Some(Value::Text("maiz".into())),
            Some(Value::Text("frijol".into())),
            Some(Value::Integer(3)),
        ]],
    )
    .unwrap();

    let collisions = normalize_columns(&mut table).unwrap();

    assert_eq!(collisions.len(), 1);
    assert_eq!(table.headers(), ["cultivo", "superficie"]);
    assert_eq!(table.rows()[0][0], Some(Value::Text("frijol".into())));
}

#[test]
fn accented_letters_are_dropped_not_transliterated() {
    assert_eq!(normalize_column_name("Año Agrícola"), "ao_agrcola");
    assert_eq!(normalize_column_name("Superficie UPA (ha)"), "superficie_upa_ha");
}

proptest! {
    #[test]
    fn normalize_column_name_is_idempotent(label in "\\PC*") {
        let once = normalize_column_name(&label);
        prop_assert_eq!(normalize_column_name(&once), once.clone());
    }

    #[test]
    fn normalize_column_name_emits_only_canonical_characters(label in "[ A-Za-z0-9_%()./#áéíóúÑ-]{0,24}") {
        let canonical = normalize_column_name(&label);
        prop_assert!(
            canonical
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_'),
            "{:?} -> {:?}",
            label,
            canonical
        );
    }
}
