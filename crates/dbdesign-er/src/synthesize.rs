use std::collections::{BTreeMap, BTreeSet};

use dbdesign_core::{
    Attribute, Cardinality, Column, Endpoint, Entity, ErModel, ForeignKey, RelationalSchema,
    Relationship, Table, ensure_unique, normalize_name,
};

use crate::model::{SynthesisReport, UnresolvedEndpoint};

const DEFAULT_COLUMN_TYPE: &str = "TEXT";
const DEFAULT_KEY_TYPE: &str = "INTEGER";

/// Synthesize a relational schema from an ER model.
///
/// Relationships that cannot be placed are skipped silently; use
/// [`synthesize_with_report`] to see what was left out.
pub fn er_model_to_relational(model: &ErModel) -> RelationalSchema {
    synthesize_with_report(model).0
}

/// Synthesize a relational schema and report skipped relationships.
///
/// Entity tables come first in entity order, followed by junction tables in
/// relationship order.
pub fn synthesize_with_report(model: &ErModel) -> (RelationalSchema, SynthesisReport) {
    let mut tables = TableSet::default();
    let mut report = SynthesisReport::default();

    for entity in &model.entities {
        tables.upsert(Table {
            name: entity.id.clone(),
            columns: entity
                .attributes
                .iter()
                .map(|attribute| Column {
                    name: attribute.name.clone(),
                    data_type: type_or(&attribute.data_type, DEFAULT_COLUMN_TYPE),
                    is_primary_key: attribute.is_primary_key,
                })
                .collect(),
            foreign_keys: Vec::new(),
        });
    }

    let mut entities_by_id: BTreeMap<&str, &Entity> = BTreeMap::new();
    for entity in &model.entities {
        entities_by_id.entry(entity.id.as_str()).or_insert(entity);
    }

    let mut used_table_names: BTreeSet<String> = tables.names();

    for relationship in &model.relationships {
        let mut resolved: Vec<(&Endpoint, &Entity)> = Vec::new();
        for endpoint in &relationship.endpoints {
            match entities_by_id.get(endpoint.entity_id.as_str()) {
                Some(&entity) => resolved.push((endpoint, entity)),
                None => report.unresolved_endpoints.push(UnresolvedEndpoint {
                    relationship_id: relationship.id.clone(),
                    entity_id: endpoint.entity_id.clone(),
                }),
            }
        }

        if resolved.len() < 2 {
            tracing::debug!(
                event = "relationship_dropped",
                relationship = %relationship.id,
                resolved = resolved.len()
            );
            report.dropped_relationships.push(relationship.id.clone());
            continue;
        }

        if let Some((one, many)) = binary_one_to_many(relationship, &resolved) {
            if let Some(many_table) = tables.get_mut(&many.id) {
                fold_foreign_key(many_table, one);
                report.folded_relationships += 1;
            }
            continue;
        }

        let junction = junction_table(relationship, &resolved, &mut used_table_names);
        tracing::trace!(
            event = "junction_table_created",
            relationship = %relationship.id,
            table = %junction.name
        );
        report.junction_tables.push(junction.name.clone());
        tables.upsert(junction);
    }

    (tables.into_tables(), report)
}

/// Attributes identifying `entity`: the flagged primary attributes, else the
/// first attribute, else a synthetic integer `id`.
pub fn primary_attributes(entity: &Entity) -> Vec<Attribute> {
    let flagged: Vec<Attribute> = entity
        .attributes
        .iter()
        .filter(|attribute| attribute.is_primary_key)
        .cloned()
        .collect();
    if !flagged.is_empty() {
        return flagged;
    }

    match entity.attributes.first() {
        Some(first) => vec![first.clone()],
        None => vec![Attribute::new("id", DEFAULT_KEY_TYPE, true)],
    }
}

/// Returns `(one, many)` when the relationship is a plain binary 1:N.
fn binary_one_to_many<'a>(
    relationship: &Relationship,
    resolved: &[(&Endpoint, &'a Entity)],
) -> Option<(&'a Entity, &'a Entity)> {
    if resolved.len() != 2 || !relationship.attributes.is_empty() {
        return None;
    }

    let pick = |cardinality: Cardinality| {
        resolved
            .iter()
            .find(|(endpoint, _)| endpoint.cardinality == cardinality)
            .map(|(_, entity)| *entity)
    };

    Some((pick(Cardinality::One)?, pick(Cardinality::Many)?))
}

fn fold_foreign_key(many_table: &mut Table, one: &Entity) {
    let mut used_columns: BTreeSet<String> = many_table
        .columns
        .iter()
        .map(|column| column.name.clone())
        .collect();

    for attribute in primary_attributes(one) {
        let column_name = foreign_key_column_name(&one.id, &attribute.name, &mut used_columns);

        many_table.columns.push(Column {
            name: column_name.clone(),
            data_type: type_or(&attribute.data_type, DEFAULT_KEY_TYPE),
            is_primary_key: false,
        });
        many_table
            .foreign_keys
            .push(ForeignKey::new(column_name, one.id.clone(), attribute.name));
    }
}

fn junction_table(
    relationship: &Relationship,
    resolved: &[(&Endpoint, &Entity)],
    used_table_names: &mut BTreeSet<String>,
) -> Table {
    let preferred = if relationship.name.is_empty() {
        &relationship.id
    } else {
        &relationship.name
    };
    let mut table = Table::new(ensure_unique(&normalize_name(preferred), used_table_names));
    let mut used_columns = BTreeSet::new();

    for (_, entity) in resolved {
        for attribute in primary_attributes(entity) {
            let column_name = foreign_key_column_name(&entity.id, &attribute.name, &mut used_columns);

            table.columns.push(Column {
                name: column_name.clone(),
                data_type: type_or(&attribute.data_type, DEFAULT_KEY_TYPE),
                is_primary_key: true,
            });
            table
                .foreign_keys
                .push(ForeignKey::new(column_name, entity.id.clone(), attribute.name));
        }
    }

    for attribute in &relationship.attributes {
        table.columns.push(Column {
            name: ensure_unique(&normalize_name(&attribute.name), &mut used_columns),
            data_type: type_or(&attribute.data_type, DEFAULT_COLUMN_TYPE),
            is_primary_key: false,
        });
    }

    table
}

fn foreign_key_column_name(entity_id: &str, attribute: &str, used: &mut BTreeSet<String>) -> String {
    let preferred = format!("{}_{}", normalize_name(entity_id), normalize_name(attribute));
    ensure_unique(&preferred, used)
}

fn type_or(data_type: &str, fallback: &str) -> String {
    if data_type.is_empty() {
        fallback.to_string()
    } else {
        data_type.to_string()
    }
}

/// Tables keyed by name, keeping first-insertion order. Re-inserting a name
/// replaces the table in place.
#[derive(Default)]
struct TableSet {
    tables: Vec<Table>,
    positions: BTreeMap<String, usize>,
}

impl TableSet {
    fn upsert(&mut self, table: Table) {
        match self.positions.get(&table.name) {
            Some(&position) => self.tables[position] = table,
            None => {
                self.positions.insert(table.name.clone(), self.tables.len());
                self.tables.push(table);
            }
        }
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Table> {
        let position = *self.positions.get(name)?;
        self.tables.get_mut(position)
    }

    fn names(&self) -> BTreeSet<String> {
        self.positions.keys().cloned().collect()
    }

    fn into_tables(self) -> Vec<Table> {
        self.tables
    }
}
