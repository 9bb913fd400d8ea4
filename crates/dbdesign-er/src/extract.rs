use std::collections::BTreeSet;

use dbdesign_core::{Attribute, Cardinality, Column, Endpoint, Entity, ErModel, Relationship, Table};

/// A table is associative when its whole primary key is made of foreign-key
/// columns and it references at least two tables.
pub fn is_associative_table(table: &Table) -> bool {
    if table.foreign_keys.len() < 2 {
        return false;
    }

    let mut primary = table.primary_key_columns().peekable();
    if primary.peek().is_none() {
        return false;
    }

    primary.all(|column| table.is_foreign_key_column(column))
}

/// Infer an ER model from a relational schema snapshot.
///
/// Associative tables become N:N relationships when at least two of their
/// referenced tables are entities and vanish otherwise. Every other table
/// becomes an entity, and each distinct table it references yields one 1:N
/// relationship, however many foreign keys point there.
pub fn relational_to_er_model(schema: &[Table]) -> ErModel {
    let associative: BTreeSet<&str> = schema
        .iter()
        .filter(|table| is_associative_table(table))
        .map(|table| table.name.as_str())
        .collect();

    let entities: Vec<Entity> = schema
        .iter()
        .filter(|table| !associative.contains(table.name.as_str()))
        .map(|table| Entity {
            id: table.name.clone(),
            name: table.name.clone(),
            attributes: table.columns.iter().map(to_attribute).collect(),
        })
        .collect();

    let entity_ids: BTreeSet<&str> = entities.iter().map(|entity| entity.id.as_str()).collect();
    let mut relationships = Vec::new();

    for table in schema {
        if associative.contains(table.name.as_str()) {
            match associative_relationship(table, &entity_ids) {
                Some(relationship) => relationships.push(relationship),
                None => tracing::debug!(
                    event = "associative_table_dropped",
                    table = %table.name,
                    "fewer than two referenced entities"
                ),
            }
            continue;
        }

        if !entity_ids.contains(table.name.as_str()) {
            continue;
        }

        for referenced in referenced_tables(table) {
            if !entity_ids.contains(referenced) {
                tracing::trace!(
                    event = "reference_skipped",
                    table = %table.name,
                    referenced = %referenced
                );
                continue;
            }

            relationships.push(Relationship {
                id: format!("{}_to_{}", table.name, referenced),
                name: format!("{}_{}", table.name, referenced),
                endpoints: vec![
                    Endpoint::new(table.name.clone(), Cardinality::Many),
                    Endpoint::new(referenced, Cardinality::One),
                ],
                attributes: Vec::new(),
            });
        }
    }

    ErModel {
        entities,
        relationships,
    }
}

fn associative_relationship(table: &Table, entity_ids: &BTreeSet<&str>) -> Option<Relationship> {
    // Only the first foreign key per referenced table produces an endpoint.
    let endpoints: Vec<Endpoint> = referenced_tables(table)
        .into_iter()
        .filter(|referenced| entity_ids.contains(referenced))
        .map(|referenced| Endpoint::new(referenced, Cardinality::Many))
        .collect();

    if endpoints.len() < 2 {
        return None;
    }

    Some(Relationship {
        id: table.name.clone(),
        name: table.name.clone(),
        endpoints,
        attributes: table
            .columns
            .iter()
            .filter(|column| !table.is_foreign_key_column(&column.name))
            .map(to_attribute)
            .collect(),
    })
}

/// Distinct referenced table names in first-seen order.
fn referenced_tables(table: &Table) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for fk in &table.foreign_keys {
        if !seen.contains(&fk.referenced_table.as_str()) {
            seen.push(&fk.referenced_table);
        }
    }
    seen
}

fn to_attribute(column: &Column) -> Attribute {
    Attribute {
        name: column.name.clone(),
        data_type: column.data_type.clone(),
        is_primary_key: column.is_primary_key,
    }
}
