use serde::Serialize;

/// Diagnostics collected while synthesizing tables from an ER model.
///
/// Synthesis never fails; anything it cannot place is recorded here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReport {
    /// Ids of relationships skipped for having fewer than two known endpoints.
    pub dropped_relationships: Vec<String>,
    /// Endpoints naming an entity id that is not part of the model.
    pub unresolved_endpoints: Vec<UnresolvedEndpoint>,
    /// Relationships folded into a foreign key on the "many" side.
    pub folded_relationships: usize,
    /// Junction tables created, in creation order.
    pub junction_tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedEndpoint {
    pub relationship_id: String,
    pub entity_id: String,
}

impl SynthesisReport {
    /// Returns true when every relationship made it into the schema.
    pub fn is_complete(&self) -> bool {
        self.dropped_relationships.is_empty() && self.unresolved_endpoints.is_empty()
    }
}
