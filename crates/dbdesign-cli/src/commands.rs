use std::path::Path;

use schemars::schema_for;
use serde::Serialize;
use tracing::{info, warn};

use dbdesign_core::{ErModel, RelationalSchema, validate_schema};
use dbdesign_er::{SynthesisReport, relational_to_er_model, synthesize_with_report};
use dbdesign_fd::{
    CandidateKeySearch, MAX_OPTIONAL_ATTRIBUTES, PrimaryAttributeSuggestion,
    parse_functional_dependencies, search_candidate_keys,
};
use dbdesign_introspect::{Request, Response, SessionHost};
use dbdesign_sql::{mysql_to_sqlite, relational_schema_to_sql};

use crate::error::{CliError, CliResult};
use crate::input::read_json_document;
use crate::output::{emit_json, emit_text};
use crate::settings::LoadSettings;

pub fn run_extract(input: &Path, out: Option<&Path>) -> CliResult<()> {
    let schema: RelationalSchema = read_json_document(input)?;
    validate_schema(&schema)?;

    let model = relational_to_er_model(&schema);
    info!(
        event = "model_extracted",
        entities = model.entities.len(),
        relationships = model.relationships.len()
    );
    emit_json(out, &model)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesisOutput<'a> {
    schema: &'a RelationalSchema,
    report: &'a SynthesisReport,
}

pub fn run_synthesize(input: &Path, ddl: bool, report: bool, out: Option<&Path>) -> CliResult<()> {
    let model: ErModel = read_json_document(input)?;
    let (schema, synthesis) = synthesize_with_report(&model);

    for id in &synthesis.dropped_relationships {
        warn!(event = "relationship_dropped", relationship = %id);
    }
    for endpoint in &synthesis.unresolved_endpoints {
        warn!(
            event = "endpoint_unresolved",
            relationship = %endpoint.relationship_id,
            entity = %endpoint.entity_id
        );
    }
    info!(
        event = "schema_synthesized",
        tables = schema.len(),
        folded = synthesis.folded_relationships,
        junctions = synthesis.junction_tables.len()
    );

    if ddl {
        return emit_text(out, &relational_schema_to_sql(&schema));
    }
    if report {
        return emit_json(
            out,
            &SynthesisOutput {
                schema: &schema,
                report: &synthesis,
            },
        );
    }
    emit_json(out, &schema)
}

pub fn run_ddl(input: &Path, out: Option<&Path>) -> CliResult<()> {
    let schema: RelationalSchema = read_json_document(input)?;
    emit_text(out, &relational_schema_to_sql(&schema))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct KeysOutput {
    search: CandidateKeySearch,
    #[serde(flatten)]
    suggestion: PrimaryAttributeSuggestion,
    parse_errors: Vec<String>,
}

pub fn run_keys(attributes: &[String], dependencies: &Path, out: Option<&Path>) -> CliResult<()> {
    let text = std::fs::read_to_string(dependencies)?;
    let parsed = parse_functional_dependencies(&text);
    let parse_errors = parsed.error_messages();
    for message in &parse_errors {
        warn!(event = "dependency_parse_error", %message);
    }

    let attributes: Vec<String> = attributes
        .iter()
        .map(|attribute| attribute.trim().to_string())
        .filter(|attribute| !attribute.is_empty())
        .collect();

    let search = search_candidate_keys(&attributes, &parsed.dependencies);
    if let CandidateKeySearch::Skipped { optional } = search {
        warn!(
            event = "key_search_skipped",
            optional,
            limit = MAX_OPTIONAL_ATTRIBUTES,
            "too many derivable attributes for candidate-key search"
        );
    }
    let suggestion = PrimaryAttributeSuggestion::from_keys(search.clone().into_keys());

    emit_json(
        out,
        &KeysOutput {
            search,
            suggestion,
            parse_errors,
        },
    )
}

pub fn run_rewrite(input: &Path, out: Option<&Path>) -> CliResult<()> {
    let sql = std::fs::read_to_string(input)?;
    emit_text(out, &mysql_to_sqlite(&sql))
}

pub async fn run_load(
    input: &Path,
    query: Option<String>,
    settings: &LoadSettings,
    out: Option<&Path>,
) -> CliResult<()> {
    let raw = std::fs::read_to_string(input)?;
    let sql = if settings.rewrite_mysql {
        mysql_to_sqlite(&raw)
    } else {
        raw
    };
    let name = database_name(input);

    let mut host = SessionHost::new();
    let mut response = host.handle(Request::LoadDatabase { sql, name }).await;
    if matches!(response, Response::DatabaseLoaded { .. }) {
        if let Some(sql) = query {
            response = host.handle(Request::RunQuery { sql }).await;
        }
    }
    host.shutdown().await?;

    emit_json(out, &response)?;
    match response {
        Response::Error { message } => Err(CliError::Query(message)),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DocumentKind {
    /// Relational schema snapshot.
    Schema,
    /// ER model.
    Er,
}

pub fn run_json_schema(kind: DocumentKind, out: Option<&Path>) -> CliResult<()> {
    match kind {
        DocumentKind::Schema => emit_json(out, &schema_for!(RelationalSchema)),
        DocumentKind::Er => emit_json(out, &schema_for!(ErModel)),
    }
}

fn database_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_name_is_the_file_name() {
        assert_eq!(database_name(Path::new("dumps/schule.sql")), "schule.sql");
    }

    #[test]
    fn keys_output_flattens_the_suggestion() {
        let output = KeysOutput {
            search: CandidateKeySearch::Found {
                keys: vec![vec!["A".to_string()]],
            },
            suggestion: PrimaryAttributeSuggestion {
                primary_attributes: vec!["A".to_string()],
                candidate_keys: vec![vec!["A".to_string()]],
            },
            parse_errors: Vec::new(),
        };

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["search"]["status"], "found");
        assert_eq!(value["primaryAttributes"][0], "A");
        assert_eq!(value["candidateKeys"][0][0], "A");
        assert!(value["parseErrors"].as_array().unwrap().is_empty());
    }

    #[test]
    fn keys_suggestion_matches_the_search() {
        let dir = std::env::temp_dir().join(format!("dbdesign_keys_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let dependencies = dir.join("fds.txt");
        let out = dir.join("keys.json");
        std::fs::write(&dependencies, "A -> B,C\nB -> A\nnonsense\n").unwrap();

        let attributes = vec!["A".to_string(), " B".to_string(), "C".to_string(), "D".to_string()];
        run_keys(&attributes, &dependencies, Some(&out)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["search"]["keys"], serde_json::json!([["D", "A"], ["D", "B"]]));
        assert_eq!(value["candidateKeys"], value["search"]["keys"]);
        assert_eq!(value["primaryAttributes"], serde_json::json!(["D", "A", "B"]));
        assert_eq!(
            value["parseErrors"],
            serde_json::json!(["Zeile 3: Erwartet Format A,B -> C,D"])
        );

        std::fs::remove_dir_all(dir).unwrap();
    }
}
