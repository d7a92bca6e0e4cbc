//! Data exchanged with the analysis backend.

use serde::{Deserialize, Serialize};

/// One discovered field-to-field relationship between two tables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
	/// Table holding the reference.
	pub source_table: String,
	/// Referencing field.
	pub source_field: String,
	/// Referenced table.
	pub target_table: String,
	/// Referenced field.
	pub target_field: String,
	/// Mapper file the relationship was found in.
	#[serde(default)]
	pub source_file: Option<String>,
	/// The source field looks like a foreign key.
	#[serde(default)]
	pub is_potential_fk: bool,
}

impl Relationship {
	/// Target fields named `id` are shown as primary keys.
	pub fn targets_primary_key(&self) -> bool {
		self.target_field.eq_ignore_ascii_case("id")
	}
}

/// Export files the backend generated for the last analysis.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportFiles {
	/// PlantUML source.
	#[serde(default)]
	pub plantuml: Option<String>,
	/// Server-rendered SVG.
	#[serde(default)]
	pub svg: Option<String>,
	/// Relationship table.
	#[serde(default)]
	pub csv: Option<String>,
	/// Machine-readable report.
	#[serde(default)]
	pub json: Option<String>,
	/// Markdown report.
	#[serde(default)]
	pub markdown: Option<String>,
}

impl ExportFiles {
	/// `(label, file name)` for every file that is available.
	pub fn available(&self) -> Vec<(&'static str, &str)> {
		[
			("PlantUML", &self.plantuml),
			("SVG", &self.svg),
			("CSV", &self.csv),
			("JSON", &self.json),
			("Markdown", &self.markdown),
		]
		.into_iter()
		.filter_map(|(label, file)| file.as_deref().map(|f| (label, f)))
		.collect()
	}
}

/// Response body of the analysis endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
	/// The analysis ran to completion.
	#[serde(default)]
	pub success: bool,
	/// Summary shown above the results.
	#[serde(default)]
	pub message: String,
	/// Textual diagram description for the alternate text rendering.
	#[serde(default)]
	pub diagram: String,
	/// Table names.
	#[serde(default)]
	pub entities: Vec<String>,
	/// Relationships to draw.
	#[serde(default)]
	pub relationships: Vec<Relationship>,
	/// Generated export files.
	#[serde(default)]
	pub files: ExportFiles,
	/// Failure reason when `success` is false.
	#[serde(default)]
	pub error: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_backend_payload() {
		let body = r#"{
			"success": true,
			"message": "Analysis complete. Found 2 tables and 1 relationships.",
			"diagram": "@startuml\n@enduml",
			"entities": ["orders", "users"],
			"relationships": [{
				"source_table": "orders", "source_field": "user_id",
				"target_table": "users", "target_field": "ID",
				"source_file": "OrderMapper.xml", "is_potential_fk": true
			}],
			"files": {"plantuml": "er.puml", "svg": null, "csv": "er.csv"}
		}"#;
		let resp: AnalysisResponse = serde_json::from_str(body).unwrap();
		assert!(resp.success);
		assert_eq!(resp.relationships.len(), 1);
		assert!(resp.relationships[0].targets_primary_key());
		assert_eq!(resp.files.available(), vec![("PlantUML", "er.puml"), ("CSV", "er.csv")]);
	}

	#[test]
	fn optional_relationship_fields_default() {
		let rel: Relationship = serde_json::from_str(
			r#"{"source_table":"a","source_field":"b_id","target_table":"b","target_field":"id"}"#,
		)
		.unwrap();
		assert_eq!(rel.source_file, None);
		assert!(!rel.is_potential_fk);
	}
}
