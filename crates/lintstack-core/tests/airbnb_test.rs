//! Integration tests against an airbnb-base style rule-set tree

use lintstack_core::{
    ConfigResolver, DiagnosticCode, Document, DocumentId, JsonSchemaRegistry, MemoryCatalog,
    ResolveError, RuleSeverity,
};
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

fn fixture_catalog() -> MemoryCatalog {
    lintstack_core::init_tracing();

    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/airbnb");
    let mut catalog = MemoryCatalog::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.unwrap();
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(&root).unwrap().with_extension("");
        let id = relative
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let value: Value = serde_json::from_str(&fs::read_to_string(entry.path()).unwrap()).unwrap();
        catalog.insert(Document::from_value(id, value).unwrap());
    }

    assert_eq!(catalog.len(), 9);
    catalog
        .with_alias("airbnb-base", "index")
        .with_alias("airbnb-base/legacy", "legacy")
        .with_plugin("import", "eslint-plugin-import@2.29.1")
}

/// The fixture tree leaves out `rules/strict`, like the published package
/// layout it was taken from.
fn complete_catalog() -> MemoryCatalog {
    fixture_catalog()
        .with_document(Document::new("rules/strict").with_rule("strict", json!(["error", "never"])))
}

#[test]
fn test_missing_strict_rules_abort_resolution() {
    let catalog = fixture_catalog();
    let err = ConfigResolver::new(&catalog, &catalog)
        .resolve_id(&DocumentId::new("index"))
        .unwrap_err();

    assert_eq!(
        err,
        ResolveError::unresolved("./rules/strict", Some(&DocumentId::new("index")))
    );
    insta::assert_snapshot!(err.to_string(), @"Unresolved reference './rules/strict' extended by 'index'");
}

#[test]
fn test_index_linearizes_in_extends_order() {
    let catalog = complete_catalog();
    let config = ConfigResolver::new(&catalog, &catalog)
        .resolve_id(&DocumentId::new("index"))
        .unwrap();

    let sources: Vec<_> = config.sources.iter().map(DocumentId::as_str).collect();
    assert_eq!(
        sources,
        vec![
            "rules/errors",
            "rules/best-practices",
            "rules/strict",
            "rules/variables",
            "rules/node",
            "rules/style",
            "rules/es6",
            "index",
        ]
    );
    assert_eq!(config.rules.len(), 54);
    assert!(config.diagnostics.is_empty());
}

#[test]
fn test_index_merges_env_and_parser_options() {
    let catalog = complete_catalog();
    let config = ConfigResolver::new(&catalog, &catalog)
        .resolve_id(&DocumentId::new("index"))
        .unwrap();

    assert_eq!(
        serde_json::to_value(&config.env).unwrap(),
        json!({ "node": true, "es6": true })
    );
    // Parser options merge shallowly: the root's ecmaVersion wins and the
    // ecmaFeatures object from rules/es6 survives untouched.
    assert_eq!(
        Value::Object(config.parser_options.clone()),
        json!({
            "ecmaVersion": 2018,
            "sourceType": "module",
            "ecmaFeatures": { "generators": false, "objectLiteralDuplicateProperties": false }
        })
    );
}

#[test]
fn test_rule_settings_keep_options() {
    let catalog = complete_catalog();
    let config = ConfigResolver::new(&catalog, &catalog)
        .resolve_id(&DocumentId::new("index"))
        .unwrap();

    let quotes = config.rule("quotes").unwrap();
    assert_eq!(quotes.severity, RuleSeverity::Error);
    assert_eq!(quotes.options, vec![json!("single"), json!({ "avoidEscape": true })]);
    assert_eq!(config.origin_of("quotes"), Some(&DocumentId::new("rules/style")));

    let mixed_requires = config.rule("no-mixed-requires").unwrap();
    assert!(!mixed_requires.is_enabled());
    assert_eq!(mixed_requires.options, vec![json!(false)]);
}

#[test]
fn test_project_overrides_shared_config() {
    let catalog = complete_catalog();
    let root = Arc::new(
        Document::new("app")
            .with_extends("airbnb-base")
            .with_extends("./plugins/import")
            .with_rule("no-console", json!("off"))
            .with_rule("quotes", json!(["error", "double"]))
            .with_setting("import/resolver", json!({ "node": { "paths": ["src"] } })),
    );

    let config = ConfigResolver::new(&catalog, &catalog).resolve(&root).unwrap();

    assert_eq!(config.sources.last(), Some(&DocumentId::new("app")));
    assert_eq!(config.severity("no-console"), Some(RuleSeverity::Off));
    assert_eq!(config.rule("quotes").unwrap().options, vec![json!("double")]);
    assert_eq!(config.origin_of("quotes"), Some(&DocumentId::new("app")));
    assert_eq!(config.origin_of("semi"), Some(&DocumentId::new("rules/style")));
    assert_eq!(
        config.origin_of("import/no-cycle"),
        Some(&DocumentId::new("plugins/import"))
    );

    assert_eq!(config.plugin_names().collect::<Vec<_>>(), vec!["import"]);
    assert_eq!(
        config.settings["import/resolver"],
        json!({ "node": { "extensions": [".mjs", ".js", ".json"], "paths": ["src"] } })
    );
    assert!(config.diagnostics.is_empty());
}

#[test]
fn test_import_rules_without_plugin_are_flagged() {
    let catalog = complete_catalog();
    let root = Arc::new(
        Document::new("app")
            .with_extends("airbnb-base")
            .with_rule("import/no-unresolved", json!("error")),
    );

    let config = ConfigResolver::new(&catalog, &catalog).resolve(&root).unwrap();

    let unknown: Vec<_> = config
        .diagnostics_with_code(DiagnosticCode::UnknownPluginRule)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].rule.as_deref(), Some("import/no-unresolved"));
    assert!(!config.has_errors());
    assert!(config.rule("import/no-unresolved").is_some());
}

#[test]
fn test_legacy_overrides_style() {
    let catalog = complete_catalog();
    let config = ConfigResolver::new(&catalog, &catalog)
        .resolve_id(&DocumentId::new("legacy"))
        .unwrap();

    assert_eq!(config.rule("comma-dangle").unwrap().options, vec![json!("never")]);
    assert_eq!(config.origin_of("comma-dangle"), Some(&DocumentId::new("legacy")));
    assert_eq!(config.severity("prefer-numeric-literals"), Some(RuleSeverity::Off));

    let env: Vec<_> = config.env.keys().map(String::as_str).collect();
    assert_eq!(env, vec!["node", "browser", "amd", "mocha", "jasmine"]);
    assert_eq!(config.env["node"], true);
}

#[test]
fn test_rule_schemas_check_merged_options() {
    let catalog = complete_catalog();
    let schemas = JsonSchemaRegistry::new()
        .with_schema(
            "quotes",
            json!([
                { "enum": ["single", "double", "backtick"] },
                {
                    "type": "object",
                    "properties": {
                        "avoidEscape": { "type": "boolean" },
                        "allowTemplateLiterals": { "type": "boolean" }
                    },
                    "additionalProperties": false
                }
            ]),
        )
        .unwrap();
    let resolver = ConfigResolver::new(&catalog, &catalog).with_schemas(schemas);

    let valid = resolver.resolve_id(&DocumentId::new("index")).unwrap();
    assert!(valid.diagnostics.is_empty());

    let root = Arc::new(
        Document::new("app")
            .with_extends("airbnb-base")
            .with_rule("quotes", json!(["error", "smart"])),
    );
    let invalid = resolver.resolve(&root).unwrap();

    let failures: Vec<_> = invalid
        .diagnostics_with_code(DiagnosticCode::SchemaValidationFailed)
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].path, vec![DocumentId::new("app")]);
    assert!(invalid.has_errors());
}
