//! Integration tests for the compiler
//!
//! Each case pairs a declaration with its request fields and the exact
//! message the compiler reports.

use declapi_language::{CompileError, SyntaxError, compile, compile_batch, first_error};

fn error_of(declaration: &str, fields: &[&str]) -> Option<String> {
    let fields: Vec<String> = fields.iter().map(ToString::to_string).collect();
    compile(declaration, &fields).error_message()
}

// =============================================================================
// Keywords
// =============================================================================

#[test]
fn undefined_keyword() {
    assert_eq!(
        error_of("(ImNotDefined arg1 arg2)", &[]).as_deref(),
        Some("Invalid keyword.")
    );
}

#[test]
fn misspelled_keyword() {
    assert_eq!(
        error_of("(Rest/gets /users/:id?:test {:idx id})", &["id"]).as_deref(),
        Some("Invalid keyword.")
    );
}

#[test]
fn invalid_keyword_skips_validation() {
    let result = compile("(Nope)", &[]);
    assert_eq!(result.error, Some(CompileError::InvalidKeyword));
}

// =============================================================================
// Rest/get
// =============================================================================

#[test]
fn get_without_mappings() {
    for declaration in ["(Rest/get /users/test)", "(Rest/get /users/)", "(Rest/get /users/ --)"] {
        assert_eq!(
            error_of(declaration, &["id"]).as_deref(),
            Some("Error on the 2st argument: The syntax should be one of type/map,fn/selfMappings"),
            "{declaration}"
        );
    }
}

#[test]
fn get_with_non_url() {
    assert_eq!(
        error_of("(Rest/get {} {})", &[]).as_deref(),
        Some("Error on the 1st argument: The syntax should be a url")
    );
    assert_eq!(
        error_of("(Rest/get test {:idx id})", &["id"]).as_deref(),
        Some("Error on the 1st argument: The syntax should be a url")
    );
}

#[test]
fn get_with_bare_query_segment() {
    assert_eq!(
        error_of(
            "(Rest/get /users/:id/posts?test&:name {:id id :test test :name name})",
            &["id", "test", "name"]
        )
        .as_deref(),
        Some("Error on the 1st argument: The syntax should be a url")
    );
}

#[test]
fn get_self_mappings_must_cover_placeholders() {
    assert_eq!(
        error_of("(Rest/get /users/:id?:test selfMappings)", &["id"]).as_deref(),
        Some("Error on the 1st argument: The keyword 'test' is not mapping")
    );
    assert_eq!(
        error_of("(Rest/get /users/:id?:test selfMappings)", &["test"]).as_deref(),
        Some("Error on the 1st argument: The keyword 'id' is not mapping")
    );
}

#[test]
fn get_map_literal_must_cover_placeholders() {
    let cases = [
        (
            "(Rest/get /users/:id?:test {:idx id})",
            &["id"][..],
            Some("Error on the 1st argument: The keyword 'id' is not mapping"),
        ),
        (
            "(Rest/get /users/:id?:test {:id idx})",
            &["id"][..],
            Some("Error on the 1st argument: The mapping 'idx' should be exists in the request data."),
        ),
        (
            "(Rest/get /users/:id?:test {:id id   :testx x})",
            &["id"][..],
            Some("Error on the 1st argument: The keyword 'test' is not mapping"),
        ),
        (
            "(Rest/get /users/:id?:test {:id id   :test x})",
            &["id"][..],
            Some("Error on the 1st argument: The mapping 'x' should be exists in the request data."),
        ),
        ("(Rest/get /users/:id?:test {:id id   :test x})", &["id", "x"][..], None),
    ];

    for (declaration, fields, expected) in cases {
        assert_eq!(error_of(declaration, fields).as_deref(), expected, "{declaration}");
    }
}

#[test]
fn get_accepts_valid_declarations() {
    assert_eq!(
        error_of(
            "(Rest/get /users/:id/posts?:test&:name {:id id :test test :name name})",
            &["id", "test", "name"]
        ),
        None
    );
    assert_eq!(error_of("(Rest/get /users/ selfMappings)", &["id"]), None);
    assert_eq!(error_of("(Rest/get /system/roles {} (Get system roles))", &["filters", "age"]), None);
}

// =============================================================================
// Rest/post
// =============================================================================

#[test]
fn post_without_body_mappings() {
    assert_eq!(
        error_of("(Rest/post /users/ selfMappings)", &["id"]).as_deref(),
        Some("Error on the 3st argument: The syntax should be one of type/map,fn/asBody")
    );
}

#[test]
fn post_with_bad_url_mappings() {
    assert_eq!(
        error_of("(Rest/post /users/ -- asBody)", &["id"]).as_deref(),
        Some("Error on the 2st argument: The syntax should be one of type/map,fn/selfMappings")
    );
}

#[test]
fn post_with_bad_url() {
    assert_eq!(
        error_of("(Rest/post test {} asBody)", &["id"]).as_deref(),
        Some("Error on the 1st argument: The syntax should be a url")
    );
    assert_eq!(
        error_of("(Rest/post /users/:id/profile?:old {} asBody)", &["id"]).as_deref(),
        Some("Error on the 1st argument: The keyword 'id' is not mapping")
    );
    assert_eq!(
        error_of("(Rest/post /users/:id/profile?:old {:id idx} asBody)", &["id"]).as_deref(),
        Some("Error on the 1st argument: The mapping 'idx' should be exists in the request data.")
    );
}

#[test]
fn post_accepts_valid_declarations() {
    assert_eq!(
        error_of("(Rest/post /users/:id/profile?:old selfMappings asBody)", &["id", "old"]),
        None
    );
    assert_eq!(
        error_of(
            "(Rest/post /users/:id/posts {:id userId} asBody (Add post of the user))",
            &["userId", "title", "content"]
        ),
        None
    );
}

#[test]
fn every_command_verb_shares_the_grammar() {
    for verb in ["post", "put", "patch", "delete"] {
        let declaration = format!("(Rest/{verb} /users/:id selfMappings asBody)");
        assert_eq!(error_of(&declaration, &["id"]), None, "{declaration}");

        let missing = format!("(Rest/{verb} /users/:id selfMappings)");
        assert!(error_of(&missing, &["id"]).unwrap().starts_with("Error on the 3st argument"));
    }
}

// =============================================================================
// Local storage
// =============================================================================

#[test]
fn local_requires_a_key() {
    for keyword in ["Local/get-in", "Local/set-in"] {
        assert_eq!(
            error_of(&format!("({keyword})"), &["id", "old"]).as_deref(),
            Some("Error on the 1st argument: The syntax should be type/string")
        );
        assert_eq!(error_of(&format!("({keyword} user-profile)"), &["id", "old"]), None);
    }
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn batch_reports_every_result_in_order() {
    let results = compile_batch([
        ("(Local/get-in user-profile)", vec![]),
        ("(Rest/get /users/:id {})", vec!["id".to_string()]),
        ("(Local/set-in)", vec![]),
    ]);

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].error,
        Some(CompileError::Argument {
            position: 0,
            source: SyntaxError::Unmapped("id".to_string()),
        })
    );
    assert_eq!(first_error(&results).map(|r| r.declaration.as_str()), Some("(Rest/get /users/:id {})"));
}
