//! Integration tests for declaration splitting and the validators

use declapi_language::{Keyword, is_url, parse_map_literal, placeholders, split};

// =============================================================================
// Splitting
// =============================================================================

#[test]
fn split_keeps_map_literal_whole() {
    let form = split("(Rest/get /users/:id?:test {:id id   :test x})");
    assert_eq!(form.keyword, "Rest/get");
    assert_eq!(form.args, vec!["/users/:id?:test", "{:id id   :test x}"]);
}

#[test]
fn split_keeps_trailing_description_tokens() {
    let form = split("(Local/get-in user-profile (get the profile of the user))");
    assert_eq!(form.keyword, "Local/get-in");
    assert_eq!(form.arg(0), Some("user-profile"));
    assert_eq!(form.args.len(), 7);
}

#[test]
fn split_tolerates_unbalanced_parens() {
    let form = split("(Rest/put /users/:id/posts/:postId selfMappings asBody (update the post)");
    assert_eq!(Keyword::parse(form.keyword), Some(Keyword::RestPut));
    assert_eq!(form.arg(2), Some("asBody"));
}

// =============================================================================
// Validators
// =============================================================================

#[test]
fn url_shapes() {
    assert!(is_url("/users/"));
    assert!(is_url("/users/:id/posts?:test&:name"));
    assert!(!is_url("test"));
    assert!(!is_url("{}"));
    assert!(!is_url("/users/:id/posts?test&:name"));
}

#[test]
fn placeholder_names() {
    assert_eq!(
        placeholders("/users/:id/posts/:postId?:titleOnly"),
        vec!["id", "postId", "titleOnly"]
    );
    assert!(placeholders("/system/roles").is_empty());
}

#[test]
fn map_literals() {
    let mapping = parse_map_literal("{:id userId :page page}").unwrap();
    assert_eq!(mapping.get("id"), Some("userId"));
    assert_eq!(mapping.get("page"), Some("page"));
    assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["id", "page"]);

    assert!(parse_map_literal("{}").unwrap().is_empty());
    assert!(parse_map_literal("--").is_none());
    assert!(parse_map_literal("{:id}").is_none());
}
