use proptest::prelude::*;
use scaffold::document::{load_document, LoadMode, SpecificationDocument};
use scaffold::error::{ApiError, ValidationError};
use scaffold::tree::{validate, Node, SpecTree};

use crate::integration::support::arb_tree;

proptest! {
    #[test]
    fn validate_is_idempotent_on_valid_trees(tree in arb_tree()) {
        prop_assert!(validate(tree.root()).is_ok());
        prop_assert!(validate(tree.root()).is_ok());
        let rebuilt = SpecTree::new(tree.clone().into_root()).unwrap();
        prop_assert_eq!(rebuilt, tree);
    }

    #[test]
    fn serialized_tree_loads_back_unchanged(tree in arb_tree()) {
        let structure = serde_yaml::to_value(tree.root().children()).unwrap();
        let document = SpecificationDocument {
            project_name: None,
            output_dir: None,
            description: None,
            structure,
            metadata: Default::default(),
        };
        let loaded = load_document(&document, LoadMode::Strict).unwrap();
        prop_assert!(loaded.report.is_clean());
        prop_assert_eq!(loaded.tree, tree);
    }
}

#[test]
fn duplicate_siblings_fail_before_any_side_effect() {
    let raw = r#"
structure:
  - name: src
    type: directory
  - name: src
    type: file
    content: clash
"#;
    let document = SpecificationDocument::from_yaml(raw).unwrap();
    let err = load_document(&document, LoadMode::Permissive).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(ValidationError::DuplicateName { ref name, .. }) if name == "src"
    ));
}

#[test]
fn nested_duplicate_reports_full_path() {
    let root = Node::root(vec![Node::directory(
        "a",
        vec![Node::file("x", ""), Node::directory("x", vec![])],
    )]);
    match validate(&root) {
        Err(ValidationError::DuplicateName { path, name }) => {
            assert_eq!(path, "a/x");
            assert_eq!(name, "x");
        }
        other => panic!("expected duplicate, got {:?}", other),
    }
}
