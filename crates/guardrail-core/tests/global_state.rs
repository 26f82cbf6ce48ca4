//! # Global Guard State
//!
//! The global alias table and reporting mask are process-wide. Everything
//! that mutates them runs inside a single test so the assertions are
//! ordered.

use std::collections::BTreeMap;

use guardrail_core::kind::HTTP_ERROR;
use guardrail_core::{
    ensure, get_exception_aliases, level, raise_on_runtime_error, set_exception_aliases,
    ConstructionFailure, Descriptor, Guard, GuardError,
};

#[test]
fn global_aliases_and_reporting() {
    // Default alias table.
    let defaults = get_exception_aliases();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults.get("http").map(String::as_str), Some(HTTP_ERROR));

    // An empty table is legal and alias lookups stop resolving.
    set_exception_aliases(BTreeMap::new());
    assert!(get_exception_aliases().is_empty());
    assert_eq!(defaults.len(), 1, "snapshot must not change");
    let err = ensure(true, false, Descriptor::kind("http", [404])).unwrap_err();
    match err {
        GuardError::Construction { kind, failure, .. } => {
            assert_eq!(kind, "http");
            assert_eq!(failure, ConstructionFailure::UnknownKind);
        }
        other => panic!("Expected Construction, got: {other}"),
    }
    set_exception_aliases((*defaults).clone());
    assert!(ensure(true, false, Descriptor::kind("http", [404])).is_err());

    // Reporting enabled: diagnostics raise with their fields verbatim.
    let err = raise_on_runtime_error(level::WARNING, "undefined index", Some("src/x.rs"), Some(9))
        .unwrap_err();
    let e = err.exception().expect("runtime error carries an exception");
    assert_eq!(e.message(), "undefined index");
    assert_eq!(e.file(), "src/x.rs");
    assert_eq!(e.line(), 9);

    // Reporting suppressed: diagnostics are swallowed.
    {
        let _quiet = Guard::global().bridge().suppress();
        assert!(!raise_on_runtime_error(level::NOTICE, "n", None, None).unwrap());
    }
    assert!(raise_on_runtime_error(level::NOTICE, "n", None, None).is_err());
}
