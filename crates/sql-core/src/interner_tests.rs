use crate::{CaseInsensitiveInterner, Interner, Symbol};

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("foo");
    let b = interner.intern("foo");
    let c = interner.intern("bar");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();

    let sym = interner.intern("hello");
    assert_eq!(interner.resolve(sym), "hello");
}

#[test]
fn intern_owned_avoids_clone_on_hit() {
    let mut interner = Interner::new();

    let a = interner.intern("test");
    let b = interner.intern_owned("test".to_string());

    assert_eq!(a, b);
    assert_eq!(interner.len(), 1);
}

#[test]
fn symbols_are_copy() {
    let mut interner = Interner::new();
    let sym = interner.intern("x");

    let copy = sym;
    assert_eq!(sym, copy);
}

#[test]
fn symbol_ordering_is_insertion_order() {
    let mut interner = Interner::new();

    let z = interner.intern("z");
    let a = interner.intern("a");

    // z was inserted first, so z < a by insertion order
    assert!(z < a);
}

#[test]
fn case_insensitive_folds_on_upper_case() {
    let mut interner = CaseInsensitiveInterner::new();

    let a = interner.intern("Users");
    let b = interner.intern("USERS");
    let c = interner.intern("users");

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(interner.resolve(a), "Users");
}

#[test]
fn case_insensitive_lookup_without_insert() {
    let mut interner = CaseInsensitiveInterner::new();
    let sym = interner.intern("Orders");

    assert_eq!(interner.lookup("orders"), Some(sym));
    assert_eq!(interner.lookup("ORDERS"), Some(sym));
    assert_eq!(interner.lookup("Invoices"), None);
}

#[test]
fn iter_yields_all_strings() {
    let mut interner = Interner::new();
    let a = interner.intern("alpha");
    let b = interner.intern("beta");

    let items: Vec<_> = interner.iter().collect();
    assert_eq!(items, vec![(a, "alpha"), (b, "beta")]);
}

#[test]
fn symbol_from_raw_roundtrip() {
    let sym = Symbol::from_raw(42);
    assert_eq!(sym.as_u32(), 42);
}
