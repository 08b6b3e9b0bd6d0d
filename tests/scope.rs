use repeat_dom::{Aliases, Key, Scope, Scopes};

#[test]
fn extend_without_a_name_shares_storage() {
	let scope = Scope::new().extend(Some("i"), Key::Index(1));
	let same = scope.extend(None, Key::Index(2));
	assert!(same.ptr_eq(&scope));
	assert_eq!(same.get("i"), Some(&Key::Index(1)));
}

#[test]
fn extend_with_a_name_copies() {
	let outer = Scope::new().extend(Some("i"), Key::Index(1));
	let inner = outer.extend(Some("j"), Key::Index(2));
	assert!(!inner.ptr_eq(&outer));
	assert_eq!(outer.len(), 1);
	assert_eq!(inner.len(), 2);
	assert_eq!(inner.get("i"), Some(&Key::Index(1)));

	let shadowed = inner.extend(Some("i"), Key::Index(3));
	assert_eq!(shadowed.get("i"), Some(&Key::Index(3)));
	assert_eq!(inner.get("i"), Some(&Key::Index(1)));
}

#[test]
fn index_aliases_take_precedence() {
	let scopes = Scopes {
		key_refs: Scope::new().extend(Some("x"), Key::name("key")),
		index_refs: Scope::new().extend(Some("x"), Key::Index(0)),
	};
	assert_eq!(scopes.resolve("x"), Some(&Key::Index(0)));
}

#[test]
fn alias_notation() {
	assert_eq!(Aliases::parse("i"), Aliases::entry("i"));
	assert_eq!(Aliases::parse("k,i"), Aliases::key_and_index("k", "i"));
	assert_eq!(Aliases::parse(" k , i "), Aliases::key_and_index("k", "i"));
	assert_eq!(Aliases::parse("k,").index, None);
	assert_eq!(Aliases::parse("k,").key.as_deref(), Some("k"));
	assert_eq!(Aliases::parse(""), Aliases::none());
}

#[test]
fn entry_aliases_follow_the_key_kind() {
	let entry = Aliases::entry("n");

	let keyed = entry.scopes_for(&Scopes::default(), &Key::name("ann"), 0);
	assert_eq!(keyed.resolve("n"), Some(&Key::name("ann")));
	assert!(keyed.index_refs.is_empty());

	let positional = entry.scopes_for(&Scopes::default(), &Key::Index(3), 3);
	assert_eq!(positional.resolve("n"), Some(&Key::Index(3)));
	assert!(positional.key_refs.is_empty());
}

#[test]
fn unit_scopes_layer_over_the_parent() {
	let parent = Aliases::index("i").scopes_for(&Scopes::default(), &Key::Index(4), 4);
	let nested = Aliases::key_and_index("k", "j").scopes_for(&parent, &Key::name("name"), 0);
	assert_eq!(nested.resolve("i"), Some(&Key::Index(4)));
	assert_eq!(nested.resolve("j"), Some(&Key::Index(0)));
	assert_eq!(nested.resolve("k"), Some(&Key::name("name")));

	let unaliased = Aliases::none().scopes_for(&parent, &Key::Index(1), 1);
	assert!(unaliased.index_refs.ptr_eq(&parent.index_refs));
	assert!(unaliased.key_refs.ptr_eq(&parent.key_refs));
}

#[test]
fn keypath_segments() {
	assert_eq!(Key::parse("12"), Key::Index(12));
	assert_eq!(Key::parse("0"), Key::Index(0));
	assert_eq!(Key::parse("012"), Key::name("012"));
	assert_eq!(Key::parse("-1"), Key::name("-1"));
	assert_eq!(Key::name("3").as_index(), Some(3));
	assert_eq!(Key::name("x").as_index(), None);
	assert_eq!(Key::Index(7).to_string(), "7");
}
