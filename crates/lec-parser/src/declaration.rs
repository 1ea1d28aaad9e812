//! Declared-name resolution.

use std::sync::LazyLock;

use lec_core::enums::DeclarationKind;
use regex::Regex;

use crate::comments::mask_comments_and_strings;

/// A top-level declaration found in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
}

static CONTRACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(abstract\s+)?contract\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid regex")
});

static INTERFACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\binterface\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid regex")
});

static LIBRARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\blibrary\s+([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid regex")
});

/// Find the declaration that names a source file.
///
/// Categories are tried in priority order: concrete `contract`, `abstract
/// contract`, `interface`, `library`. Within a category the first declaration
/// in the file wins.
#[must_use]
pub fn resolve_declaration(source: &str) -> Option<Declaration> {
    let text = mask_comments_and_strings(source);

    DeclarationKind::PRIORITY
        .into_iter()
        .find_map(|kind| first_of_kind(&text, kind).map(|name| Declaration { name, kind }))
}

/// The declared name only. `None` when the text declares nothing.
#[must_use]
pub fn resolve_declared_name(source: &str) -> Option<String> {
    resolve_declaration(source).map(|d| d.name)
}

fn first_of_kind(text: &str, kind: DeclarationKind) -> Option<String> {
    match kind {
        DeclarationKind::Contract => CONTRACT
            .captures_iter(text)
            .find(|caps| caps.get(1).is_none())
            .map(|caps| caps[2].to_string()),
        DeclarationKind::AbstractContract => CONTRACT
            .captures_iter(text)
            .find(|caps| caps.get(1).is_some())
            .map(|caps| caps[2].to_string()),
        DeclarationKind::Interface => INTERFACE.captures(text).map(|caps| caps[1].to_string()),
        DeclarationKind::Library => LIBRARY.captures(text).map(|caps| caps[1].to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("contract Foo is Bar {}", Some("Foo"))]
    #[case("library FooLib {}", Some("FooLib"))]
    #[case("interface IToken { function x() external; }", Some("IToken"))]
    #[case("abstract contract Base {}", Some("Base"))]
    #[case("pragma solidity ^0.8.20;\n\ncontract Counter {\n}", Some("Counter"))]
    #[case("contract $Weird_1 {}", Some("$Weird_1"))]
    #[case("uint256 constant X = 1;", None)]
    #[case("", None)]
    fn resolves_names(#[case] source: &str, #[case] expected: Option<&str>) {
        assert_eq!(resolve_declared_name(source).as_deref(), expected);
    }

    #[test]
    fn ignores_commented_and_quoted_declarations() {
        let source = r#"
            // contract Old {}
            /* contract Older {} */
            string constant NOTE = "contract Quoted {}";
            library Real {}
        "#;
        assert_eq!(resolve_declared_name(source).as_deref(), Some("Real"));
    }

    #[test]
    fn concrete_contract_beats_earlier_categories_in_file() {
        let source = "interface IVault {}\nlibrary Math {}\nabstract contract Base {}\ncontract Vault is Base, IVault {}";
        let decl = resolve_declaration(source).unwrap();
        assert_eq!(decl.name, "Vault");
        assert_eq!(decl.kind, DeclarationKind::Contract);
    }

    #[test]
    fn abstract_contract_beats_interface() {
        let source = "interface IA {}\nabstract contract A is IA {}";
        let decl = resolve_declaration(source).unwrap();
        assert_eq!(
            decl,
            Declaration {
                name: "A".into(),
                kind: DeclarationKind::AbstractContract
            }
        );
    }

    #[test]
    fn keyword_must_be_whole_word() {
        assert_eq!(resolve_declared_name("uint mycontract Foo;"), None);
    }

    #[test]
    fn resolution_is_idempotent() {
        let source = "// header\ncontract Token is ERC20 {}";
        let first = resolve_declared_name(source);
        let second = resolve_declared_name(source);
        assert_eq!(first, second);
        let name = first.unwrap();
        assert_eq!(
            resolve_declared_name(&format!("contract {name} {{}}")),
            Some(name)
        );
    }
}
