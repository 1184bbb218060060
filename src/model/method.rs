//! Canonical per-method metadata.

use std::collections::HashSet;

use super::types::{Signature, TypeDescriptor};
use crate::imports::{ImportTable, CONTEXT_PATH};

/// A method parameter. The name is always set; anonymous and `_`
/// parameters get `argN` so they can be forwarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeDescriptor,
}

/// A method result. Anonymous results are named `resultN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResult {
    pub name: String,
    pub ty: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub params: Vec<Param>,
    pub results: Vec<MethodResult>,
}

/// A resolved interface: the import path it lives in, its name and its
/// flattened method set in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub package_path: String,
    pub name: String,
    pub methods: Vec<Method>,
}

impl Method {
    /// Build metadata from a parsed signature, naming every anonymous
    /// parameter and result by position.
    pub fn from_signature(name: impl Into<String>, sig: &Signature) -> Self {
        let mut taken: HashSet<String> = sig
            .params
            .iter()
            .chain(sig.results.iter())
            .filter_map(|f| f.name.clone())
            .filter(|n| n != "_")
            .collect();

        let params = sig
            .params
            .iter()
            .enumerate()
            .map(|(i, field)| Param {
                name: declared_or_synthesized(field.name.as_deref(), "arg", i, &mut taken),
                ty: field.ty.clone(),
            })
            .collect();

        let results = sig
            .results
            .iter()
            .enumerate()
            .map(|(i, field)| MethodResult {
                name: declared_or_synthesized(field.name.as_deref(), "result", i, &mut taken),
                ty: field.ty.clone(),
            })
            .collect();

        Self {
            name: name.into(),
            params,
            results,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.results.is_empty()
    }

    /// Whether the final parameter is `...T`.
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.ty.is_variadic())
    }

    /// The leading `context.Context` parameter, if any.
    ///
    /// Matched against the alias the import table holds for the context
    /// package in this run, so it must be asked again whenever the table
    /// may have changed.
    pub fn context_param(&self, imports: &ImportTable) -> Option<&Param> {
        let alias = imports.alias_of(CONTEXT_PATH)?;
        self.params
            .first()
            .filter(|p| p.ty.is_qualified_as(alias, "Context"))
    }

    /// The trailing `error` result, if any.
    pub fn error_result(&self) -> Option<&MethodResult> {
        self.results.last().filter(|r| r.ty.is_error())
    }

    /// Declared names of parameters and results.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.results.iter().map(|r| r.name.as_str()))
    }
}

fn declared_or_synthesized(
    declared: Option<&str>,
    prefix: &str,
    index: usize,
    taken: &mut HashSet<String>,
) -> String {
    match declared {
        Some(name) if name != "_" => name.to_string(),
        _ => {
            let mut candidate = format!("{}{}", prefix, index + 1);
            while taken.contains(&candidate) {
                candidate.push('_');
            }
            taken.insert(candidate.clone());
            candidate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Field;

    fn sig(params: Vec<Field>, results: Vec<Field>) -> Signature {
        Signature { params, results }
    }

    #[test]
    fn test_anonymous_results_are_numbered() {
        let method = Method::from_signature(
            "Do",
            &sig(
                vec![Field::named("n", TypeDescriptor::ident("int"))],
                vec![
                    Field::anonymous(TypeDescriptor::ident("string")),
                    Field::anonymous(TypeDescriptor::ident("error")),
                ],
            ),
        );
        let names: Vec<_> = method.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["result1", "result2"]);
        assert_eq!(method.params[0].name, "n");
    }

    #[test]
    fn test_named_results_keep_names() {
        let method = Method::from_signature(
            "Count",
            &sig(
                vec![],
                vec![
                    Field::named("total", TypeDescriptor::ident("int")),
                    Field::named("err", TypeDescriptor::ident("error")),
                ],
            ),
        );
        assert_eq!(method.results[0].name, "total");
        assert_eq!(method.results[1].name, "err");
        assert!(method.error_result().is_some());
    }

    #[test]
    fn test_unnamed_and_blank_params_get_arg_names() {
        let method = Method::from_signature(
            "Put",
            &sig(
                vec![
                    Field::named("_", TypeDescriptor::ident("string")),
                    Field::named("arg1", TypeDescriptor::ident("int")),
                ],
                vec![],
            ),
        );
        assert_eq!(method.params[0].name, "arg1_");
        assert_eq!(method.params[1].name, "arg1");
    }

    #[test]
    fn test_synthesized_result_avoids_param_name() {
        let method = Method::from_signature(
            "Get",
            &sig(
                vec![Field::named("result1", TypeDescriptor::ident("string"))],
                vec![Field::anonymous(TypeDescriptor::ident("int"))],
            ),
        );
        assert_eq!(method.results[0].name, "result1_");
    }

    #[test]
    fn test_context_param_requires_context_alias() {
        let mut imports = ImportTable::new();
        let method = Method::from_signature(
            "Run",
            &sig(
                vec![Field::named("ctx", TypeDescriptor::qualified("alias1", "Context"))],
                vec![],
            ),
        );
        assert!(method.context_param(&imports).is_none());

        imports.add(CONTEXT_PATH);
        assert_eq!(method.context_param(&imports).map(|p| p.name.as_str()), Some("ctx"));
    }

    #[test]
    fn test_context_must_be_first() {
        let mut imports = ImportTable::new();
        let alias = imports.add(CONTEXT_PATH);
        let method = Method::from_signature(
            "Run",
            &sig(
                vec![
                    Field::named("n", TypeDescriptor::ident("int")),
                    Field::named("ctx", TypeDescriptor::qualified(alias, "Context")),
                ],
                vec![],
            ),
        );
        assert!(method.context_param(&imports).is_none());
    }

    #[test]
    fn test_error_must_be_last() {
        let method = Method::from_signature(
            "Get",
            &sig(
                vec![],
                vec![
                    Field::anonymous(TypeDescriptor::ident("error")),
                    Field::anonymous(TypeDescriptor::ident("int")),
                ],
            ),
        );
        assert!(method.error_result().is_none());
    }

    #[test]
    fn test_variadic_detection() {
        let method = Method::from_signature(
            "Log",
            &sig(
                vec![Field::named(
                    "args",
                    TypeDescriptor::Variadic(Box::new(TypeDescriptor::empty_interface())),
                )],
                vec![],
            ),
        );
        assert!(method.is_variadic());
        assert!(!method.has_results());
    }
}
