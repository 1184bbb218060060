//! Interface lookup, flattening and type qualification.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::locator::{guess_package_name, Locator, Package};
use super::{ResolutionError, Result};
use crate::imports::ImportTable;
use crate::model::{
    Field, InterfaceDecl, InterfaceElem, Method, Signature, StructField, TypeDescriptor, TypeTerm,
};
use crate::syntax::{parse_type_tokens, SourceFile};

const PREDECLARED: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex128",
    "complex64",
    "error",
    "float32",
    "float64",
    "int",
    "int16",
    "int32",
    "int64",
    "int8",
    "rune",
    "string",
    "uint",
    "uint16",
    "uint32",
    "uint64",
    "uint8",
    "uintptr",
];

/// Whether `name` is one of Go's predeclared types.
pub fn is_predeclared(name: &str) -> bool {
    PREDECLARED.contains(&name)
}

/// Resolves one interface per call.
///
/// Every package a resolved signature refers to is registered in the
/// import table, starting with the package that declares the interface.
pub struct Resolver<'a> {
    locator: &'a mut Locator,
    imports: &'a mut ImportTable,
    /// (import path, type name) of the types being expanded.
    stack: Vec<(String, String)>,
}

impl<'a> Resolver<'a> {
    pub fn new(locator: &'a mut Locator, imports: &'a mut ImportTable) -> Self {
        Self {
            locator,
            imports,
            stack: Vec::new(),
        }
    }

    /// Resolve the interface `name` declared in the package at `dir`.
    pub fn resolve(&mut self, dir: &Path, name: &str) -> Result<InterfaceDecl> {
        let pkg = self.locator.load_dir(dir)?;
        self.imports.add(&pkg.path);

        let methods: Vec<Method> = self
            .interface_methods(&pkg, name)?
            .into_iter()
            .map(|(method, sig)| Method::from_signature(method, &sig))
            .collect();

        info!(
            package = %pkg.path,
            interface = name,
            methods = methods.len(),
            "resolved interface"
        );
        Ok(InterfaceDecl {
            package_path: pkg.path.clone(),
            name: name.to_string(),
            methods,
        })
    }

    /// Flattened, qualified method set of the type `name` in `pkg`.
    fn interface_methods(
        &mut self,
        pkg: &Rc<Package>,
        name: &str,
    ) -> Result<Vec<(String, Signature)>> {
        let key = (pkg.path.clone(), name.to_string());
        if self.stack.contains(&key) {
            return Err(ResolutionError::EmbeddingCycle {
                name: name.to_string(),
            });
        }

        let (file, spec) = pkg.lookup(name)?;
        if spec.generic {
            return Err(ResolutionError::GenericInterface {
                name: name.to_string(),
            });
        }
        let ty = parse_type_tokens(&spec.body).map_err(|source| ResolutionError::Syntax {
            file: file.path.clone(),
            source,
        })?;

        self.stack.push(key);
        let methods = self.methods_of_type(pkg, file, &ty, name);
        self.stack.pop();
        methods
    }

    fn methods_of_type(
        &mut self,
        pkg: &Rc<Package>,
        file: &SourceFile,
        ty: &TypeDescriptor,
        name: &str,
    ) -> Result<Vec<(String, Signature)>> {
        match ty {
            TypeDescriptor::Interface(elems) => self.flatten(pkg, file, elems, name),
            TypeDescriptor::Identifier(ident) if ident == "error" => Ok(vec![(
                "Error".to_string(),
                Signature {
                    params: Vec::new(),
                    results: vec![Field::anonymous(TypeDescriptor::ident("string"))],
                },
            )]),
            TypeDescriptor::Identifier(ident) if ident == "any" => Ok(Vec::new()),
            TypeDescriptor::Identifier(ident) if ident == "comparable" => {
                Err(ResolutionError::NotAnInterface {
                    name: name.to_string(),
                    kind: "type constraint".to_string(),
                })
            }
            TypeDescriptor::Identifier(ident) if is_predeclared(ident) => {
                Err(ResolutionError::NotAnInterface {
                    name: name.to_string(),
                    kind: format!("predeclared type {}", ident),
                })
            }
            TypeDescriptor::Identifier(ident) => self.interface_methods(pkg, ident),
            TypeDescriptor::Qualified {
                package: qualifier,
                name: target,
            } => {
                let path = self.import_path_for_qualifier(pkg, file, qualifier)?;
                let target_pkg = self.locator.load(&path, &pkg.dir)?;
                self.interface_methods(&target_pkg, target)
            }
            TypeDescriptor::Generic { base, .. } => Err(ResolutionError::GenericInterface {
                name: base.to_string(),
            }),
            other => Err(ResolutionError::NotAnInterface {
                name: name.to_string(),
                kind: other.kind().to_string(),
            }),
        }
    }

    /// Embedded method sets first, then the interface's own methods.
    fn flatten(
        &mut self,
        pkg: &Rc<Package>,
        file: &SourceFile,
        elems: &[InterfaceElem],
        name: &str,
    ) -> Result<Vec<(String, Signature)>> {
        let mut embedded = Vec::new();
        let mut own = Vec::new();
        for elem in elems {
            match elem {
                InterfaceElem::Embed(ty) => {
                    embedded.extend(self.methods_of_type(pkg, file, ty, name)?);
                }
                InterfaceElem::Method { name: method, sig } => {
                    own.push((method.clone(), self.qualify_signature(pkg, file, sig)?));
                }
                InterfaceElem::TypeSet(_) => {
                    return Err(ResolutionError::NotAnInterface {
                        name: name.to_string(),
                        kind: "type constraint".to_string(),
                    })
                }
            }
        }

        let mut seen = HashSet::new();
        let mut methods = Vec::with_capacity(embedded.len() + own.len());
        for (method, sig) in embedded.into_iter().chain(own) {
            if seen.insert(method.clone()) {
                methods.push((method, sig));
            } else {
                debug!(interface = name, method = %method, "dropping duplicate method");
            }
        }
        Ok(methods)
    }

    fn qualify_signature(
        &mut self,
        pkg: &Package,
        file: &SourceFile,
        sig: &Signature,
    ) -> Result<Signature> {
        let mut qualify_fields = |fields: &[Field]| -> Result<Vec<Field>> {
            fields
                .iter()
                .map(|f| {
                    self.qualify(pkg, file, &f.ty).map(|ty| Field {
                        name: f.name.clone(),
                        ty,
                    })
                })
                .collect()
        };
        let params = qualify_fields(&sig.params)?;
        let results = qualify_fields(&sig.results)?;
        Ok(Signature { params, results })
    }

    /// Rewrite `ty`, written in `file`, so every named type refers to an
    /// import alias.
    fn qualify(
        &mut self,
        pkg: &Package,
        file: &SourceFile,
        ty: &TypeDescriptor,
    ) -> Result<TypeDescriptor> {
        let boxed = |t: TypeDescriptor| Box::new(t);
        Ok(match ty {
            TypeDescriptor::Identifier(name) if is_predeclared(name) => ty.clone(),
            TypeDescriptor::Identifier(name) => {
                if pkg.declares(name) {
                    TypeDescriptor::qualified(self.imports.add(&pkg.path), name.clone())
                } else {
                    warn!(
                        file = %file.path.display(),
                        name = %name,
                        "identifier is not declared in package {}; emitting it unqualified",
                        pkg.path
                    );
                    ty.clone()
                }
            }
            TypeDescriptor::Qualified { package, name } => {
                let path = self.import_path_for_qualifier(pkg, file, package)?;
                TypeDescriptor::qualified(self.imports.add(&path), name.clone())
            }
            TypeDescriptor::Pointer(inner) => {
                TypeDescriptor::Pointer(boxed(self.qualify(pkg, file, inner)?))
            }
            TypeDescriptor::Array { len, elem } => TypeDescriptor::Array {
                len: match len {
                    Some(len) => Some(self.qualify_length(pkg, file, len)?),
                    None => None,
                },
                elem: boxed(self.qualify(pkg, file, elem)?),
            },
            TypeDescriptor::Variadic(elem) => {
                TypeDescriptor::Variadic(boxed(self.qualify(pkg, file, elem)?))
            }
            TypeDescriptor::Function(sig) => {
                TypeDescriptor::Function(self.qualify_signature(pkg, file, sig)?)
            }
            TypeDescriptor::Map { key, value } => TypeDescriptor::Map {
                key: boxed(self.qualify(pkg, file, key)?),
                value: boxed(self.qualify(pkg, file, value)?),
            },
            TypeDescriptor::Chan { dir, elem } => TypeDescriptor::Chan {
                dir: *dir,
                elem: boxed(self.qualify(pkg, file, elem)?),
            },
            TypeDescriptor::Generic { base, args } => TypeDescriptor::Generic {
                base: boxed(self.qualify(pkg, file, base)?),
                args: args
                    .iter()
                    .map(|a| self.qualify(pkg, file, a))
                    .collect::<Result<_>>()?,
            },
            TypeDescriptor::Interface(elems) => {
                let mut out = Vec::with_capacity(elems.len());
                for elem in elems {
                    out.push(match elem {
                        InterfaceElem::Method { name, sig } => InterfaceElem::Method {
                            name: name.clone(),
                            sig: self.qualify_signature(pkg, file, sig)?,
                        },
                        InterfaceElem::Embed(t) => InterfaceElem::Embed(self.qualify(pkg, file, t)?),
                        InterfaceElem::TypeSet(terms) => InterfaceElem::TypeSet(
                            terms
                                .iter()
                                .map(|term| {
                                    self.qualify(pkg, file, &term.ty).map(|ty| TypeTerm {
                                        tilde: term.tilde,
                                        ty,
                                    })
                                })
                                .collect::<Result<_>>()?,
                        ),
                    });
                }
                TypeDescriptor::Interface(out)
            }
            TypeDescriptor::Struct(fields) => TypeDescriptor::Struct(
                fields
                    .iter()
                    .map(|f| {
                        self.qualify(pkg, file, &f.ty).map(|ty| StructField {
                            name: f.name.clone(),
                            ty,
                            tag: f.tag.clone(),
                        })
                    })
                    .collect::<Result<_>>()?,
            ),
        })
    }

    /// Array lengths may name constants: `N` or `pkg.N`.
    fn qualify_length(&mut self, pkg: &Package, file: &SourceFile, len: &str) -> Result<String> {
        let is_ident = |s: &str| {
            s.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_')
                && s.chars().all(|c| c.is_alphanumeric() || c == '_')
        };
        if let Some((qualifier, name)) = len.split_once('.') {
            if is_ident(qualifier) && is_ident(name) {
                let path = self.import_path_for_qualifier(pkg, file, qualifier)?;
                return Ok(format!("{}.{}", self.imports.add(&path), name));
            }
        } else if is_ident(len) {
            return Ok(format!("{}.{}", self.imports.add(&pkg.path), len));
        }
        Ok(len.to_string())
    }

    /// Import path `qualifier` refers to in `file`.
    fn import_path_for_qualifier(
        &mut self,
        pkg: &Package,
        file: &SourceFile,
        qualifier: &str,
    ) -> Result<String> {
        let mut unconfirmed = Vec::new();
        for import in &file.imports {
            match import.name.as_deref() {
                Some(name) if name == qualifier => return Ok(import.path.clone()),
                Some(_) => {}
                None if guess_package_name(&import.path) == qualifier => {
                    return Ok(import.path.clone())
                }
                None => unconfirmed.push(import.path.as_str()),
            }
        }

        // Package name differs from the last path element.
        for path in unconfirmed {
            match self.locator.load(path, &pkg.dir) {
                Ok(imported) if imported.name == qualifier => return Ok(path.to_string()),
                Ok(_) => {}
                Err(e) => debug!(path, error = %e, "could not load import to check its name"),
            }
        }

        Err(ResolutionError::UnknownPackage {
            qualifier: qualifier.to_string(),
            file: file.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoConfig;
    use std::fs;
    use tempfile::TempDir;

    fn module(files: &[(&str, &str)]) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("go.mod"), "module example.com/acme\n\ngo 1.21\n").unwrap();
        for (rel, contents) in files {
            let path = tmp.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        tmp
    }

    fn resolve(tmp: &TempDir, dir: &str, name: &str) -> (Result<InterfaceDecl>, ImportTable) {
        let mut locator = Locator::new(GoConfig::default());
        let mut imports = ImportTable::new();
        let result = Resolver::new(&mut locator, &mut imports).resolve(&tmp.path().join(dir), name);
        (result, imports)
    }

    #[test]
    fn test_resolves_and_qualifies() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\nimport \"context\"\n\ntype Job struct{}\n\ntype Worker interface {\n\tDo(ctx context.Context, job *Job) (int, error)\n\tClose()\n}\n",
        )]);

        let (decl, imports) = resolve(&tmp, "svc", "Worker");
        let decl = decl.unwrap();
        assert_eq!(decl.package_path, "example.com/acme/svc");
        assert_eq!(imports.alias_of("example.com/acme/svc"), Some("alias1"));
        assert_eq!(imports.alias_of("context"), Some("alias2"));

        let names: Vec<_> = decl.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Do", "Close"]);

        let do_method = &decl.methods[0];
        assert_eq!(do_method.params[0].ty, TypeDescriptor::qualified("alias2", "Context"));
        assert_eq!(
            do_method.params[1].ty,
            TypeDescriptor::pointer(TypeDescriptor::qualified("alias1", "Job"))
        );
        assert_eq!(do_method.results[0].name, "result1");
        assert!(do_method.error_result().is_some());
        assert!(do_method.context_param(&imports).is_some());
    }

    #[test]
    fn test_embedded_first_and_deduplicated() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\ntype Closer interface { Close() error }\n\ntype Store interface {\n\tGet(key string) string\n\tCloser\n\tClose() error\n\terror\n}\n",
        )]);

        let (decl, _) = resolve(&tmp, "svc", "Store");
        let names: Vec<_> = decl.unwrap().methods.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Close", "Error", "Get"]);
    }

    #[test]
    fn test_embeds_across_packages() {
        let tmp = module(&[
            (
                "base/base.go",
                "package base\n\ntype Item struct{}\n\ntype Reader interface { Read(id string) (*Item, error) }\n",
            ),
            (
                "svc/svc.go",
                "package svc\n\nimport \"example.com/acme/base\"\n\ntype Store interface {\n\tbase.Reader\n\tWrite(item *base.Item) error\n}\n",
            ),
        ]);

        let (decl, imports) = resolve(&tmp, "svc", "Store");
        let decl = decl.unwrap();
        assert_eq!(decl.methods.len(), 2);
        assert_eq!(imports.alias_of("example.com/acme/svc"), Some("alias1"));
        assert_eq!(imports.alias_of("example.com/acme/base"), Some("alias2"));
        let item = TypeDescriptor::pointer(TypeDescriptor::qualified("alias2", "Item"));
        assert_eq!(decl.methods[0].results[0].ty, item);
        assert_eq!(decl.methods[1].params[0].ty, item);
    }

    #[test]
    fn test_renamed_import_and_defined_type() {
        let tmp = module(&[
            ("lib/v2/lib.go", "package lib\n\ntype Token string\n"),
            (
                "svc/svc.go",
                "package svc\n\nimport tok \"example.com/acme/lib/v2\"\n\ntype inner interface { Issue() tok.Token }\n\ntype Issuer inner\n",
            ),
        ]);

        let (decl, imports) = resolve(&tmp, "svc", "Issuer");
        let decl = decl.unwrap();
        assert_eq!(
            decl.methods[0].results[0].ty,
            TypeDescriptor::qualified("alias2", "Token")
        );
        assert_eq!(imports.path_of("alias2"), Some("example.com/acme/lib/v2"));
    }

    #[test]
    fn test_package_name_confirmed_by_loading() {
        let tmp = module(&[
            ("thingslib/things.go", "package things\n\ntype Thing int\n"),
            (
                "svc/svc.go",
                "package svc\n\nimport \"example.com/acme/thingslib\"\n\ntype Maker interface { Make() things.Thing }\n",
            ),
        ]);

        let (decl, imports) = resolve(&tmp, "svc", "Maker");
        assert!(decl.is_ok());
        assert_eq!(imports.path_of("alias2"), Some("example.com/acme/thingslib"));
    }

    #[test]
    fn test_not_an_interface() {
        let tmp = module(&[("svc/svc.go", "package svc\n\ntype Job struct{ ID int }\n")]);
        let (decl, _) = resolve(&tmp, "svc", "Job");
        match decl.unwrap_err() {
            ResolutionError::NotAnInterface { name, kind } => {
                assert_eq!(name, "Job");
                assert_eq!(kind, "struct type");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_interface() {
        let tmp = module(&[("svc/svc.go", "package svc\n")]);
        let (decl, _) = resolve(&tmp, "svc", "Worker");
        assert!(matches!(decl, Err(ResolutionError::NotFound { .. })));
    }

    #[test]
    fn test_embedding_cycle() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\ntype A interface { B }\n\ntype B interface { A }\n",
        )]);
        let (decl, _) = resolve(&tmp, "svc", "A");
        assert!(matches!(decl, Err(ResolutionError::EmbeddingCycle { .. })));
    }

    #[test]
    fn test_generic_and_constraint_rejected() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\ntype Box[T any] interface { Get() T }\n\ntype Number interface { ~int | ~float64 }\n",
        )]);
        let (generic, _) = resolve(&tmp, "svc", "Box");
        assert!(matches!(generic, Err(ResolutionError::GenericInterface { .. })));

        let (constraint, _) = resolve(&tmp, "svc", "Number");
        assert!(matches!(
            constraint,
            Err(ResolutionError::NotAnInterface { kind, .. }) if kind == "type constraint"
        ));
    }

    #[test]
    fn test_unknown_qualifier() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\ntype Worker interface { Do() nowhere.Thing }\n",
        )]);
        let (decl, _) = resolve(&tmp, "svc", "Worker");
        assert!(matches!(decl, Err(ResolutionError::UnknownPackage { qualifier, .. }) if qualifier == "nowhere"));
    }

    #[test]
    fn test_array_length_constant_qualified() {
        let tmp = module(&[(
            "svc/svc.go",
            "package svc\n\nconst Size = 4\n\ntype Hasher interface { Sum() [Size]byte }\n",
        )]);
        let (decl, _) = resolve(&tmp, "svc", "Hasher");
        assert_eq!(decl.unwrap().methods[0].results[0].ty.to_string(), "[alias1.Size]byte");
    }

    #[test]
    fn test_predeclared() {
        assert!(is_predeclared("error"));
        assert!(is_predeclared("uintptr"));
        assert!(!is_predeclared("Context"));
    }
}
