//! Renders a [`GoFile`] as gofmt-formatted Go source.

use std::fmt::{self, Write};

use super::ast::{Decl, Expr, FuncDecl, GoFile, Stmt, StructDecl};
use crate::model::{Field, Signature};

/// Render `file` to text.
pub fn render(file: &GoFile) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_file(&mut out, file);
    out
}

fn write_file<W: Write>(out: &mut W, file: &GoFile) -> fmt::Result {
    writeln!(out, "// {}", file.banner)?;
    writeln!(out)?;
    writeln!(out, "package {}", file.package)?;

    match file.imports.as_slice() {
        [] => {}
        [(alias, path)] => {
            writeln!(out)?;
            writeln!(out, "import {} {}", alias, quote(path))?;
        }
        imports => {
            writeln!(out)?;
            writeln!(out, "import (")?;
            for (alias, path) in imports {
                writeln!(out, "\t{} {}", alias, quote(path))?;
            }
            writeln!(out, ")")?;
        }
    }

    for decl in &file.decls {
        writeln!(out)?;
        match decl {
            Decl::Struct(def) => write_struct(out, def)?,
            Decl::Func(func) => write_func(out, func)?,
        }
    }
    Ok(())
}

fn write_struct<W: Write>(out: &mut W, def: &StructDecl) -> fmt::Result {
    if def.fields.is_empty() {
        return writeln!(out, "type {} struct{{}}", def.name);
    }
    writeln!(out, "type {} struct {{", def.name)?;
    let width = def.fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, ty) in &def.fields {
        writeln!(out, "\t{:<width$} {}", name, ty, width = width)?;
    }
    writeln!(out, "}}")
}

fn write_func<W: Write>(out: &mut W, func: &FuncDecl) -> fmt::Result {
    if let Some(doc) = &func.doc {
        writeln!(out, "// {}", doc)?;
    }
    out.write_str("func ")?;
    if let Some(receiver) = &func.receiver {
        out.write_str("(")?;
        write_field(out, receiver)?;
        out.write_str(") ")?;
    }
    out.write_str(&func.name)?;
    write_signature(out, &func.sig)?;
    out.write_str(" {\n")?;
    write_block(out, &func.body, 1)?;
    writeln!(out, "}}")
}

fn write_field<W: Write>(out: &mut W, field: &Field) -> fmt::Result {
    match &field.name {
        Some(name) => write!(out, "{} {}", name, field.ty),
        None => write!(out, "{}", field.ty),
    }
}

fn write_signature<W: Write>(out: &mut W, sig: &Signature) -> fmt::Result {
    write!(out, "{}", sig)
}

fn write_block<W: Write>(out: &mut W, stmts: &[Stmt], indent: usize) -> fmt::Result {
    for stmt in stmts {
        write_stmt(out, stmt, indent)?;
    }
    Ok(())
}

fn write_indent<W: Write>(out: &mut W, indent: usize) -> fmt::Result {
    for _ in 0..indent {
        out.write_char('\t')?;
    }
    Ok(())
}

fn write_stmt<W: Write>(out: &mut W, stmt: &Stmt, indent: usize) -> fmt::Result {
    write_indent(out, indent)?;
    write_stmt_inline(out, stmt, indent)?;
    out.write_char('\n')
}

/// A statement without its leading indent or trailing newline. `indent`
/// is still needed for nested blocks.
fn write_stmt_inline<W: Write>(out: &mut W, stmt: &Stmt, indent: usize) -> fmt::Result {
    match stmt {
        Stmt::Define { lhs, rhs } => {
            out.write_str(&lhs.join(", "))?;
            out.write_str(" := ")?;
            write_list(out, rhs, indent)
        }
        Stmt::Assign { lhs, rhs } => {
            write_list(out, lhs, indent)?;
            out.write_str(" = ")?;
            write_list(out, rhs, indent)
        }
        Stmt::Expr(expr) => write_expr(out, expr, indent),
        Stmt::If { cond, body } => {
            out.write_str("if ")?;
            write_expr(out, cond, indent)?;
            out.write_str(" {\n")?;
            write_block(out, body, indent + 1)?;
            write_indent(out, indent)?;
            out.write_char('}')
        }
        Stmt::Return(values) if values.is_empty() => out.write_str("return"),
        Stmt::Return(values) => {
            out.write_str("return ")?;
            write_list(out, values, indent)
        }
        Stmt::Defer(expr) => {
            out.write_str("defer ")?;
            write_expr(out, expr, indent)
        }
    }
}

fn write_list<W: Write>(out: &mut W, exprs: &[Expr], indent: usize) -> fmt::Result {
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            out.write_str(", ")?;
        }
        write_expr(out, expr, indent)?;
    }
    Ok(())
}

fn write_expr<W: Write>(out: &mut W, expr: &Expr, indent: usize) -> fmt::Result {
    match expr {
        Expr::Ident(name) => out.write_str(name),
        Expr::Selector(inner, name) => {
            write_expr(out, inner, indent)?;
            write!(out, ".{}", name)
        }
        Expr::Call { func, args, spread } => {
            write_expr(out, func, indent)?;
            out.write_char('(')?;
            write_list(out, args, indent)?;
            if *spread {
                out.write_str("...")?;
            }
            out.write_char(')')
        }
        Expr::Str(value) => out.write_str(&quote(value)),
        Expr::Int(value) => write!(out, "{}", value),
        Expr::Binary { left, op, right } => {
            write_expr(out, left, indent)?;
            write!(out, " {} ", op)?;
            write_expr(out, right, indent)
        }
        Expr::Composite { ty, elems } => {
            write!(out, "{}{{", ty)?;
            write_list(out, elems, indent)?;
            out.write_char('}')
        }
        Expr::KeyValue(key, value) => {
            write_expr(out, key, indent)?;
            out.write_str(": ")?;
            write_expr(out, value, indent)
        }
        Expr::AddrOf(inner) => {
            out.write_char('&')?;
            write_expr(out, inner, indent)
        }
        Expr::FuncLit { sig, body } => {
            out.write_str("func")?;
            write_signature(out, sig)?;
            match body.as_slice() {
                [] => out.write_str(" {}"),
                [single] if is_simple(single) => {
                    out.write_str(" { ")?;
                    write_stmt_inline(out, single, indent)?;
                    out.write_str(" }")
                }
                stmts => {
                    out.write_str(" {\n")?;
                    write_block(out, stmts, indent + 1)?;
                    write_indent(out, indent)?;
                    out.write_char('}')
                }
            }
        }
        Expr::Index(inner, index) => {
            write_expr(out, inner, indent)?;
            out.write_char('[')?;
            write_expr(out, index, indent)?;
            out.write_char(']')
        }
    }
}

/// Statements gofmt keeps on one line inside a function literal.
fn is_simple(stmt: &Stmt) -> bool {
    !matches!(stmt, Stmt::If { .. })
}

/// Go interpreted string literal for `value`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeDescriptor;

    fn file(decls: Vec<Decl>) -> GoFile {
        GoFile {
            banner: "Code generated by test. DO NOT EDIT.".to_string(),
            package: "svcmws".to_string(),
            imports: vec![
                ("alias2".to_string(), "context".to_string()),
                ("alias1".to_string(), "example.com/svc".to_string()),
            ],
            decls,
        }
    }

    #[test]
    fn test_header_and_imports() {
        let text = render(&file(Vec::new()));
        assert_eq!(
            text,
            "// Code generated by test. DO NOT EDIT.\n\npackage svcmws\n\nimport (\n\talias2 \"context\"\n\talias1 \"example.com/svc\"\n)\n"
        );
    }

    #[test]
    fn test_single_import_without_block() {
        let mut f = file(Vec::new());
        f.imports.truncate(1);
        assert!(render(&f).ends_with("package svcmws\n\nimport alias2 \"context\"\n"));
    }

    #[test]
    fn test_struct_fields_aligned() {
        let text = render(&file(vec![Decl::Struct(StructDecl {
            name: "wrapper".to_string(),
            fields: vec![
                ("next".to_string(), TypeDescriptor::qualified("alias1", "Worker")),
                ("opsDuration".to_string(), TypeDescriptor::ident("int")),
            ],
        })]));
        assert!(text.contains(
            "type wrapper struct {\n\tnext        alias1.Worker\n\topsDuration int\n}\n"
        ));
    }

    #[test]
    fn test_method_with_nested_if() {
        let func = FuncDecl {
            doc: None,
            receiver: Some(Field::named("m", TypeDescriptor::pointer(TypeDescriptor::ident("w")))),
            name: "Do".to_string(),
            sig: Signature {
                params: vec![Field::named("n", TypeDescriptor::ident("int"))],
                results: vec![Field::anonymous(TypeDescriptor::ident("error"))],
            },
            body: vec![
                Stmt::Define {
                    lhs: vec!["result1".to_string()],
                    rhs: vec![Expr::ident("m")
                        .dot("next")
                        .dot("Do")
                        .call(vec![Expr::ident("n")])],
                },
                Stmt::If {
                    cond: Expr::ident("result1").not_nil(),
                    body: vec![Stmt::Expr(
                        Expr::ident("log").call_spread(vec![Expr::ident("_fields")]),
                    )],
                },
                Stmt::Return(vec![Expr::ident("result1")]),
            ],
        };
        let text = render(&file(vec![Decl::Func(func)]));
        assert!(text.ends_with(
            "\nfunc (m *w) Do(n int) error {\n\tresult1 := m.next.Do(n)\n\tif result1 != nil {\n\t\tlog(_fields...)\n\t}\n\treturn result1\n}\n"
        ));
    }

    #[test]
    fn test_one_line_func_literal() {
        let lit = Expr::FuncLit {
            sig: Signature {
                params: vec![Field::anonymous(TypeDescriptor::ident("error"))],
                results: vec![Field::anonymous(TypeDescriptor::slice(
                    TypeDescriptor::empty_interface(),
                ))],
            },
            body: vec![Stmt::Return(vec![Expr::nil()])],
        };
        let mut out = String::new();
        write_expr(&mut out, &lit, 1).unwrap();
        assert_eq!(out, "func(error) []interface{} { return nil }");
    }

    #[test]
    fn test_quote() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
        assert_eq!(quote("\u{1}"), "\"\\u0001\"");
    }
}
