//! Builders shared by every decorator: forwarding a call to the wrapped
//! value and returning what it returned.

use crate::emit::{Expr, Stmt};
use crate::model::{Field, Method, Signature};

/// The decorator method's own signature: parameters keep their names,
/// results are anonymous.
pub fn method_signature(method: &Method) -> Signature {
    Signature {
        params: method
            .params
            .iter()
            .map(|p| Field::named(p.name.clone(), p.ty.clone()))
            .collect(),
        results: method
            .results
            .iter()
            .map(|r| Field::anonymous(r.ty.clone()))
            .collect(),
    }
}

/// `recv.next.Method(args)`, spreading the last argument of a variadic
/// method.
pub fn delegate_call(receiver: &str, method: &Method) -> Expr {
    let callee = Expr::ident(receiver).dot("next").dot(method.name.clone());
    let args = method.params.iter().map(|p| Expr::ident(p.name.clone())).collect();
    if method.is_variadic() {
        callee.call_spread(args)
    } else {
        callee.call(args)
    }
}

/// Invoke the delegate, binding every result to its metadata name.
pub fn capture(receiver: &str, method: &Method) -> Stmt {
    let call = delegate_call(receiver, method);
    if method.has_results() {
        Stmt::Define {
            lhs: method.results.iter().map(|r| r.name.clone()).collect(),
            rhs: vec![call],
        }
    } else {
        Stmt::Expr(call)
    }
}

/// `return result1, result2`, or nothing for a method without results.
pub fn return_results(method: &Method) -> Option<Stmt> {
    method.has_results().then(|| {
        Stmt::Return(
            method
                .results
                .iter()
                .map(|r| Expr::ident(r.name.clone()))
                .collect(),
        )
    })
}

/// `return recv.next.Method(args)`, or the bare call without results.
pub fn return_call(receiver: &str, method: &Method) -> Stmt {
    let call = delegate_call(receiver, method);
    if method.has_results() {
        Stmt::Return(vec![call])
    } else {
        Stmt::Expr(call)
    }
}
