use super::{LogBackend, FIELDS};
use crate::emit::Expr;
use crate::imports::ImportTable;
use crate::model::TypeDescriptor;

const ZAP_PATH: &str = "go.uber.org/zap";
const ZAPCORE_PATH: &str = "go.uber.org/zap/zapcore";

/// `*zap.Logger` with typed fields, logged at error level.
#[derive(Debug, Default)]
pub struct Zap {
    zap: String,
    zapcore: String,
}

impl LogBackend for Zap {
    fn register_imports(&mut self, imports: &mut ImportTable) {
        self.zap = imports.add(ZAP_PATH);
        self.zapcore = imports.add(ZAPCORE_PATH);
    }

    fn logger_type(&self) -> TypeDescriptor {
        TypeDescriptor::pointer(TypeDescriptor::qualified(self.zap.clone(), "Logger"))
    }

    fn field_type(&self) -> TypeDescriptor {
        TypeDescriptor::qualified(self.zapcore.clone(), "Field")
    }

    fn base_fields(&self, method: &str, error: &str) -> Vec<Expr> {
        let zap = || Expr::ident(self.zap.clone());
        vec![
            zap()
                .dot("String")
                .call(vec![Expr::str("method"), Expr::str(method)]),
            zap().dot("Error").call(vec![Expr::ident(error)]),
        ]
    }

    fn log_call(&self, logger: Expr, method: &str) -> Expr {
        logger.dot("Error").call_spread(vec![
            Expr::str(format!("{} failed", method)),
            Expr::ident(FIELDS),
        ])
    }
}
