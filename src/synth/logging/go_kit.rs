use super::{LogBackend, FIELDS};
use crate::emit::Expr;
use crate::imports::ImportTable;
use crate::model::TypeDescriptor;

const LOG_PATH: &str = "github.com/go-kit/kit/log";

/// go-kit `log.Logger`: a flat key/value list, the error as its string.
#[derive(Debug, Default)]
pub struct GoKitLog {
    log: String,
}

impl LogBackend for GoKitLog {
    fn register_imports(&mut self, imports: &mut ImportTable) {
        self.log = imports.add(LOG_PATH);
    }

    fn logger_type(&self) -> TypeDescriptor {
        TypeDescriptor::qualified(self.log.clone(), "Logger")
    }

    fn field_type(&self) -> TypeDescriptor {
        TypeDescriptor::empty_interface()
    }

    fn base_fields(&self, method: &str, error: &str) -> Vec<Expr> {
        vec![
            Expr::str("method"),
            Expr::str(method),
            Expr::str("error"),
            Expr::ident(error).dot("Error").call(Vec::new()),
        ]
    }

    fn log_call(&self, logger: Expr, _method: &str) -> Expr {
        logger.dot("Log").call_spread(vec![Expr::ident(FIELDS)])
    }
}
