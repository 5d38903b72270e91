//! sea-orm helpers used by repository implementations.

use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, DbErr, SqlErr};

/// Case-insensitive substring match: `LOWER(col) LIKE '%needle%'`.
///
/// `%`, `_` and `\` in the needle are matched literally.
pub trait ContainsInsensitive: ColumnTrait {
    fn contains_insensitive(&self, needle: &str) -> SimpleExpr {
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        Expr::expr(Func::lower(Expr::col(self.as_column_ref())))
            .like(LikeExpr::new(pattern).escape('\\'))
    }
}

impl<C: ColumnTrait> ContainsInsensitive for C {}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// True when the statement failed on a unique index or primary key.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
