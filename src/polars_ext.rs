use polars::prelude::{
    DataFrame, DataType, Expr, JsonFormat, JsonWriter, Null, SerWriter, col, lit, when,
};
use serde_json::Value;

use crate::{
    data::market_col::MarketCol,
    error::{CoinlensResult, DataError, IoError},
};

pub trait ExprExt {
    /// Divides two expressions, yielding null where the denominator is zero.
    fn safe_div(self, other: Expr) -> Expr;

    /// Leading `len` characters of a string column.
    fn str_prefix(self, len: i64) -> Expr;
}

impl ExprExt for Expr {
    fn safe_div(self, other: Expr) -> Expr {
        when(other.clone().eq(lit(0.0)))
            .then(lit(Null {}))
            .otherwise(self / other)
    }

    fn str_prefix(self, len: i64) -> Expr {
        self.str().slice(lit(0), lit(len))
    }
}

/// Calendar year of the `Date` column as `Int32`.
pub(crate) fn year_expr() -> Expr {
    col(MarketCol::Date)
        .str_prefix(4)
        .strict_cast(DataType::Int32)
}

/// Matches rows whose `column` equals any of `values`. An empty list matches nothing.
pub(crate) fn any_of<S: AsRef<str>>(column: MarketCol, values: &[S]) -> Expr {
    values
        .iter()
        .map(|v| col(column).eq(lit(v.as_ref().to_string())))
        .reduce(|acc, e| acc.or(e))
        .unwrap_or_else(|| lit(false))
}

pub trait DataFrameExt {
    fn to_json_rows(&self) -> CoinlensResult<Vec<serde_json::Map<String, Value>>>;
}

impl DataFrameExt for DataFrame {
    fn to_json_rows(&self) -> CoinlensResult<Vec<serde_json::Map<String, Value>>> {
        let height = self.height();
        if height == 0 {
            return Ok(Vec::new());
        }

        // Heuristic: approx 2^6 bytes per cell
        let estimated_row_size = self.width() * (1 << 6);
        let mut buf = Vec::with_capacity(height * estimated_row_size);

        JsonWriter::new(&mut buf)
            .with_json_format(JsonFormat::Json)
            .finish(&mut self.clone())
            .map_err(|e| DataError::DataFrame(e.to_string()))?;

        let json_val: Value = serde_json::from_slice(&buf).map_err(IoError::Json)?;

        match json_val {
            Value::Array(rows) => {
                let mut out_vec = Vec::with_capacity(rows.len());
                for v in rows {
                    if let Value::Object(map) = v {
                        out_vec.push(map);
                    }
                }
                Ok(out_vec)
            }
            _ => {
                Err(DataError::DataFrame("Polars JSON output was not an array".to_string()).into())
            }
        }
    }
}
