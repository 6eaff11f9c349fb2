pub mod bar;
pub mod coin;
pub mod market_col;
pub mod table;
