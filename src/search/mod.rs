// Static evaluation and the one-ply move scorer used when no stored knowledge applies
pub mod eval;
pub mod oneply;
