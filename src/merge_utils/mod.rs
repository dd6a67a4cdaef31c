pub mod listing;
pub mod selection_parser;
pub mod utxo_filter;
