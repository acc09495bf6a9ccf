pub mod create_operator;
