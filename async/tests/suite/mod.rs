mod combinators;
mod resolve;
