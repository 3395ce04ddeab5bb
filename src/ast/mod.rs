/// AST (Abstract Syntax Tree) module
/// Contains the parsed program handed over by the parser
///
/// Submodules:
/// - ast: Program, class and feature declarations
/// - expressions: The expression arena and the expression kinds
pub mod ast;
pub mod expressions;

#[cfg(test)]
mod tests;
