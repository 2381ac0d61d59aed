/**
 * jsonld module
 *
 * - merge: recursive, precedence-aware merge of JSON objects
 * - converter: SysML v2 AST to JSON-LD using per-type metamodel contexts
 */

pub mod converter;
pub mod merge;

pub use converter::{ast_to_jsonld, to_pretty_json, AstConverter};
pub use merge::merge;
