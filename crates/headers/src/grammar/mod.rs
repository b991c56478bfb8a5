//! Lexical layer shared by every header type.
//!
//! - [`chars`]: character classes (`tchar`, `qdtext`, `ctext`, ...)
//! - [`Scanner`]: a cursor with tokens, quoted strings, comments and extended values
//! - [`driver`]: the parsing loop and the [`HeaderGrammar`] hooks a header type plugs into it

pub(crate) mod chars;
pub(crate) mod driver;
mod parameter;
mod scanner;

pub use driver::MAX_HEADER_VALUE_BYTES;
pub(crate) use driver::{Flow, HeaderGrammar, parse};
pub(crate) use parameter::{ParameterBuilder, ParameterKind};
pub(crate) use scanner::Scanner;
