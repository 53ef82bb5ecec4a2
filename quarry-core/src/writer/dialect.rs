use crate::{
    Error, Result,
    writer::{Context, SqlWriter},
};
use std::{fmt::Write, str::FromStr};

/// Placeholder style of a dialect.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every argument.
    #[default]
    QuestionMark,
    /// `$1`, `$2`, ... numbered across the whole statement.
    Dollar,
}

/// Dialect profile: how identifiers are quoted and how placeholders look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    pub identifier_quote: char,
    pub placeholder: Placeholder,
}

impl Dialect {
    pub const fn mysql() -> Self {
        Self {
            name: "mysql",
            identifier_quote: '`',
            placeholder: Placeholder::QuestionMark,
        }
    }
    pub const fn sqlite() -> Self {
        Self {
            name: "sqlite",
            identifier_quote: '"',
            placeholder: Placeholder::QuestionMark,
        }
    }
    pub const fn postgres() -> Self {
        Self {
            name: "postgres",
            identifier_quote: '"',
            placeholder: Placeholder::Dollar,
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::mysql()
    }
}

impl FromStr for Dialect {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::mysql()),
            "sqlite" => Ok(Self::sqlite()),
            "postgres" | "postgresql" => Ok(Self::postgres()),
            _ => Err(Error::msg(format!("Unknown dialect `{s}`"))),
        }
    }
}

impl SqlWriter for Dialect {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        let quote = self.identifier_quote;
        let doubled = String::from_iter([quote, quote]);
        out.push(quote);
        self.write_escaped(context, out, value, quote, &doubled);
        out.push(quote);
    }

    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        context.counter += 1;
        match self.placeholder {
            Placeholder::QuestionMark => out.push('?'),
            Placeholder::Dollar => {
                let _ = write!(out, "${}", context.counter);
            }
        }
    }
}
