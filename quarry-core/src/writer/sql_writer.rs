use crate::{JoinType, Operator, Order, Quantifier, writer::Context};

/// Dialect printer turning the rendering primitives into concrete SQL text.
///
/// It knows nothing about metadata: names arrive already resolved, values are
/// never inlined (only their placeholders are written).
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    /// Render parameter placeholder.
    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        context.counter += 1;
        out.push('?');
    }

    /// Constant false condition, rendered in place of an empty `IN` list.
    fn write_value_false(&self, _context: &mut Context, out: &mut String) {
        out.push_str("FALSE");
    }

    /// Alias declaration after a table, a subquery or a select item.
    fn write_alias(&self, context: &mut Context, out: &mut String, alias: &str) {
        out.push_str(" AS ");
        self.write_identifier_quoted(context, out, alias);
    }

    fn write_join_type(&self, _context: &mut Context, out: &mut String, join_type: &JoinType) {
        out.push_str(match join_type {
            JoinType::Default => "JOIN",
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        });
    }

    fn write_order(&self, _context: &mut Context, out: &mut String, order: &Order) {
        out.push_str(match order {
            Order::ASC => " ASC",
            Order::DESC => " DESC",
        });
    }

    fn write_quantifier(&self, _context: &mut Context, out: &mut String, quantifier: &Quantifier) {
        out.push_str(match quantifier {
            Quantifier::All => "ALL ",
            Quantifier::Some => "SOME ",
            Quantifier::Any => "ANY ",
        });
    }

    /// Comparison operator, symbols are written without surrounding spaces.
    fn write_operator(&self, _context: &mut Context, out: &mut String, operator: &Operator) {
        out.push_str(match operator {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Like => " LIKE ",
            Operator::NotLike => " NOT LIKE ",
            Operator::In => " IN ",
            Operator::NotIn => " NOT IN ",
        });
    }

    fn write_statement_end(&self, _context: &mut Context, out: &mut String) {
        out.push(';');
    }
}
