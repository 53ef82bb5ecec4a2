use convert_case::{Case, Casing};

/// Default SQL name of a Rust identifier: snake case, without raw or private prefixes.
pub fn underscore_name(name: &str) -> String {
    let name = name.strip_prefix("r#").unwrap_or(name);
    let name = name.strip_prefix('_').unwrap_or(name);
    name.to_case(Case::Snake)
}

pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Fallible version of [`separated_by`], stops at the first error.
pub fn try_separated_by<T, E, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) -> Result<(), E>
where
    F: FnMut(&mut String, T) -> Result<(), E>,
{
    for (i, v) in values.into_iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        f(out, v)?;
    }
    Ok(())
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$query.char_indices().nth(497).map_or($query.len(), |(i, _)| i)].trim_end(),
            if $query.chars().nth(497).is_some() { "..." } else { "" },
        )
    };
}
