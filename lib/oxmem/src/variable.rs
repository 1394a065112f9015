use std::fmt;

/// A pattern variable, such as used in triple patterns and query expressions.
///
/// The default string formatter is returning a SPARQL compatible representation:
/// ```
/// use oxmem::{Variable, VariableNameParseError};
///
/// assert_eq!("?foo", Variable::new("foo")?.to_string());
/// # Result::<_,VariableNameParseError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Creates a variable from its name.
    ///
    /// The name must be a plain identifier: at least one character, no whitespace
    /// and no leading `?` or `$`.
    pub fn new(name: impl Into<String>) -> Result<Self, VariableNameParseError> {
        let name = name.into();
        validate_variable_identifier(&name)?;
        Ok(Self::new_unchecked(name))
    }

    /// Creates a variable from its name without validation.
    ///
    /// It is the caller's responsibility to ensure that `name` is a valid variable name.
    ///
    /// [`Variable::new()`] is a safe version of this constructor and should be used for untrusted data.
    #[inline]
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for Variable {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

fn validate_variable_identifier(id: &str) -> Result<(), VariableNameParseError> {
    if id.is_empty() {
        return Err(VariableNameParseError);
    }
    for (i, c) in id.chars().enumerate() {
        match c {
            '0'..='9' | '_' | 'A'..='Z' | 'a'..='z' => (),
            c if i > 0 && (c == '\u{00B7}' || ('\u{0300}'..='\u{036F}').contains(&c)) => (),
            c if c > '\u{00BF}' => (),
            _ => return Err(VariableNameParseError),
        }
    }
    Ok(())
}

/// An error raised during [`Variable`] name validation.
#[derive(Debug, thiserror::Error)]
#[error("The variable name is invalid")]
pub struct VariableNameParseError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validation() {
        Variable::new("").unwrap_err();
        Variable::new("foo").unwrap();
        Variable::new("foo bar").unwrap_err();
        Variable::new("?foo").unwrap_err();
        Variable::new("foo_1").unwrap();
    }
}
