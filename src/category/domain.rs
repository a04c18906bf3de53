use std::fmt;

use crate::Error;

/// A category name with surrounding whitespace removed. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryName(String);

impl CategoryName {
    /// # Errors
    ///
    /// [Error::EmptyCategoryName] if nothing is left after trimming `name`.
    pub fn new(name: &str) -> Result<Self, Error> {
        match name.trim() {
            "" => Err(Error::EmptyCategoryName),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    /// For names read back from the database, which were checked on the way in.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type CategoryId = i64;

/// A label shared by every user's expenses, e.g. "Food" or "Transport".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

#[cfg(test)]
mod tests {
    use crate::{Error, category::CategoryName};

    #[test]
    fn blank_names_are_rejected() {
        for name in ["", "   ", "\t\n"] {
            assert_eq!(CategoryName::new(name), Err(Error::EmptyCategoryName));
        }
    }

    #[test]
    fn name_is_trimmed() {
        let name = CategoryName::new("\tHealth care  ").unwrap();

        assert_eq!(name.as_ref(), "Health care");
    }

    #[test]
    fn displays_as_plain_name() {
        assert_eq!(CategoryName::new_unchecked("Rent").to_string(), "Rent");
    }
}
